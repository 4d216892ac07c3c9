use std::error::Error;

use clap::Parser;
use oss_inventory::{
    cli::args::{CliArgs, Command},
    Inventory,
};

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();

    let mut builder = Inventory::builder()
        .root(&cli_args.root)
        .build_file_name(&cli_args.build_file)
        .config_file_name(&cli_args.config_file);
    if let Some(local_repository) = &cli_args.local_repository {
        builder = builder.local_repository(local_repository);
    }
    if let Some(output_directory) = &cli_args.output_directory {
        builder = builder.output_directory(output_directory);
    }
    let inventory = builder.try_build()?;
    let service = inventory.offline_service();

    match cli_args.cmd {
        Command::Update => {
            inventory.update(&service)?;
        }
        Command::CheckPolicies => {
            inventory.check_policies(&service)?;
        }
        Command::Inventory => println!("{}", inventory.inventory(&service)?),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
