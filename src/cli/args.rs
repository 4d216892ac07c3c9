use clap::Parser;

/// Reports the open source dependencies of a multi-module build to an inventory service.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Project root directory
    #[clap(short, long, default_value = ".")]
    pub root: String,
    /// Build model exported by the build system, relative to the root
    #[clap(short, long, default_value = "build.toml")]
    pub build_file: String,
    /// Configuration file, relative to the root
    #[clap(short, long, default_value = "oss-inventory.toml")]
    pub config_file: String,
    /// Directory artifact files are resolved against [default: $HOME/.m2/repository]
    #[clap(short, long, env = "OSSINV_LOCAL_REPOSITORY")]
    pub local_repository: Option<String>,
    /// Directory for requests and reports [default: target/oss-inventory]
    #[clap(short, long)]
    pub output_directory: Option<String>,
}

#[derive(Debug, Parser)]
pub enum Command {
    ///Sends the dependencies of the build to the inventory service
    Update,
    ///Checks the dependencies of the build against the organization's policies
    CheckPolicies,
    ///Prints the collected dependencies of the build as JSON
    Inventory,
}
