use std::{env, error::Error, path::PathBuf};

use home::home_dir;

use crate::{
    config::{InventoryConfig, DEFAULT_CONFIG_FILE_NAME},
    Inventory,
};

#[derive(Default)]
pub struct InventoryBuilder {
    // All other paths are relative to `root`
    root: Option<PathBuf>,
    build_file_name: Option<PathBuf>,
    config_file_name: Option<PathBuf>,
    config: Option<InventoryConfig>,
    local_repository: Option<PathBuf>,
    output_directory: Option<PathBuf>,
}

impl InventoryBuilder {
    /// Project root directory.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Name of the build model exported by the build system.
    ///
    /// Defaults to `build.toml`.
    pub fn build_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.build_file_name = Some(path.into());
        self
    }

    /// Name of the configuration file.
    ///
    /// Defaults to `oss-inventory.toml`. Ignored when a configuration is given.
    pub fn config_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file_name = Some(path.into());
        self
    }

    pub fn config(mut self, config: InventoryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Directory the relative artifact files of the build model are resolved against.
    ///
    /// Defaults to `local_repository` from the configuration, then `$HOME/.m2/repository`.
    pub fn local_repository(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_repository = Some(path.into());
        self
    }

    /// Directory for requests and reports.
    ///
    /// Defaults to `output_directory` from the configuration, then `target/oss-inventory`.
    pub fn output_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(path.into());
        self
    }

    pub fn try_build(self) -> Result<Inventory, Box<dyn Error>> {
        let Self {
            root,
            build_file_name,
            config_file_name,
            config,
            local_repository,
            output_directory,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let build_file_name = build_file_name.unwrap_or_else(|| PathBuf::from("build.toml"));

        let config = match config {
            Some(config) => config,
            None => {
                let config_file_name = config_file_name
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE_NAME));
                InventoryConfig::load(&root.join(config_file_name))?
            }
        };

        let local_repository = match local_repository.or_else(|| config.local_repository.clone()) {
            Some(path) => path,
            None => default_local_repository()?,
        };

        let output_directory = output_directory
            .or_else(|| config.output_directory.clone())
            .unwrap_or_else(|| PathBuf::from("target/oss-inventory"));

        Ok(Inventory {
            config,
            root,
            build_file_name,
            local_repository,
            output_directory,
        })
    }
}

fn default_local_repository() -> Result<PathBuf, Box<dyn Error>> {
    let mut repository =
        home_dir().ok_or("Could not find home dir. Please define $HOME env variable.")?;
    repository.push(".m2/repository");
    Ok(repository)
}
