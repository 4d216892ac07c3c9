use std::{error::Error, path::PathBuf};

use log::{error, info};

use crate::{
    cli::command_handlers::{
        do_check_policies, do_inventory, do_update, load_build_model, RunError,
    },
    config::InventoryConfig,
    model::build::BuildModel,
    service::{CheckPoliciesResult, InventoryService, OfflineService, UpdateInventoryResult},
};

mod builder;

pub use builder::InventoryBuilder;

pub struct Inventory {
    config: InventoryConfig,
    root: PathBuf,
    build_file_name: PathBuf,
    local_repository: PathBuf,
    output_directory: PathBuf,
}

impl Inventory {
    pub fn builder() -> InventoryBuilder {
        InventoryBuilder::default()
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// The offline service writing into the output directory.
    pub fn offline_service(&self) -> OfflineService {
        OfflineService::new(
            self.root.join(&self.output_directory),
            self.config
                .in_house
                .rules_file
                .as_ref()
                .map(|file| self.root.join(file)),
        )
    }

    /// Collects the build's open source inventory as JSON
    pub fn inventory(&self, service: &dyn InventoryService) -> Result<String, Box<dyn Error>> {
        let model = self.load_build_model()?;
        Ok(do_inventory(&self.config, &model, service)?)
    }

    /// Sends the inventory to the service, checking policies first when configured
    pub fn update(
        &self,
        service: &dyn InventoryService,
    ) -> Result<Option<UpdateInventoryResult>, Box<dyn Error>> {
        if self.config.skip {
            info!("Skipping update (skip=true)");
            return Ok(None);
        }
        let output_directory = self.root.join(&self.output_directory);
        self.handle(
            self.load_build_model()
                .and_then(|model| do_update(&self.config, &model, service, &output_directory)),
        )
    }

    /// Checks the inventory against the organization's policies without updating it
    pub fn check_policies(
        &self,
        service: &dyn InventoryService,
    ) -> Result<Option<CheckPoliciesResult>, Box<dyn Error>> {
        if self.config.skip {
            info!("Skipping policy check (skip=true)");
            return Ok(None);
        }
        let output_directory = self.root.join(&self.output_directory);
        self.handle(
            self.load_build_model().and_then(|model| {
                do_check_policies(&self.config, &model, service, &output_directory)
            }),
        )
    }

    fn load_build_model(&self) -> Result<BuildModel, RunError> {
        load_build_model(&self.root, &self.build_file_name, &self.local_repository)
    }

    /// Errors only fail the run with `fail_on_error`, otherwise they are logged.
    fn handle<T>(
        &self,
        result: Result<Option<T>, RunError>,
    ) -> Result<Option<T>, Box<dyn Error>> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if self.config.fail_on_error => Err(err.into()),
            Err(err) => {
                error!("{err}");
                Ok(None)
            }
        }
    }
}
