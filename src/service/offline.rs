use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::in_house::{InHouseRuleSpec, InHouseRules};

use super::{
    CheckPoliciesRequest, CheckPoliciesResult, InventoryService, ServiceError,
    UpdateInventoryResult, UpdateRequest,
};

pub const UPDATE_REQUEST_FILE_NAME: &str = "update-request.json";

/// Writes requests to disk instead of sending them. In-house rules come from a local file.
#[derive(Debug, Clone)]
pub struct OfflineService {
    output_directory: PathBuf,
    rules_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RulesDocument {
    #[serde(default)]
    rules: Vec<InHouseRuleSpec>,
}

impl OfflineService {
    pub fn new(output_directory: impl Into<PathBuf>, rules_file: Option<PathBuf>) -> Self {
        OfflineService {
            output_directory: output_directory.into(),
            rules_file,
        }
    }

    fn write_request<T: Serialize>(
        &self,
        file_name: &str,
        request: &T,
    ) -> Result<PathBuf, ServiceError> {
        std::fs::create_dir_all(&self.output_directory)?;
        let path = self.output_directory.join(file_name);
        std::fs::write(&path, serde_json::to_string_pretty(request)?)?;
        Ok(path)
    }
}

fn read_rules(path: &Path) -> Result<Vec<InHouseRuleSpec>, ServiceError> {
    debug!("Reading in-house rules from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    let document = toml::from_str::<RulesDocument>(&contents)?;
    Ok(document.rules)
}

impl InventoryService for OfflineService {
    fn in_house_rules(&self, org_token: &str) -> Result<InHouseRules, ServiceError> {
        let path = self.rules_file.as_deref().ok_or_else(|| {
            ServiceError::RulesUnavailable(format!(
                "no rules file configured for organization {org_token}"
            ))
        })?;
        let specs = read_rules(path)?;
        let rules = InHouseRules::compile(&specs)?;
        info!("Loaded {} in-house rules", rules.len());
        Ok(rules)
    }

    fn update(&self, request: &UpdateRequest) -> Result<UpdateInventoryResult, ServiceError> {
        let path = self.write_request(UPDATE_REQUEST_FILE_NAME, request)?;
        info!("Wrote offline update request to {}", path.display());
        Ok(UpdateInventoryResult::default())
    }

    fn check_policies(
        &self,
        _request: &CheckPoliciesRequest,
    ) -> Result<CheckPoliciesResult, ServiceError> {
        Err(ServiceError::Unsupported("Policy check"))
    }
}
