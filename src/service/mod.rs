mod offline;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{in_house::InHouseRules, model::ModuleProjectInfo};

pub use offline::{OfflineService, UPDATE_REQUEST_FILE_NAME};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("In-house rules are not available: {0}")]
    RulesUnavailable(String),
    #[error("Invalid in-house rule: {0}")]
    InvalidRule(#[from] regex_lite::Error),
    #[error("{0} is not supported by this service")]
    Unsupported(&'static str),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The remote inventory and policy service.
pub trait InventoryService {
    fn in_house_rules(&self, org_token: &str) -> Result<InHouseRules, ServiceError>;

    fn update(&self, request: &UpdateRequest) -> Result<UpdateInventoryResult, ServiceError>;

    fn check_policies(
        &self,
        request: &CheckPoliciesRequest,
    ) -> Result<CheckPoliciesResult, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    pub org_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,
    pub projects: Vec<ModuleProjectInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckPoliciesRequest {
    pub org_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,
    /// Also check dependencies already known to the service, not only new ones.
    pub force_check_all_dependencies: bool,
    pub projects: Vec<ModuleProjectInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInventoryResult {
    pub organization: String,
    #[serde(default)]
    pub created_projects: BTreeSet<String>,
    #[serde(default)]
    pub updated_projects: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAction {
    Approve,
    Reject,
    Conditional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOutcome {
    pub project: String,
    /// `group:artifact:version` of the evaluated dependency.
    pub dependency: String,
    pub policy: String,
    pub action: PolicyAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPoliciesResult {
    pub organization: String,
    #[serde(default)]
    pub outcomes: Vec<PolicyOutcome>,
}

impl CheckPoliciesResult {
    pub fn has_rejections(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.action == PolicyAction::Reject)
    }

    pub fn rejections(&self) -> impl Iterator<Item = &PolicyOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.action == PolicyAction::Reject)
    }
}
