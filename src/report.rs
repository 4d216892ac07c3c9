use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::service::{CheckPoliciesResult, UpdateInventoryResult};

pub const POLICY_REPORT_FILE_NAME: &str = "policy-check-result.json";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error writing report: {0}")]
    IO(#[from] std::io::Error),
    #[error("JSON error writing report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the policy check result as JSON into `output_directory`.
///
/// Returns `None` without failing when the directory cannot be created.
pub fn write_policy_report(
    result: &CheckPoliciesResult,
    output_directory: &Path,
) -> Result<Option<PathBuf>, ReportError> {
    if let Err(err) = std::fs::create_dir_all(output_directory) {
        warn!(
            "Report directory {} doesn't exist and could not be created: {err}",
            output_directory.display()
        );
        return Ok(None);
    }

    let path = output_directory.join(POLICY_REPORT_FILE_NAME);
    std::fs::write(&path, serde_json::to_string_pretty(result)?)?;
    info!("Wrote policy check result to {}", path.display());
    Ok(Some(path))
}

pub fn log_policy_result(result: &CheckPoliciesResult) {
    for rejection in result.rejections() {
        warn!(
            "{} in project {} was rejected by policy {}",
            rejection.dependency, rejection.project, rejection.policy
        );
    }
    if !result.has_rejections() {
        info!("All dependencies conform with the organization's policies.");
    }
}

pub fn log_update_result(result: &UpdateInventoryResult) {
    info!("Inventory update results for {}", result.organization);

    if !result.created_projects.is_empty() {
        info!("{} Newly created projects:", result.created_projects.len());
        for project in &result.created_projects {
            info!("  {project}");
        }
    }
    if !result.updated_projects.is_empty() {
        info!("{} existing projects were updated:", result.updated_projects.len());
        for project in &result.updated_projects {
            info!("  {project}");
        }
    }
}
