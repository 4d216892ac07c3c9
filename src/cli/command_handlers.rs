use std::path::Path;

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    config::{InventoryConfig, RuleFetchFailure},
    extract::{extract_project_infos, RunContext},
    model::{build::BuildModel, ModuleProjectInfo, ParseError},
    report::{log_policy_result, log_update_result, write_policy_report, ReportError},
    resolver,
    service::{
        CheckPoliciesRequest, CheckPoliciesResult, InventoryService, ServiceError,
        UpdateInventoryResult, UpdateRequest,
    },
};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Missing organization token, set `org_token` in the configuration")]
    MissingOrgToken,
    #[error("Error loading build model: {0}")]
    Parse(#[from] ParseError),
    #[error("Error communicating with the inventory service: {0}")]
    Service(#[from] ServiceError),
    #[error("Some dependencies were rejected by the organization's policies.")]
    PolicyRejected,
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Error writing inventory: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_build_model(
    root: &Path,
    build_file_name: &Path,
    local_repository: &Path,
) -> Result<BuildModel, RunError> {
    let model = BuildModel::from_file(&root.join(build_file_name))?;
    Ok(model.with_local_repository(&root.join(local_repository)))
}

/// Handler to inventory command, the collected projects as JSON.
pub fn do_inventory(
    config: &InventoryConfig,
    model: &BuildModel,
    service: &dyn InventoryService,
) -> Result<String, RunError> {
    let projects = do_collect(config, model, service)?;
    Ok(serde_json::to_string_pretty(&projects)?)
}

/// Handler to check-policies command
pub fn do_check_policies(
    config: &InventoryConfig,
    model: &BuildModel,
    service: &dyn InventoryService,
    output_directory: &Path,
) -> Result<Option<CheckPoliciesResult>, RunError> {
    let projects = do_collect(config, model, service)?;
    if projects.is_empty() {
        info!("No open source information found.");
        return Ok(None);
    }

    check_policies(config, model, service, output_directory, &projects).map(Some)
}

/// Handler to update command
/// 1 - Collects the projects of the build
/// 2 - Checks them against the organization's policies, when enabled
/// 3 - Sends the inventory update
pub fn do_update(
    config: &InventoryConfig,
    model: &BuildModel,
    service: &dyn InventoryService,
    output_directory: &Path,
) -> Result<Option<UpdateInventoryResult>, RunError> {
    let projects = do_collect(config, model, service)?;
    if projects.is_empty() {
        info!("No open source information found.");
        return Ok(None);
    }

    if config.check_policies {
        check_policies(config, model, service, output_directory, &projects)?;
    }

    info!("Updating inventory of {} projects", projects.len());
    let request = UpdateRequest {
        org_token: org_token(config)?.to_owned(),
        requester_email: config.requester_email.clone(),
        product: product(config, model),
        product_version: config.product_version.clone(),
        projects,
    };
    let result = service.update(&request)?;
    log_update_result(&result);

    Ok(Some(result))
}

/// Selects the modules and collects their dependencies.
pub fn do_collect(
    config: &InventoryConfig,
    model: &BuildModel,
    service: &dyn InventoryService,
) -> Result<Vec<ModuleProjectInfo>, RunError> {
    let context = run_context(config, service)?;
    let resolver = resolver::detect(model);
    Ok(extract_project_infos(model, resolver.as_ref(), &context))
}

/// In-house rules are fetched once and shared by every module.
fn run_context(
    config: &InventoryConfig,
    service: &dyn InventoryService,
) -> Result<RunContext, RunError> {
    let context = RunContext::new(config.extract_settings());
    if !config.in_house.enabled {
        return Ok(context);
    }

    match service.in_house_rules(org_token(config)?) {
        Ok(rules) => {
            debug!("Resolving in-house dependencies with {} rules", rules.len());
            Ok(context.with_in_house_rules(rules))
        }
        Err(err) => match config.in_house.on_fetch_failure {
            RuleFetchFailure::Fail => Err(err.into()),
            RuleFetchFailure::DirectOnly => {
                warn!("Could not fetch in-house rules, collecting direct dependencies only: {err}");
                Ok(context.direct_only())
            }
        },
    }
}

fn check_policies(
    config: &InventoryConfig,
    model: &BuildModel,
    service: &dyn InventoryService,
    output_directory: &Path,
    projects: &[ModuleProjectInfo],
) -> Result<CheckPoliciesResult, RunError> {
    info!("Checking policies");
    let request = CheckPoliciesRequest {
        org_token: org_token(config)?.to_owned(),
        product: product(config, model),
        product_version: config.product_version.clone(),
        force_check_all_dependencies: config.force_check_all_dependencies,
        projects: projects.to_vec(),
    };
    let result = service.check_policies(&request)?;

    write_policy_report(&result, output_directory)?;
    log_policy_result(&result);
    if result.has_rejections() {
        return Err(RunError::PolicyRejected);
    }
    Ok(result)
}

fn org_token(config: &InventoryConfig) -> Result<&str, RunError> {
    config
        .org_token
        .as_deref()
        .filter(|token| !token.trim().is_empty())
        .ok_or(RunError::MissingOrgToken)
}

/// Configured product, otherwise the root module's name, otherwise its artifact id.
fn product(config: &InventoryConfig, model: &BuildModel) -> Option<String> {
    config.product.clone().or_else(|| {
        model
            .root_module()
            .map(|root| root.name.clone().unwrap_or_else(|| root.artifact_id.clone()))
    })
}
