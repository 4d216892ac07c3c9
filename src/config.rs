use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{
    aggregate::AggregateSettings,
    collect::{CollectSettings, SCOPE_PROVIDED, SCOPE_TEST},
    extract::ExtractSettings,
    selector::ModuleSelector,
};

pub const DEFAULT_CONFIG_FILE_NAME: &str = "oss-inventory.toml";

const ENV_PREFIX: &str = "OSSINV";

/// What to do when the organization's in-house rules cannot be fetched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleFetchFailure {
    /// Abort the run.
    #[default]
    Fail,
    /// Disable in-house resolution and collect direct dependencies only.
    DirectOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    pub org_token: Option<String>,
    pub product: Option<String>,
    pub product_version: Option<String>,
    pub requester_email: Option<String>,
    pub project_token: Option<String>,
    pub module_tokens: HashMap<String, String>,
    pub ignore_test_scope_dependencies: bool,
    pub ignored_scopes: Vec<String>,
    pub ignore: bool,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub ignore_pom_modules: bool,
    pub aggregate: AggregateConfig,
    pub in_house: InHouseConfig,
    pub check_policies: bool,
    pub force_check_all_dependencies: bool,
    pub fail_on_error: bool,
    pub skip: bool,
    pub local_repository: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AggregateConfig {
    #[serde(default)]
    pub enabled: bool,
    pub project_name: Option<String>,
    pub project_token: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InHouseConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub on_fetch_failure: RuleFetchFailure,
    /// Rule document used by the offline service.
    pub rules_file: Option<PathBuf>,
}

impl InventoryConfig {
    /// Loads the configuration file, if it exists, overlaid with `OSSINV_*` variables.
    pub fn load(file: &Path) -> anyhow::Result<Self> {
        let raw_config = RawConfig::load(Some(file), None)?;
        Ok(raw_config.into())
    }

    pub fn extract_settings(&self) -> ExtractSettings {
        ExtractSettings {
            collect: CollectSettings {
                ignored_scopes: self.ignored_scopes.clone(),
                ignore_test_scope_dependencies: self.ignore_test_scope_dependencies,
            },
            selector: ModuleSelector::new(
                self.ignore_pom_modules,
                self.ignore,
                &self.includes,
                &self.excludes,
            ),
            project_token: self.project_token.clone(),
            module_tokens: self.module_tokens.clone(),
            aggregate: self.aggregate.enabled.then(|| AggregateSettings {
                project_name: self.aggregate.project_name.clone(),
                project_token: self.aggregate.project_token.clone(),
            }),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

impl From<RawConfig> for InventoryConfig {
    fn from(raw: RawConfig) -> Self {
        InventoryConfig {
            org_token: raw.org_token,
            product: raw.product,
            product_version: raw.product_version,
            requester_email: raw.requester_email,
            project_token: raw.project_token,
            module_tokens: raw.module_tokens,
            ignore_test_scope_dependencies: raw.ignore_test_scope_dependencies.unwrap_or(true),
            ignored_scopes: raw
                .ignored_scopes
                .unwrap_or_else(|| vec![SCOPE_TEST.to_owned(), SCOPE_PROVIDED.to_owned()]),
            ignore: raw.ignore.unwrap_or(false),
            includes: raw.includes,
            excludes: raw.excludes,
            ignore_pom_modules: raw.ignore_pom_modules.unwrap_or(true),
            aggregate: raw.aggregate,
            in_house: raw.in_house,
            check_policies: raw.check_policies.unwrap_or(false),
            force_check_all_dependencies: raw.force_check_all_dependencies.unwrap_or(false),
            fail_on_error: raw.fail_on_error.unwrap_or(false),
            skip: raw.skip.unwrap_or(false),
            local_repository: raw.local_repository,
            output_directory: raw.output_directory,
        }
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    org_token: Option<String>,
    product: Option<String>,
    product_version: Option<String>,
    requester_email: Option<String>,
    project_token: Option<String>,
    #[serde(default)]
    module_tokens: HashMap<String, String>,
    ignore_test_scope_dependencies: Option<bool>,
    ignored_scopes: Option<Vec<String>>,
    ignore: Option<bool>,
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default)]
    excludes: Vec<String>,
    ignore_pom_modules: Option<bool>,
    #[serde(default)]
    aggregate: AggregateConfig,
    #[serde(default)]
    in_house: InHouseConfig,
    check_policies: Option<bool>,
    force_check_all_dependencies: Option<bool>,
    fail_on_error: Option<bool>,
    skip: Option<bool>,
    local_repository: Option<PathBuf>,
    output_directory: Option<PathBuf>,
}

impl RawConfig {
    fn load(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).format(FileFormat::Toml).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("includes")
                    .with_list_parse_key("excludes")
                    .with_list_parse_key("ignored_scopes")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn load_empty() {
        let env = HashMap::from([]);
        let config = RawConfig::load(None, Some(env)).unwrap();
        assert_eq!(config, RawConfig::default());

        let config = InventoryConfig::from(config);
        assert!(config.ignore_test_scope_dependencies);
        assert!(config.ignore_pom_modules);
        assert_eq!(config.ignored_scopes, vec!["test", "provided"]);
        assert_eq!(config.in_house.on_fetch_failure, RuleFetchFailure::Fail);
        assert!(config.extract_settings().aggregate.is_none());
    }

    #[test]
    fn load_environment() {
        let env = HashMap::from([
            ("OSSINV_ORG_TOKEN".to_owned(), "org-123".to_owned()),
            ("OSSINV_INCLUDES".to_owned(), "core,web-*".to_owned()),
            ("OSSINV_IGNORE_POM_MODULES".to_owned(), "false".to_owned()),
            ("OSSINV_AGGREGATE__ENABLED".to_owned(), "true".to_owned()),
            (
                "OSSINV_AGGREGATE__PROJECT_NAME".to_owned(),
                "platform".to_owned(),
            ),
            (
                "OSSINV_IN_HOUSE__ON_FETCH_FAILURE".to_owned(),
                "direct-only".to_owned(),
            ),
            (
                "OSSINV_MODULE_TOKENS__WEB".to_owned(),
                "web-token".to_owned(),
            ),
        ]);
        let config = InventoryConfig::from(RawConfig::load(None, Some(env)).unwrap());
        assert_eq!(config.org_token.as_deref(), Some("org-123"));
        assert_eq!(config.includes, vec!["core", "web-*"]);
        assert!(!config.ignore_pom_modules);
        assert_eq!(
            config.aggregate,
            AggregateConfig {
                enabled: true,
                project_name: Some("platform".to_owned()),
                project_token: None,
            }
        );
        assert_eq!(config.in_house.on_fetch_failure, RuleFetchFailure::DirectOnly);
        assert_eq!(
            config.module_tokens.get("web").map(String::as_str),
            Some("web-token")
        );
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(DEFAULT_CONFIG_FILE_NAME);
        std::fs::write(
            &file,
            r#"
            org_token = "from-file"
            product = "acme"
            excludes = ["legacy-*"]
            ignored_scopes = ["test"]

            [in_house]
            enabled = true
            rules_file = "rules.toml"
            "#,
        )
        .unwrap();
        let env = HashMap::from([("OSSINV_ORG_TOKEN".to_owned(), "from-env".to_owned())]);

        let config = InventoryConfig::from(RawConfig::load(Some(&file), Some(env)).unwrap());
        assert_eq!(config.org_token.as_deref(), Some("from-env"));
        assert_eq!(config.product.as_deref(), Some("acme"));
        assert_eq!(config.excludes, vec!["legacy-*"]);
        assert_eq!(config.ignored_scopes, vec!["test"]);
        assert!(config.in_house.enabled);
        assert_eq!(config.in_house.rules_file, Some(PathBuf::from("rules.toml")));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = RawConfig::load(
            Some(&dir.path().join(DEFAULT_CONFIG_FILE_NAME)),
            Some(HashMap::new()),
        )
        .unwrap();
        assert_eq!(config, RawConfig::default());
    }
}
