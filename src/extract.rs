use std::{collections::HashMap, time::Instant};

use log::{debug, info};

use crate::{
    aggregate::{aggregate, AggregateSettings},
    collect::{collect_dependency_structure, collect_direct_dependencies, CollectSettings},
    in_house::{flatten_in_house, InHouseRules},
    model::{
        build::{BuildModel, Module},
        ModuleProjectInfo,
    },
    resolver::GraphResolver,
    selector::ModuleSelector,
};

#[derive(Debug, Clone, Default)]
pub struct ExtractSettings {
    pub collect: CollectSettings,
    pub selector: ModuleSelector,
    /// Token of the root module's project.
    pub project_token: Option<String>,
    /// Tokens of the other modules, by artifact id.
    pub module_tokens: HashMap<String, String>,
    /// Collapses all modules into one project when set.
    pub aggregate: Option<AggregateSettings>,
}

/// Read-only state shared by every module of a run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub settings: ExtractSettings,
    /// Empty when in-house resolution is disabled.
    pub in_house: InHouseRules,
    /// Skip graph resolution and report declared dependencies only.
    pub direct_only: bool,
}

impl RunContext {
    pub fn new(settings: ExtractSettings) -> Self {
        RunContext {
            settings,
            ..Default::default()
        }
    }

    pub fn with_in_house_rules(self, in_house: InHouseRules) -> Self {
        RunContext { in_house, ..self }
    }

    pub fn direct_only(self) -> Self {
        RunContext {
            direct_only: true,
            in_house: InHouseRules::default(),
            ..self
        }
    }

    fn project_token(&self, module: &Module, is_root: bool) -> Option<String> {
        if is_root {
            self.settings.project_token.clone()
        } else {
            self.settings.module_tokens.get(&module.artifact_id).cloned()
        }
    }
}

/// Collects the project info of every selected module, aggregated into one when configured.
pub fn extract_project_infos(
    model: &BuildModel,
    resolver: &dyn GraphResolver,
    context: &RunContext,
) -> Vec<ModuleProjectInfo> {
    let root = model.root_module();

    let infos = model
        .modules
        .iter()
        .filter(|module| {
            let is_root = model.is_root(module);
            context.settings.selector.should_process(module, is_root)
        })
        .map(|module| process_module(module, model.is_root(module), resolver, context))
        .collect::<Vec<_>>();

    debug_project_infos(&infos);

    match (&context.settings.aggregate, root) {
        (Some(settings), Some(root)) => {
            info!("Aggregating {} modules", infos.len());
            vec![aggregate(&infos, &root.coordinates(), settings)]
        }
        _ => infos,
    }
}

pub fn process_module(
    module: &Module,
    is_root: bool,
    resolver: &dyn GraphResolver,
    context: &RunContext,
) -> ModuleProjectInfo {
    let started = Instant::now();
    info!("Processing {}", module.id());

    let settings = &context.settings.collect;
    let dependencies = if context.direct_only {
        collect_direct_dependencies(module, settings)
    } else {
        match collect_dependency_structure(module, resolver, settings) {
            Ok(records) => flatten_in_house(records, &context.in_house),
            Err(err) => {
                debug!(
                    "Error resolving dependencies of {}, collecting direct dependencies only: {err}",
                    module.id()
                );
                collect_direct_dependencies(module, settings)
            }
        }
    };

    let info = ModuleProjectInfo {
        coordinates: module.coordinates(),
        parent_coordinates: module.parent.clone(),
        project_token: context.project_token(module, is_root),
        dependencies,
    };
    debug!(
        "Processed {} in {} ms",
        module.id(),
        started.elapsed().as_millis()
    );
    info
}

fn debug_project_infos(infos: &[ModuleProjectInfo]) {
    debug!("----------------- dumping project infos -----------------");
    debug!("Total number of projects: {}", infos.len());
    for info in infos {
        debug!("Project coordinates: {}", info.coordinates);
        match &info.parent_coordinates {
            Some(parent) => debug!("Project parent coordinates: {parent}"),
            None => debug!("Project parent coordinates: none"),
        }
        debug!("Total number of dependencies: {}", info.dependencies.len());
        for dependency in &info.dependencies {
            match dependency.checksum() {
                Some(checksum) => debug!("{dependency} sha256={checksum}"),
                None => debug!("{dependency}"),
            }
        }
    }
    debug!("----------------- dump finished -----------------");
}
