//! The build model exported by the host build system: modules, their declared
//! dependencies, the artifacts already resolved for them and the resolved
//! dependency graph in one of the two supported schemas.

use std::path::{Path, PathBuf};

use log::{debug, error};
use serde::Deserialize;

use crate::model::{Coordinates, ExclusionRule, ParseError};

pub const POM_PACKAGING: &str = "pom";
pub const DEFAULT_PACKAGING: &str = "jar";

fn default_packaging() -> String {
    DEFAULT_PACKAGING.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildModel {
    /// Id of the top-level module, `group:artifact:version`. Defaults to the first module.
    #[serde(default)]
    pub root: Option<String>,
    /// Graph in the indexed schema, shared by all modules.
    #[serde(default)]
    pub resolution: Option<Resolution>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Module {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default = "default_packaging")]
    pub packaging: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: Option<Coordinates>,
    #[serde(default)]
    pub dependencies: Vec<DeclaredDependency>,
    #[serde(default)]
    pub artifacts: Vec<ResolvedArtifact>,
    /// Graph in the nested schema.
    #[serde(default)]
    pub graph: Option<ModuleGraph>,
}

/// A dependency as written in the module's build declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeclaredDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(rename = "type", default)]
    pub dependency_type: Option<String>,
    #[serde(default)]
    pub system_path: Option<PathBuf>,
    #[serde(default)]
    pub exclusions: Vec<ExclusionRule>,
}

/// A file-backed artifact the build already resolved for the module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResolvedArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(rename = "type", default)]
    pub artifact_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Fields shared by the nodes of both graph schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeEntry {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(rename = "type", default)]
    pub artifact_type: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub exclusions: Vec<ExclusionRule>,
    /// Set when the resolver could not resolve this node; holds the cause.
    #[serde(default)]
    pub unresolved: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModuleGraph {
    #[serde(default)]
    pub unresolved: Option<String>,
    #[serde(default)]
    pub children: Vec<NestedNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NestedNode {
    #[serde(flatten)]
    pub entry: NodeEntry,
    #[serde(default)]
    pub children: Vec<NestedNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub roots: Vec<IndexedRoot>,
    #[serde(default)]
    pub nodes: Vec<IndexedNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IndexedRoot {
    /// Module id, `group:artifact:version`.
    pub module: String,
    #[serde(default)]
    pub unresolved: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IndexedNode {
    pub id: String,
    #[serde(flatten)]
    pub entry: NodeEntry,
    #[serde(default)]
    pub children: Vec<String>,
}

impl BuildModel {
    pub fn from_file(path: &Path) -> Result<BuildModel, ParseError> {
        debug!("Attempting to read build model from {}", path.display());
        let contents = std::fs::read_to_string(path)?;

        let model = BuildModel::from_toml_str(&contents);
        if let Err(err) = &model {
            error!("Could not build a valid build model from {}: {err}", path.display())
        }
        model
    }

    pub fn from_toml_str(data: &str) -> Result<BuildModel, ParseError> {
        let model = toml::from_str::<BuildModel>(data)?;
        if model.modules.is_empty() {
            return Err(ParseError::NoModules);
        }
        if let Some(root) = &model.root {
            let coordinates = root.parse::<Coordinates>()?;
            if !model.modules.iter().any(|m| m.coordinates() == coordinates) {
                return Err(ParseError::UnknownRoot(root.clone()));
            }
        }
        Ok(model)
    }

    /// The top-level build unit, `None` only for a model without modules.
    pub fn root_module(&self) -> Option<&Module> {
        self.root
            .as_ref()
            .and_then(|root| root.parse::<Coordinates>().ok())
            .and_then(|root| self.modules.iter().find(|m| m.coordinates() == root))
            .or_else(|| self.modules.first())
    }

    pub fn is_root(&self, module: &Module) -> bool {
        self.root_module()
            .is_some_and(|root| root.coordinates() == module.coordinates())
    }

    /// Resolves relative artifact files against the local repository directory.
    pub fn with_local_repository(mut self, repository: &Path) -> Self {
        let locate = |file: &mut Option<PathBuf>| {
            if let Some(path) = file {
                if path.is_relative() {
                    *path = repository.join(&*path);
                }
            }
        };
        fn locate_nested(node: &mut NestedNode, locate: &dyn Fn(&mut Option<PathBuf>)) {
            locate(&mut node.entry.file);
            for child in &mut node.children {
                locate_nested(child, locate);
            }
        }

        for module in &mut self.modules {
            for artifact in &mut module.artifacts {
                locate(&mut artifact.file);
            }
            if let Some(graph) = &mut module.graph {
                for node in &mut graph.children {
                    locate_nested(node, &locate);
                }
            }
        }
        if let Some(resolution) = &mut self.resolution {
            for node in &mut resolution.nodes {
                locate(&mut node.entry.file);
            }
        }
        self
    }
}

impl Module {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(&self.group_id, &self.artifact_id, &self.version)
    }

    /// `group:artifact:version`
    pub fn id(&self) -> String {
        self.coordinates().to_string()
    }

    pub fn is_pom(&self) -> bool {
        self.packaging == POM_PACKAGING
    }
}
