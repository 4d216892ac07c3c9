mod indexed;
mod nested;

use std::path::PathBuf;

use log::debug;
use thiserror::Error;

use crate::model::{
    build::{BuildModel, Module, NodeEntry},
    Coordinates, ExclusionRule,
};

pub use indexed::IndexedGraphResolver;
pub use nested::NestedGraphResolver;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphResolutionError {
    #[error("No dependency graph was recorded for module {module}")]
    MissingGraph { module: String },
    #[error("Could not resolve {coordinates}: {cause}")]
    Unresolved { coordinates: String, cause: String },
    #[error("Node `{id}` referenced from the graph of {module} does not exist")]
    DanglingNode { module: String, id: String },
    #[error("Node `{id}` in the graph of {module} depends on itself")]
    Cycle { module: String, id: String },
}

/// Produces the resolved dependency graph of a module. Conflict resolution already
/// happened upstream; the graph is taken as is.
pub trait GraphResolver {
    /// Root node of the module, whose children are its top-level dependencies.
    fn resolve(&self, module: &Module) -> Result<DependencyNode, GraphResolutionError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyNode {
    /// Absent on the root node.
    pub dependency: Option<NodeDependency>,
    pub children: Vec<DependencyNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDependency {
    pub scope: Option<String>,
    pub optional: bool,
    pub artifact: NodeArtifact,
    pub exclusions: Vec<ExclusionRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub artifact_type: Option<String>,
    pub file: Option<PathBuf>,
}

impl NodeArtifact {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

impl DependencyNode {
    pub fn root(children: Vec<DependencyNode>) -> Self {
        DependencyNode {
            dependency: None,
            children,
        }
    }
}

impl TryFrom<&NodeEntry> for NodeDependency {
    type Error = GraphResolutionError;

    fn try_from(entry: &NodeEntry) -> Result<Self, Self::Error> {
        let artifact = NodeArtifact {
            group_id: entry.group_id.clone(),
            artifact_id: entry.artifact_id.clone(),
            version: entry.version.clone(),
            classifier: entry.classifier.clone(),
            artifact_type: entry.artifact_type.clone(),
            file: entry.file.clone(),
        };
        if let Some(cause) = &entry.unresolved {
            return Err(GraphResolutionError::Unresolved {
                coordinates: artifact.coordinates().to_string(),
                cause: cause.clone(),
            });
        }
        Ok(NodeDependency {
            scope: entry.scope.clone(),
            optional: entry.optional,
            artifact,
            exclusions: entry.exclusions.clone(),
        })
    }
}

/// Picks the backend matching the graph schema present in the build model.
pub fn detect(model: &BuildModel) -> Box<dyn GraphResolver + '_> {
    match &model.resolution {
        Some(resolution) => {
            debug!("Using indexed dependency graph resolver");
            Box::new(IndexedGraphResolver::new(resolution))
        }
        None => {
            debug!("Using nested dependency graph resolver");
            Box::new(NestedGraphResolver)
        }
    }
}
