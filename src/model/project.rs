use serde::Serialize;

use super::{Coordinates, DependencyRecord};

/// One reported unit: a module of the build, or the whole build when aggregated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleProjectInfo {
    pub coordinates: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_token: Option<String>,
    pub dependencies: Vec<DependencyRecord>,
}

impl ModuleProjectInfo {
    pub fn new(coordinates: Coordinates) -> Self {
        ModuleProjectInfo {
            coordinates,
            parent_coordinates: None,
            project_token: None,
            dependencies: Vec::new(),
        }
    }
}
