use std::collections::{HashMap, HashSet};

use crate::model::build::{IndexedNode, Module, Resolution};

use super::{DependencyNode, GraphResolutionError, GraphResolver, NodeDependency};

/// Reads the build-wide node table, where nodes refer to their children by id.
/// A node may be shared by several parents. Within one module it is expanded under
/// the first parent reached in preorder; later references are emitted without children.
pub struct IndexedGraphResolver<'a> {
    resolution: &'a Resolution,
    nodes: HashMap<&'a str, &'a IndexedNode>,
}

impl<'a> IndexedGraphResolver<'a> {
    pub fn new(resolution: &'a Resolution) -> Self {
        let nodes = resolution
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node))
            .collect();
        IndexedGraphResolver { resolution, nodes }
    }

    fn expand(
        &self,
        module: &Module,
        ids: &'a [String],
        path: &mut Vec<&'a str>,
        expanded: &mut HashSet<&'a str>,
    ) -> Result<Vec<DependencyNode>, GraphResolutionError> {
        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            let node: &'a IndexedNode = self.nodes.get(id.as_str()).copied().ok_or_else(|| {
                GraphResolutionError::DanglingNode {
                    module: module.id(),
                    id: id.clone(),
                }
            })?;
            if path.contains(&id.as_str()) {
                return Err(GraphResolutionError::Cycle {
                    module: module.id(),
                    id: id.clone(),
                });
            }

            let dependency = NodeDependency::try_from(&node.entry)?;
            let children = if expanded.insert(id) {
                path.push(id);
                let children = self.expand(module, &node.children, path, expanded)?;
                path.pop();
                children
            } else {
                // omitted for duplicate
                Vec::new()
            };

            result.push(DependencyNode {
                dependency: Some(dependency),
                children,
            });
        }
        Ok(result)
    }
}

impl GraphResolver for IndexedGraphResolver<'_> {
    fn resolve(&self, module: &Module) -> Result<DependencyNode, GraphResolutionError> {
        let id = module.id();
        let root = self
            .resolution
            .roots
            .iter()
            .find(|root| root.module == id)
            .ok_or_else(|| GraphResolutionError::MissingGraph { module: id.clone() })?;
        if let Some(cause) = &root.unresolved {
            return Err(GraphResolutionError::Unresolved {
                coordinates: id,
                cause: cause.clone(),
            });
        }

        let children =
            self.expand(module, &root.children, &mut Vec::new(), &mut HashSet::new())?;
        Ok(DependencyNode::root(children))
    }
}
