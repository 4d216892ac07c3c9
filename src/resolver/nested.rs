use crate::model::build::{Module, NestedNode};

use super::{DependencyNode, GraphResolutionError, GraphResolver, NodeDependency};

/// Reads the graph each module carries in its `graph` table.
pub struct NestedGraphResolver;

impl GraphResolver for NestedGraphResolver {
    fn resolve(&self, module: &Module) -> Result<DependencyNode, GraphResolutionError> {
        let graph = module
            .graph
            .as_ref()
            .ok_or_else(|| GraphResolutionError::MissingGraph {
                module: module.id(),
            })?;
        if let Some(cause) = &graph.unresolved {
            return Err(GraphResolutionError::Unresolved {
                coordinates: module.id(),
                cause: cause.clone(),
            });
        }

        let children = graph
            .children
            .iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DependencyNode::root(children))
    }
}

fn convert(node: &NestedNode) -> Result<DependencyNode, GraphResolutionError> {
    Ok(DependencyNode {
        dependency: Some(NodeDependency::try_from(&node.entry)?),
        children: node
            .children
            .iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::build::BuildModel;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_nested_graph() {
        let model = BuildModel::from_toml_str(
            r#"
            [[modules]]
            group_id = "org.acme"
            artifact_id = "app"
            version = "1.0"

            [[modules.graph.children]]
            group_id = "com.google.guava"
            artifact_id = "guava"
            version = "33.0"
            scope = "compile"
            exclusions = [{ group_id = "com.google.code.findbugs", artifact_id = "jsr305" }]

            [[modules.graph.children.children]]
            group_id = "com.google.guava"
            artifact_id = "failureaccess"
            version = "1.0"
            scope = "compile"
        "#,
        )
        .unwrap();

        let root = NestedGraphResolver.resolve(&model.modules[0]).unwrap();
        assert!(root.dependency.is_none());
        let guava = root.children[0].dependency.as_ref().unwrap();
        assert_eq!(guava.artifact.artifact_id, "guava");
        assert_eq!(guava.scope.as_deref(), Some("compile"));
        assert_eq!(guava.exclusions.len(), 1);
        assert_eq!(
            root.children[0].children[0]
                .dependency
                .as_ref()
                .unwrap()
                .artifact
                .artifact_id,
            "failureaccess"
        );
    }

    #[test]
    fn fail_without_graph() {
        let model = BuildModel::from_toml_str(
            r#"
            [[modules]]
            group_id = "org.acme"
            artifact_id = "app"
            version = "1.0"
        "#,
        )
        .unwrap();
        assert_eq!(
            NestedGraphResolver.resolve(&model.modules[0]),
            Err(GraphResolutionError::MissingGraph {
                module: "org.acme:app:1.0".to_string()
            })
        );
    }

    #[test]
    fn fail_on_deep_unresolved_node() {
        let model = BuildModel::from_toml_str(
            r#"
            [[modules]]
            group_id = "org.acme"
            artifact_id = "app"
            version = "1.0"

            [[modules.graph.children]]
            group_id = "com.google.guava"
            artifact_id = "guava"
            version = "33.0"

            [[modules.graph.children.children]]
            group_id = "com.google.guava"
            artifact_id = "failureaccess"
            version = "1.0"
            unresolved = "Could not transfer metadata"
        "#,
        )
        .unwrap();
        assert!(matches!(
            NestedGraphResolver.resolve(&model.modules[0]),
            Err(GraphResolutionError::Unresolved { .. })
        ));
    }
}
