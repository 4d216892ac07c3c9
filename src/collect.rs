//! Turns a module into dependency records, either from its resolved graph or,
//! when that cannot be resolved, from its declared dependencies alone.

use log::debug;

use crate::{
    fingerprint::fingerprint,
    matcher::LookupTable,
    model::{
        build::{DeclaredDependency, Module},
        DependencyRecord, Fingerprint,
    },
    resolver::{DependencyNode, GraphResolutionError, GraphResolver},
};

pub const SCOPE_TEST: &str = "test";
pub const SCOPE_PROVIDED: &str = "provided";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectSettings {
    /// Top-level graph dependencies in these scopes are pruned with their subtree.
    pub ignored_scopes: Vec<String>,
    /// Drops `test` scoped declarations when collecting direct dependencies.
    pub ignore_test_scope_dependencies: bool,
}

impl Default for CollectSettings {
    fn default() -> Self {
        CollectSettings {
            ignored_scopes: vec![SCOPE_TEST.to_string(), SCOPE_PROVIDED.to_string()],
            ignore_test_scope_dependencies: true,
        }
    }
}

impl CollectSettings {
    fn is_ignored(&self, scope: Option<&str>) -> bool {
        match scope {
            Some(scope) if !scope.trim().is_empty() => {
                self.ignored_scopes.iter().any(|ignored| ignored == scope)
            }
            _ => false,
        }
    }
}

/// Builds the dependency tree of the module from its resolved graph.
///
/// Fails as a whole when the graph cannot be resolved, no partial tree is returned.
pub fn collect_dependency_structure(
    module: &Module,
    resolver: &dyn GraphResolver,
    settings: &CollectSettings,
) -> Result<Vec<DependencyRecord>, GraphResolutionError> {
    let root = resolver.resolve(module)?;

    let records = root
        .children
        .iter()
        .filter(|node| {
            let scope = node.dependency.as_ref().and_then(|d| d.scope.as_deref());
            !settings.is_ignored(scope)
        })
        .filter_map(to_record)
        .collect::<Vec<_>>();

    debug!("*** Printing graph result for {} ***", module.id());
    for record in &records {
        debug_print_children(record, "");
    }

    Ok(records)
}

fn to_record(node: &DependencyNode) -> Option<DependencyRecord> {
    let dependency = node.dependency.as_ref()?;
    let artifact = &dependency.artifact;

    let fingerprint = fingerprint(artifact.file.as_deref());
    let system_path = match fingerprint {
        Fingerprint::NoFile => None,
        _ => artifact.file.clone(),
    };

    Some(DependencyRecord {
        group_id: artifact.group_id.clone(),
        artifact_id: artifact.artifact_id.clone(),
        version: artifact.version.clone(),
        scope: dependency.scope.clone(),
        classifier: artifact.classifier.clone(),
        optional: dependency.optional,
        dependency_type: artifact.artifact_type.clone(),
        system_path,
        fingerprint,
        exclusions: dependency.exclusions.clone(),
        children: node.children.iter().filter_map(to_record).collect(),
    })
}

fn debug_print_children(record: &DependencyRecord, prefix: &str) {
    debug!("{prefix}{record}");
    let prefix = format!("{prefix}   ");
    for child in &record.children {
        debug_print_children(child, &prefix);
    }
}

/// Records for the declared dependencies only, without transitive children.
/// Checksums come from the artifacts the build already resolved for the module.
pub fn collect_direct_dependencies(
    module: &Module,
    settings: &CollectSettings,
) -> Vec<DependencyRecord> {
    let lookup = LookupTable::build(&module.dependencies, &module.artifacts);

    module
        .dependencies
        .iter()
        .enumerate()
        .filter(|(_, dependency)| {
            // test scoped dependencies are not sent to the server
            !(settings.ignore_test_scope_dependencies
                && dependency.scope.as_deref() == Some(SCOPE_TEST))
        })
        .map(|(index, dependency)| {
            let mut record = declared_record(dependency);
            let file = lookup.get(index).and_then(|a| a.file.as_deref());
            record.fingerprint = fingerprint(file);
            record
        })
        .collect()
}

fn declared_record(dependency: &DeclaredDependency) -> DependencyRecord {
    DependencyRecord {
        group_id: dependency.group_id.clone(),
        artifact_id: dependency.artifact_id.clone(),
        version: dependency.version.clone(),
        scope: dependency.scope.clone(),
        classifier: dependency.classifier.clone(),
        optional: dependency.optional,
        dependency_type: dependency.dependency_type.clone(),
        system_path: dependency.system_path.clone(),
        fingerprint: Fingerprint::NoFile,
        exclusions: dependency.exclusions.clone(),
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        fingerprint::checksum,
        model::{build::BuildModel, ExclusionRule},
        resolver::NestedGraphResolver,
    };
    use pretty_assertions::assert_eq;
    use std::path::Path;

    struct FailingResolver;

    impl GraphResolver for FailingResolver {
        fn resolve(&self, module: &Module) -> Result<DependencyNode, GraphResolutionError> {
            Err(GraphResolutionError::Unresolved {
                coordinates: module.id(),
                cause: "network is unreachable".to_string(),
            })
        }
    }

    fn model(dir: &Path) -> BuildModel {
        std::fs::write(dir.join("guava-33.0.jar"), b"guava").unwrap();
        std::fs::write(dir.join("junit-4.13.jar"), b"junit").unwrap();
        std::fs::write(dir.join("failureaccess-1.0.jar"), b"failureaccess").unwrap();

        BuildModel::from_toml_str(
            r#"
            [[modules]]
            group_id = "org.acme"
            artifact_id = "core"
            version = "1.0"

            [[modules.dependencies]]
            group_id = "junit"
            artifact_id = "junit"
            version = "4.13"
            scope = "test"

            [[modules.dependencies]]
            group_id = "com.google.guava"
            artifact_id = "guava"
            version = "33.0"
            scope = "compile"
            exclusions = [{ group_id = "com.google.code.findbugs", artifact_id = "jsr305" }]

            [[modules.dependencies]]
            group_id = "javax.servlet"
            artifact_id = "servlet-api"
            version = "2.5"
            scope = "provided"

            [[modules.artifacts]]
            group_id = "junit"
            artifact_id = "junit"
            version = "4.13"
            file = "junit-4.13.jar"

            [[modules.artifacts]]
            group_id = "com.google.guava"
            artifact_id = "guava"
            version = "33.0"
            type = "jar"
            file = "guava-33.0.jar"

            [[modules.graph.children]]
            group_id = "junit"
            artifact_id = "junit"
            version = "4.13"
            scope = "test"
            file = "junit-4.13.jar"

            [[modules.graph.children]]
            group_id = "com.google.guava"
            artifact_id = "guava"
            version = "33.0"
            type = "jar"
            scope = "compile"
            file = "guava-33.0.jar"
            exclusions = [{ group_id = "com.google.code.findbugs", artifact_id = "jsr305" }]

            [[modules.graph.children.children]]
            group_id = "com.google.guava"
            artifact_id = "failureaccess"
            version = "1.0"
            scope = "test"
            file = "failureaccess-1.0.jar"

            [[modules.graph.children]]
            group_id = "javax.servlet"
            artifact_id = "servlet-api"
            version = "2.5"
            scope = "provided"
        "#,
        )
        .unwrap()
        .with_local_repository(dir)
    }

    #[test]
    fn build_tree_pruning_ignored_scopes() {
        let dir = tempfile::tempdir().unwrap();
        let model = model(dir.path());
        let module = &model.modules[0];

        let records =
            collect_dependency_structure(module, &NestedGraphResolver, &CollectSettings::default())
                .unwrap();

        assert_eq!(records.len(), 1);
        let guava = &records[0];
        assert_eq!(guava.artifact_id, "guava");
        assert_eq!(guava.dependency_type.as_deref(), Some("jar"));
        assert_eq!(
            guava.exclusions,
            vec![ExclusionRule::new("jsr305", "com.google.code.findbugs")]
        );
        assert_eq!(
            guava.checksum(),
            Some(&checksum(&dir.path().join("guava-33.0.jar")).unwrap())
        );
        assert_eq!(guava.system_path, Some(dir.path().join("guava-33.0.jar")));

        // only the top level is scope filtered
        assert_eq!(guava.children.len(), 1);
        assert_eq!(guava.children[0].artifact_id, "failureaccess");
        assert!(guava.children[0].checksum().is_some());
    }

    #[test]
    fn blank_scope_is_never_ignored() {
        let settings = CollectSettings {
            ignored_scopes: vec!["".to_string(), "test".to_string()],
            ..Default::default()
        };
        assert!(!settings.is_ignored(Some("")));
        assert!(!settings.is_ignored(None));
        assert!(settings.is_ignored(Some("test")));
    }

    #[test]
    fn build_tree_fails_as_a_whole() {
        let dir = tempfile::tempdir().unwrap();
        let model = model(dir.path());
        let result = collect_dependency_structure(
            &model.modules[0],
            &FailingResolver,
            &CollectSettings::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn collect_direct_dependencies_with_checksums() {
        let dir = tempfile::tempdir().unwrap();
        let model = model(dir.path());

        let records = collect_direct_dependencies(&model.modules[0], &CollectSettings::default());

        let names = records
            .iter()
            .map(|r| r.artifact_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["guava", "servlet-api"]);
        assert!(records.iter().all(|r| r.children.is_empty()));
        assert_eq!(
            records[0].checksum(),
            Some(&checksum(&dir.path().join("guava-33.0.jar")).unwrap())
        );
        assert_eq!(records[0].exclusions.len(), 1);
        assert_eq!(records[1].fingerprint, Fingerprint::NoFile);
    }

    #[test]
    fn collect_test_scope_when_not_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let model = model(dir.path());
        let settings = CollectSettings {
            ignore_test_scope_dependencies: false,
            ..Default::default()
        };

        let records = collect_direct_dependencies(&model.modules[0], &settings);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].artifact_id, "junit");
        assert!(records[0].checksum().is_some());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn unreadable_artifact_keeps_its_path() {
        let model = BuildModel::from_toml_str(
            r#"
            [[modules]]
            group_id = "org.acme"
            artifact_id = "core"
            version = "1.0"

            [[modules.graph.children]]
            group_id = "org.acme"
            artifact_id = "native"
            version = "1.0"
            scope = "compile"
            file = "/proc/self/mem"
        "#,
        )
        .unwrap();

        let records = collect_dependency_structure(
            &model.modules[0],
            &NestedGraphResolver,
            &CollectSettings::default(),
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert!(matches!(records[0].fingerprint, Fingerprint::Failed(_)));
        assert_eq!(records[0].checksum(), None);
        assert_eq!(
            records[0].system_path.as_deref(),
            Some(Path::new("/proc/self/mem"))
        );
    }
}
