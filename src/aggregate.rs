use std::collections::HashSet;

use log::debug;

use crate::model::{Coordinates, DependencyRecord, ModuleProjectInfo};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSettings {
    /// Replaces the root artifact id in the aggregated coordinates.
    pub project_name: Option<String>,
    pub project_token: Option<String>,
}

/// Collapses the dependencies of all modules into one flat, de-duplicated project.
///
/// Records are visited parents first and keep the position of their first occurrence.
/// The input is left untouched.
pub fn aggregate(
    infos: &[ModuleProjectInfo],
    root: &Coordinates,
    settings: &AggregateSettings,
) -> ModuleProjectInfo {
    let mut seen = HashSet::new();
    let mut dependencies = Vec::new();
    let mut add = |record: &DependencyRecord| {
        if seen.insert(record.key()) {
            dependencies.push(record.detached());
        }
    };

    for info in infos {
        for record in &info.dependencies {
            add(record);
            record.descendants().into_iter().for_each(&mut add);
        }
    }

    let coordinates = match settings.project_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => root.with_artifact_id(name),
        _ => root.clone(),
    };
    debug!(
        "Aggregated {} modules into {} with {} dependencies",
        infos.len(),
        coordinates,
        dependencies.len()
    );

    ModuleProjectInfo {
        coordinates,
        parent_coordinates: None,
        project_token: settings.project_token.clone(),
        dependencies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        in_house::{flatten_in_house, InHouseRuleSpec, InHouseRules},
        model::ExclusionRule,
    };
    use pretty_assertions::assert_eq;

    fn record(
        artifact_id: &str,
        scope: &str,
        children: Vec<DependencyRecord>,
    ) -> DependencyRecord {
        DependencyRecord {
            scope: Some(scope.to_string()),
            children,
            ..DependencyRecord::new("org.acme", artifact_id, "1.0")
        }
    }

    fn module(artifact_id: &str, dependencies: Vec<DependencyRecord>) -> ModuleProjectInfo {
        ModuleProjectInfo {
            dependencies,
            project_token: Some(format!("{artifact_id}-token")),
            ..ModuleProjectInfo::new(Coordinates::new("org.acme", artifact_id, "1.0"))
        }
    }

    fn names(info: &ModuleProjectInfo) -> Vec<&str> {
        info.dependencies
            .iter()
            .map(|d| d.artifact_id.as_str())
            .collect()
    }

    fn root() -> Coordinates {
        Coordinates::new("org.acme", "parent", "1.0")
    }

    #[test]
    fn flatten_and_deduplicate_modules() {
        let infos = vec![
            module(
                "core",
                vec![record(
                    "a",
                    "compile",
                    vec![record("b", "compile", vec![record("c", "compile", vec![])])],
                )],
            ),
            module(
                "web",
                vec![
                    record("b", "runtime", vec![]),
                    record("d", "compile", vec![record("a", "compile", vec![])]),
                ],
            ),
        ];
        let original = infos.clone();

        let result = aggregate(&infos, &root(), &AggregateSettings::default());

        assert_eq!(names(&result), vec!["a", "b", "c", "d"]);
        assert!(result.dependencies.iter().all(|d| d.children.is_empty()));
        // first occurrence wins
        assert_eq!(result.dependencies[1].scope.as_deref(), Some("compile"));
        assert_eq!(result.coordinates, root());
        assert_eq!(result.project_token, None);
        assert_eq!(infos, original);
    }

    #[test]
    fn override_project_name_and_token() {
        let settings = AggregateSettings {
            project_name: Some("acme-platform".to_string()),
            project_token: Some("aggregate-token".to_string()),
        };
        let result = aggregate(&[], &root(), &settings);
        assert_eq!(
            result.coordinates,
            Coordinates::new("org.acme", "acme-platform", "1.0")
        );
        assert_eq!(result.project_token.as_deref(), Some("aggregate-token"));
        assert!(result.dependencies.is_empty());

        let blank = AggregateSettings {
            project_name: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(aggregate(&[], &root(), &blank).coordinates, root());
    }

    #[test]
    fn aggregating_twice_is_a_no_op() {
        let infos = vec![module(
            "core",
            vec![record("a", "compile", vec![record("b", "compile", vec![])])],
        )];
        let settings = AggregateSettings::default();

        let once = aggregate(&infos, &root(), &settings);
        let twice = aggregate(&[once.clone()], &root(), &settings);
        assert_eq!(twice, once);
    }

    #[test]
    fn no_double_counting_with_in_house_flattening() {
        let rules = InHouseRules::compile(&[InHouseRuleSpec {
            name_regex: Some("internal-.*".to_string()),
            ..Default::default()
        }])
        .unwrap();
        let flattened = flatten_in_house(
            vec![record(
                "internal-lib",
                "compile",
                vec![record("x", "compile", vec![record("y", "compile", vec![])])],
            )],
            &rules,
        );
        assert_eq!(flattened.len(), 3);

        let result = aggregate(
            &[module("core", flattened)],
            &root(),
            &AggregateSettings::default(),
        );
        assert_eq!(names(&result), vec!["internal-lib", "x", "y"]);
        // the copy reached through the tree comes first and keeps its exclusions
        assert!(!result.dependencies[1]
            .exclusions
            .contains(&ExclusionRule::match_all()));
    }
}
