use std::collections::HashMap;

use crate::model::build::{DeclaredDependency, ResolvedArtifact, DEFAULT_PACKAGING};

/// Whether `artifact` is what the build resolved for the `declared` dependency.
///
/// Coordinates must be equal. A declaration without classifier only matches an artifact
/// without (or with a blank) classifier, and a declaration without type only matches an
/// artifact without type or of the default packaging.
pub fn matches(declared: &DeclaredDependency, artifact: &ResolvedArtifact) -> bool {
    if declared.group_id != artifact.group_id
        || declared.artifact_id != artifact.artifact_id
        || declared.version != artifact.version
    {
        return false;
    }

    let classifier_matches = match &declared.classifier {
        None => artifact
            .classifier
            .as_deref()
            .map_or(true, |c| c.trim().is_empty()),
        Some(classifier) => artifact.classifier.as_ref() == Some(classifier),
    };

    classifier_matches
        && match &declared.dependency_type {
            None => artifact
                .artifact_type
                .as_deref()
                .map_or(true, |t| t == DEFAULT_PACKAGING),
            Some(dependency_type) => artifact.artifact_type.as_ref() == Some(dependency_type),
        }
}

/// Declared dependency (by position) to the artifact resolved for it.
pub struct LookupTable<'a> {
    entries: HashMap<usize, &'a ResolvedArtifact>,
}

impl<'a> LookupTable<'a> {
    /// When several artifacts match a declaration the last one wins.
    pub fn build(declared: &[DeclaredDependency], artifacts: &'a [ResolvedArtifact]) -> Self {
        let mut entries = HashMap::new();
        for (index, dependency) in declared.iter().enumerate() {
            for artifact in artifacts {
                if matches(dependency, artifact) {
                    entries.insert(index, artifact);
                }
            }
        }
        LookupTable { entries }
    }

    pub fn get(&self, index: usize) -> Option<&'a ResolvedArtifact> {
        self.entries.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
