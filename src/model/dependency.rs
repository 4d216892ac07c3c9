use std::{fmt::Display, path::PathBuf};

use serde::{Deserialize, Serialize, Serializer};

const MATCH_ALL: &str = "*";

/// Hex encoded content digest of an artifact file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    pub fn new(hex: impl Into<String>) -> Self {
        Checksum(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of fingerprinting the file backing a dependency.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Fingerprint {
    Computed(Checksum),
    /// There was no candidate file, or it does not exist.
    #[default]
    NoFile,
    /// The file exists but could not be read.
    Failed(String),
}

impl Fingerprint {
    pub fn checksum(&self) -> Option<&Checksum> {
        match self {
            Fingerprint::Computed(checksum) => Some(checksum),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub artifact_id: String,
    pub group_id: String,
}

impl ExclusionRule {
    pub fn new(artifact_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        ExclusionRule {
            artifact_id: artifact_id.into(),
            group_id: group_id.into(),
        }
    }

    /// Excludes every transitive dependency. Marks a record whose closure was already sent flat.
    pub fn match_all() -> Self {
        ExclusionRule::new(MATCH_ALL, MATCH_ALL)
    }

    pub fn is_match_all(&self) -> bool {
        self.artifact_id == MATCH_ALL && self.group_id == MATCH_ALL
    }
}

/// The part of a record that identifies the artifact. Scope, exclusions and children
/// do not take part, so the same artifact reached through different scopes collapses.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub dependency_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    pub optional: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_path: Option<PathBuf>,
    #[serde(rename = "sha256", serialize_with = "serialize_fingerprint")]
    pub fingerprint: Fingerprint,
    pub exclusions: Vec<ExclusionRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DependencyRecord>,
}

impl DependencyRecord {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        DependencyRecord {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone(),
            classifier: self.classifier.clone(),
            dependency_type: self.dependency_type.clone(),
        }
    }

    pub fn checksum(&self) -> Option<&Checksum> {
        self.fingerprint.checksum()
    }

    /// Copy of this record without its children.
    pub fn detached(&self) -> Self {
        DependencyRecord {
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Every record below this one, parents before their children.
    pub fn descendants(&self) -> Vec<&DependencyRecord> {
        let mut result = Vec::new();
        for child in &self.children {
            result.push(child);
            result.extend(child.descendants());
        }
        result
    }
}

impl Display for DependencyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(scope) = &self.scope {
            write!(f, ":{}", scope)?;
        }
        Ok(())
    }
}

fn serialize_fingerprint<S>(fingerprint: &Fingerprint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match fingerprint.checksum() {
        Some(checksum) => serializer.serialize_str(checksum.as_str()),
        None => serializer.serialize_none(),
    }
}
