use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::model::ParseError;

/// Identifies a module or an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Coordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinates {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Coordinates {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Same coordinates under another artifact id.
    pub fn with_artifact_id(&self, artifact_id: impl Into<String>) -> Self {
        Coordinates {
            artifact_id: artifact_id.into(),
            ..self.clone()
        }
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl FromStr for Coordinates {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group_id), Some(artifact_id), Some(version), None)
                if !group_id.is_empty() && !artifact_id.is_empty() && !version.is_empty() =>
            {
                Ok(Coordinates::new(group_id, artifact_id, version))
            }
            _ => Err(ParseError::InvalidModuleId(s.to_string())),
        }
    }
}
