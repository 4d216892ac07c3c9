//! In-house (organization owned) dependencies are reported together with their
//! whole transitive closure as a flat list, so the policy service does not have
//! to expand internal code trees again.

use std::fmt::Display;

use log::debug;
use regex_lite::Regex;
use serde::Deserialize;

use crate::model::{DependencyRecord, ExclusionRule};

/// Rule as delivered by the rule source, before compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InHouseRuleSpec {
    #[serde(default)]
    pub name_regex: Option<String>,
    #[serde(default)]
    pub group_id_regex: Option<String>,
    #[serde(default)]
    pub artifact_id_regex: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InHouseRule {
    spec: InHouseRuleSpec,
    name: Option<Regex>,
    group_id: Option<Regex>,
    artifact_id: Option<Regex>,
}

impl InHouseRule {
    pub fn compile(spec: &InHouseRuleSpec) -> Result<Self, regex_lite::Error> {
        fn full_match(pattern: &Option<String>) -> Result<Option<Regex>, regex_lite::Error> {
            match pattern.as_deref().map(str::trim) {
                Some(pattern) if !pattern.is_empty() => {
                    Regex::new(&format!("^(?:{pattern})$")).map(Some)
                }
                _ => Ok(None),
            }
        }

        Ok(InHouseRule {
            spec: spec.clone(),
            name: full_match(&spec.name_regex)?,
            group_id: full_match(&spec.group_id_regex)?,
            artifact_id: full_match(&spec.artifact_id_regex)?,
        })
    }

    /// A name rule matches either the group id or the artifact id. Otherwise both the
    /// group id and the artifact id patterns have to match.
    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        match &self.name {
            Some(name) => name.is_match(group_id) || name.is_match(artifact_id),
            None => match (&self.group_id, &self.artifact_id) {
                (Some(group), Some(artifact)) => {
                    group.is_match(group_id) && artifact.is_match(artifact_id)
                }
                _ => false,
            },
        }
    }
}

impl Display for InHouseRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pattern = |p: &Option<String>| p.clone().unwrap_or_default();
        match &self.name {
            Some(_) => write!(f, "name={}", pattern(&self.spec.name_regex)),
            None => write!(
                f,
                "groupId={}, artifactId={}",
                pattern(&self.spec.group_id_regex),
                pattern(&self.spec.artifact_id_regex)
            ),
        }
    }
}

/// The organization's rule set. Fetched once per run and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct InHouseRules {
    rules: Vec<InHouseRule>,
}

impl InHouseRules {
    pub fn new(rules: Vec<InHouseRule>) -> Self {
        InHouseRules { rules }
    }

    pub fn compile(specs: &[InHouseRuleSpec]) -> Result<Self, regex_lite::Error> {
        specs
            .iter()
            .map(InHouseRule::compile)
            .collect::<Result<Vec<_>, _>>()
            .map(InHouseRules::new)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// First matching rule wins.
    pub fn classify(&self, record: &DependencyRecord) -> Option<&InHouseRule> {
        let rule = self
            .rules
            .iter()
            .find(|rule| rule.matches(&record.group_id, &record.artifact_id));
        if let Some(rule) = rule {
            debug!("{record} matches in-house rule {rule}");
        }
        rule
    }

    pub fn is_in_house(&self, record: &DependencyRecord) -> bool {
        self.classify(record).is_some()
    }
}

/// Emits every record once, as is. Each in-house record is followed by all of its
/// descendants as childless top-level records, marked with a single match-all exclusion.
pub fn flatten_in_house(
    records: Vec<DependencyRecord>,
    rules: &InHouseRules,
) -> Vec<DependencyRecord> {
    if rules.is_empty() {
        return records;
    }

    let mut result = Vec::with_capacity(records.len());
    for record in records {
        let flattened = if rules.is_in_house(&record) {
            record
                .descendants()
                .into_iter()
                .map(|descendant| DependencyRecord {
                    exclusions: vec![ExclusionRule::match_all()],
                    ..descendant.detached()
                })
                .collect()
        } else {
            Vec::new()
        };
        result.push(record);
        result.extend(flattened);
    }
    result
}
