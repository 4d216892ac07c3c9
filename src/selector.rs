use log::{debug, info};
use regex_lite::Regex;

use crate::model::build::Module;

/// A simple glob: `*` matches any sequence of characters, everything else is literal.
#[derive(Debug, Clone)]
pub struct ModulePattern {
    source: String,
    regex: Option<Regex>,
}

impl ModulePattern {
    pub fn new(pattern: &str) -> Self {
        let regex = if pattern.is_empty() {
            None
        } else {
            let escaped = regex_lite::escape(pattern).replace("\\*", ".*");
            Regex::new(&format!("^{escaped}$")).ok()
        };
        ModulePattern {
            source: pattern.to_string(),
            regex,
        }
    }

    /// Empty patterns never match.
    pub fn matches(&self, value: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(value))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Whether `value` matches the glob `pattern`. Absent patterns and values never match.
pub fn glob_matches(pattern: Option<&str>, value: Option<&str>) -> bool {
    match (pattern, value) {
        (Some(pattern), Some(value)) => ModulePattern::new(pattern).matches(value),
        _ => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModuleSelector {
    pub ignore_pom_modules: bool,
    /// Skips the root module.
    pub ignore: bool,
    pub includes: Vec<ModulePattern>,
    pub excludes: Vec<ModulePattern>,
}

impl ModuleSelector {
    pub fn new(
        ignore_pom_modules: bool,
        ignore: bool,
        includes: &[String],
        excludes: &[String],
    ) -> Self {
        ModuleSelector {
            ignore_pom_modules,
            ignore,
            includes: includes.iter().map(|p| ModulePattern::new(p)).collect(),
            excludes: excludes.iter().map(|p| ModulePattern::new(p)).collect(),
        }
    }

    /// Decides whether the module takes part in the run. The first applicable rule wins:
    /// pom modules when ignored, then the root module's ignore flag, then excludes,
    /// then includes. Everything else is processed.
    pub fn should_process(&self, module: &Module, is_root: bool) -> bool {
        if self.ignore_pom_modules && module.is_pom() {
            info!("Skipping {} (ignorePomModules=true)", module.id());
            false
        } else if is_root {
            if self.ignore {
                info!("Skipping {} (marked as ignored)", module.id());
            }
            !self.ignore
        } else if matches_any(module, &self.excludes) {
            info!("Skipping {} (marked as excluded)", module.id());
            false
        } else {
            if matches_any(module, &self.includes) {
                debug!("Including {} (marked as included)", module.id());
            }
            true
        }
    }
}

fn matches_any(module: &Module, patterns: &[ModulePattern]) -> bool {
    let id = module.id();
    patterns
        .iter()
        .any(|p| p.matches(&module.artifact_id) || p.matches(&id))
}
