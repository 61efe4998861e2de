use crate::error::{CascadeError, Result};
use regex::Regex;

/// Sentinel pattern selecting every module in the change set
pub const ALL_CHANGED: &str = "+";

/// Glob-style module name pattern (e.g. "Company.Data.*", "Core?")
#[derive(Debug, Clone)]
pub struct ModulePattern {
    pub pattern: String,
    regex: Option<Regex>,
}

impl ModulePattern {
    /// Compile a pattern; `*` matches any run of characters, `?` a single one
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(CascadeError::config("Module pattern must not be empty"));
        }

        if pattern == ALL_CHANGED {
            return Ok(ModulePattern {
                pattern,
                regex: None,
            });
        }

        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(r"\*", ".*").replace(r"\?", ".");
        let regex = Regex::new(&format!("^{}$", regex_pattern)).map_err(|e| {
            CascadeError::config(format!("Invalid module pattern '{}': {}", pattern, e))
        })?;

        Ok(ModulePattern {
            pattern,
            regex: Some(regex),
        })
    }

    /// Whether this is the `"+"` sentinel
    pub fn is_all_changed(&self) -> bool {
        self.regex.is_none()
    }

    /// Check a module id against the pattern
    ///
    /// `in_change_set` tells whether the module is part of the change set,
    /// which is all the sentinel looks at.
    pub fn matches(&self, module_id: &str, in_change_set: bool) -> bool {
        match &self.regex {
            None => in_change_set,
            Some(re) => re.is_match(module_id),
        }
    }
}

/// A list of module patterns; matches if any pattern matches
#[derive(Debug, Clone, Default)]
pub struct ModuleFilter {
    patterns: Vec<ModulePattern>,
}

impl ModuleFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(ModulePattern::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(ModuleFilter { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, module_id: &str, in_change_set: bool) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(module_id, in_change_set))
    }
}
