//! Pre-release tag handling
//!
//! A tag is the free-form text after the first `-` of a version string
//! (`alpha1`, `beta`, `rc12`, `preview-3`). Tags are ordered with a
//! numeric-aware natural sort: the label before the trailing digits is compared
//! case-insensitively, then the trailing number numerically. A tag without
//! trailing digits counts as iteration 1.

use crate::error::{CascadeError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Pre-release tag of a version, e.g. `alpha3`
#[derive(Debug, Clone, Eq)]
pub struct PreRelease {
    label: String,
    digits: Option<String>,
}

impl PreRelease {
    /// Parse a pre-release tag
    ///
    /// # Returns
    /// * `Ok(PreRelease)` - Parsed tag
    /// * `Err` - If the tag is empty, contains whitespace or `+`, or its
    ///   trailing number does not fit in a `u64`
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Start a new pre-release line from a signature (`alpha` -> `alpha1`)
    pub fn first_of(signature: &str) -> Result<Self> {
        let mut tag = Self::parse(signature)?;
        if tag.digits.is_none() {
            tag.digits = Some("1".to_string());
        }
        Ok(tag)
    }

    /// Label part without the trailing digits
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Trailing iteration number; an unmarked tag is implicitly iteration 1
    pub fn iteration(&self) -> u64 {
        self.explicit_iteration().unwrap_or(1)
    }

    fn explicit_iteration(&self) -> Option<u64> {
        self.digits.as_deref().and_then(|d| d.parse::<u64>().ok())
    }

    /// Bump the trailing number (`alpha3` -> `alpha4`, `alpha` -> `alpha2`)
    pub fn increment(&mut self) {
        let next = self.iteration().saturating_add(1);
        self.digits = Some(next.to_string());
    }
}

impl FromStr for PreRelease {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(CascadeError::format("Empty pre-release tag"));
        }
        if s.chars().any(|c| c.is_whitespace() || c == '+') {
            return Err(CascadeError::format(format!(
                "Invalid pre-release tag: '{}'",
                s
            )));
        }

        let split = s
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i);

        let (label, digits) = match split {
            Some(i) => (&s[..i], Some(s[i..].to_string())),
            None => (s, None),
        };
        if digits.as_deref().is_some_and(|d| d.parse::<u64>().is_err()) {
            return Err(CascadeError::format(format!(
                "Pre-release iteration too large: '{}'",
                s
            )));
        }

        Ok(PreRelease {
            label: label.to_string(),
            digits,
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(digits) = &self.digits {
            write!(f, "{}", digits)?;
        }
        Ok(())
    }
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label
            .to_ascii_lowercase()
            .cmp(&other.label.to_ascii_lowercase())
            .then_with(|| self.iteration().cmp(&other.iteration()))
            .then_with(|| self.explicit_iteration().cmp(&other.explicit_iteration()))
            .then_with(|| self.to_string().cmp(&other.to_string()))
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PreRelease {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
