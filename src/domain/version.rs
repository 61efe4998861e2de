use crate::domain::prerelease::PreRelease;
use crate::error::{CascadeError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Dotted numeric version with an optional pre-release tag
///
/// The core may have any number of components (`1`, `1.0.5`, `1.0.2.0`).
/// Cores compare element-wise with missing trailing components read as zero,
/// so `1.0` equals `1.0.0`. A release ranks above any pre-release of the same
/// core.
#[derive(Debug, Clone, Eq)]
pub struct SemanticVersion {
    core: Vec<u64>,
    pre_release: Option<PreRelease>,
}

impl SemanticVersion {
    /// Create a release version from its numeric components
    ///
    /// An empty slice yields the default version `1`.
    pub fn new(core: &[u64]) -> Self {
        let core = if core.is_empty() {
            vec![1]
        } else {
            core.to_vec()
        };
        SemanticVersion {
            core,
            pre_release: None,
        }
    }

    /// Parse a version string (e.g., "1.0.5" or "1.2.0-alpha1")
    ///
    /// Splits on the first `-`; everything after it is the pre-release tag.
    /// Empty input yields the default version `1`.
    ///
    /// # Returns
    /// * `Ok(SemanticVersion)` - Parsed version
    /// * `Err(CascadeError::Format)` - If a core segment is not a non-negative integer
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(SemanticVersion::default());
        }

        let (core_part, tag_part) = match text.split_once('-') {
            Some((core, tag)) => (core, Some(tag)),
            None => (text, None),
        };

        let core = core_part
            .split('.')
            .map(|segment| {
                segment.parse::<u64>().map_err(|_| {
                    CascadeError::format(format!(
                        "Invalid version component '{}' in '{}'",
                        segment, text
                    ))
                })
            })
            .collect::<Result<Vec<u64>>>()?;

        let pre_release = match tag_part {
            Some(tag) => Some(PreRelease::parse(tag).map_err(|e| {
                CascadeError::format(format!("Invalid version '{}': {}", text, e))
            })?),
            None => None,
        };

        Ok(SemanticVersion { core, pre_release })
    }

    /// Numeric components
    pub fn core(&self) -> &[u64] {
        &self.core
    }

    pub fn pre_release(&self) -> Option<&PreRelease> {
        self.pre_release.as_ref()
    }

    /// Bump the least significant part of the version in place
    ///
    /// - With a pre-release tag: the tag's trailing number is incremented
    ///   (`1.0.5-alpha3` -> `1.0.5-alpha4`, `1.0.5-alpha` -> `1.0.5-alpha2`).
    /// - Without one and with a non-empty `signature`: a new pre-release line
    ///   is started (`1.2.0` + `alpha` -> `1.2.0-alpha1`).
    /// - Otherwise the last core component is incremented (`1.0.5` -> `1.0.6`).
    ///
    /// Mutates `self`; clone first when the original must survive.
    pub fn increment_tail(&mut self, signature: &str) -> Result<()> {
        if let Some(tag) = self.pre_release.as_mut() {
            tag.increment();
            return Ok(());
        }

        if !signature.is_empty() {
            self.pre_release = Some(PreRelease::first_of(signature)?);
            return Ok(());
        }

        self.increment_core_tail();
        Ok(())
    }

    /// Increment the last numeric component, leaving any tag untouched
    pub fn increment_core_tail(&mut self) {
        if let Some(last) = self.core.last_mut() {
            *last = last.saturating_add(1);
        }
    }

    /// Render with at least `min_components` numeric components
    ///
    /// Shorter cores are right-padded with `.0`; longer cores are kept whole.
    /// The `-<tag>` suffix is appended when `include_pre_release` is set.
    pub fn render(&self, min_components: usize, include_pre_release: bool) -> String {
        let width = self.core.len().max(min_components);
        self.render_width(width, include_pre_release)
    }

    /// Render with exactly `components` numeric components
    ///
    /// Pads with `.0` or truncates as needed. Assembly metadata requires a
    /// fixed four-part version, which is what this is for.
    pub fn render_fixed(&self, components: usize, include_pre_release: bool) -> String {
        self.render_width(components.max(1), include_pre_release)
    }

    fn render_width(&self, width: usize, include_pre_release: bool) -> String {
        let mut rendered = (0..width)
            .map(|i| self.core.get(i).copied().unwrap_or(0).to_string())
            .collect::<Vec<_>>()
            .join(".");

        if include_pre_release {
            if let Some(tag) = &self.pre_release {
                rendered.push('-');
                rendered.push_str(&tag.to_string());
            }
        }
        rendered
    }
}

/// Compare two optional versions; absence is the minimum
///
/// Returns -1, 0 or 1.
pub fn compare(a: Option<&SemanticVersion>, b: Option<&SemanticVersion>) -> i32 {
    match a.cmp(&b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

impl Default for SemanticVersion {
    fn default() -> Self {
        SemanticVersion::new(&[1])
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.core.len().max(other.core.len());
        for i in 0..width {
            let a = self.core.get(i).copied().unwrap_or(0);
            let b = other.core.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        match (&self.pre_release, &other.pre_release) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl FromStr for SemanticVersion {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(0, true))
    }
}
