//! NuGet `.nuspec` manifest access

use crate::domain::SemanticVersion;
use crate::error::{CascadeError, Result};
use crate::project::markup;
use regex::{Captures, Regex};

/// Package identity declared by a manifest
#[derive(Debug, Clone, PartialEq)]
pub struct NuspecIdentity {
    pub id: String,
    pub version: SemanticVersion,
}

/// Read `metadata/id` and `metadata/version`
pub fn read_identity(text: &str) -> Result<NuspecIdentity> {
    let id = markup::element_text(text, "id")
        .ok_or_else(|| CascadeError::project("nuspec has no <id>"))?;
    let version = match markup::element_text(text, "version") {
        Some(raw) => SemanticVersion::parse(&raw)?,
        None => SemanticVersion::default(),
    };
    Ok(NuspecIdentity { id, version })
}

/// Rewrite the package version and dependency versions
///
/// `dependency_version` maps a dependency id to its new version string, or
/// `None` to keep the recorded one.
pub fn rewrite<F>(text: &str, version: &str, dependency_version: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let updated = markup::set_element_text(text, "version", version)
        .ok_or_else(|| CascadeError::project("nuspec has no <version>"))?;

    let dependency = Regex::new(r"<dependency\b[^>]*>")
        .map_err(|e| CascadeError::project(format!("Invalid dependency pattern: {}", e)))?;

    let rewritten = dependency.replace_all(&updated, |caps: &Captures| {
        let tag = &caps[0];
        markup::attribute(tag, "id")
            .and_then(|id| dependency_version(&id))
            .and_then(|new_version| markup::set_attribute(tag, "version", &new_version))
            .unwrap_or_else(|| tag.to_string())
    });

    Ok(rewritten.into_owned())
}
