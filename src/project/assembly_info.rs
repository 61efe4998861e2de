//! `AssemblyInfo.cs` version attributes for classic .NET Framework projects

use crate::domain::SemanticVersion;
use regex::{Captures, Regex};

const ASSEMBLY_VERSION: &str = "AssemblyVersion";
const ASSEMBLY_FILE_VERSION: &str = "AssemblyFileVersion";

fn attribute_line(attribute: &str) -> Option<Regex> {
    Regex::new(&format!(
        r#"(?m)^(\s*\[assembly:\s*{attribute}\(\s*")([^"]*)("\s*\)\])"#
    ))
    .ok()
}

fn read_attribute(text: &str, attribute: &str) -> Option<SemanticVersion> {
    let re = attribute_line(attribute)?;
    let caps = re.captures(text)?;
    SemanticVersion::parse(caps.get(2)?.as_str()).ok()
}

fn rewrite_attribute(text: &str, attribute: &str, value: &str) -> String {
    match attribute_line(attribute) {
        Some(re) => re
            .replace_all(text, |caps: &Captures| {
                format!("{}{}{}", &caps[1], value, &caps[3])
            })
            .into_owned(),
        None => text.to_string(),
    }
}

/// Read `(AssemblyVersion, AssemblyFileVersion)`
///
/// Missing or unparseable values (e.g. wildcard `1.0.*`) come back as `None`.
pub fn read_versions(text: &str) -> (Option<SemanticVersion>, Option<SemanticVersion>) {
    (
        read_attribute(text, ASSEMBLY_VERSION),
        read_attribute(text, ASSEMBLY_FILE_VERSION),
    )
}

/// Rewrite the selected attributes; `None` leaves an attribute untouched
pub fn rewrite(text: &str, assembly_version: Option<&str>, file_version: Option<&str>) -> String {
    let mut out = text.to_string();
    if let Some(value) = assembly_version {
        out = rewrite_attribute(&out, ASSEMBLY_VERSION, value);
    }
    if let Some(value) = file_version {
        out = rewrite_attribute(&out, ASSEMBLY_FILE_VERSION, value);
    }
    out
}
