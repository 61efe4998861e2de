//! Minimal text-level access to XML-like project files
//!
//! These helpers find and replace single elements and attributes in place,
//! leaving the rest of the document byte-for-byte intact.

use regex::{Captures, Regex};

fn element_regex(name: &str) -> Option<Regex> {
    let name = regex::escape(name);
    Regex::new(&format!(r"(?s)(<{name}(?:\s[^>]*)?>)(.*?)(</{name}\s*>)")).ok()
}

fn attribute_regex(name: &str) -> Option<Regex> {
    let name = regex::escape(name);
    Regex::new(&format!(r#"(\b{name}\s*=\s*")([^"]*)(")"#)).ok()
}

/// Trimmed text of the first `<name>` element; empty text counts as absent
pub fn element_text(text: &str, name: &str) -> Option<String> {
    let re = element_regex(name)?;
    let captures = re.captures(text)?;
    let value = captures.get(2)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Whether a `<name>` element (open or self-closing) is present
pub fn has_element(text: &str, name: &str) -> bool {
    let name = regex::escape(name);
    Regex::new(&format!(r"<{name}(?:\s[^>]*)?/?>"))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Replace the text of the first `<name>` element
///
/// Returns `None` when the element does not exist.
pub fn set_element_text(text: &str, name: &str, value: &str) -> Option<String> {
    let re = element_regex(name)?;
    if !re.is_match(text) {
        return None;
    }
    let replaced = re.replacen(text, 1, |caps: &Captures| {
        format!("{}{}{}", &caps[1], value, &caps[3])
    });
    Some(replaced.into_owned())
}

fn property_group_regex() -> Option<Regex> {
    Regex::new(r"(?s)<PropertyGroup(?:\s[^>]*)?>(.*?)</PropertyGroup\s*>").ok()
}

/// Trimmed text of the first `<name>` property, looking only inside
/// `<PropertyGroup>` bodies
pub fn property_text(text: &str, name: &str) -> Option<String> {
    let groups = property_group_regex()?;
    let found = groups
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| element_text(body.as_str(), name));
    found
}

/// Whether any `<PropertyGroup>` holds a `<name>` element
pub fn has_property(text: &str, name: &str) -> bool {
    let Some(groups) = property_group_regex() else {
        return false;
    };
    let found = groups
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .any(|body| has_element(body.as_str(), name));
    found
}

/// Replace the text of the first `<name>` property inside a `<PropertyGroup>`
///
/// Returns `None` when no group holds the property.
pub fn set_property_text(text: &str, name: &str, value: &str) -> Option<String> {
    let groups = property_group_regex()?;
    let body = groups
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find(|body| element_regex(name).is_some_and(|re| re.is_match(body.as_str())))?;
    let replaced = set_element_text(body.as_str(), name, value)?;

    let mut out = String::with_capacity(text.len() + value.len());
    out.push_str(&text[..body.start()]);
    out.push_str(&replaced);
    out.push_str(&text[body.end()..]);
    Some(out)
}

/// Set the `<name>` property, creating it in the first `<PropertyGroup>`
/// (or a new one) when missing
///
/// Elements of the same name outside property groups, such as a nested
/// `<PackageReference><Version>`, are left alone. Returns `None` if there is
/// no `</Project>` to insert a group into.
pub fn ensure_property(text: &str, name: &str, value: &str) -> Option<String> {
    if let Some(replaced) = set_property_text(text, name, value) {
        return Some(replaced);
    }

    let element = format!("<{name}>{value}</{name}>");

    let group = Regex::new(r"<PropertyGroup(?:\s[^>]*)?>").ok()?;
    if let Some(m) = group.find(text) {
        let mut out = String::with_capacity(text.len() + element.len() + 8);
        out.push_str(&text[..m.end()]);
        out.push_str("\n    ");
        out.push_str(&element);
        out.push_str(&text[m.end()..]);
        return Some(out);
    }

    let close = text.rfind("</Project>")?;
    let mut out = String::with_capacity(text.len() + element.len() + 40);
    out.push_str(&text[..close]);
    out.push_str("  <PropertyGroup>\n    ");
    out.push_str(&element);
    out.push_str("\n  </PropertyGroup>\n");
    out.push_str(&text[close..]);
    Some(out)
}

/// Value of attribute `name` inside a tag
pub fn attribute(tag: &str, name: &str) -> Option<String> {
    let re = attribute_regex(name)?;
    re.captures(tag)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Replace the value of attribute `name` inside a tag
///
/// Returns `None` when the attribute does not exist.
pub fn set_attribute(tag: &str, name: &str, value: &str) -> Option<String> {
    let re = attribute_regex(name)?;
    if !re.is_match(tag) {
        return None;
    }
    let replaced = re.replacen(tag, 1, |caps: &Captures| {
        format!("{}{}{}", &caps[1], value, &caps[3])
    });
    Some(replaced.into_owned())
}
