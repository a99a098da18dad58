#![deny(missing_docs)]

//! # URL Templates
//!
//! Placeholder handling shared by server URLs (`https://{env}.example.com`)
//! and path templates (`/pets/{petId}`).
//!
//! Path normalization splits a template on `/` and replaces every `{name}`
//! placeholder with a wildcard, so `/pets/{id}` and `/pets/{petId}` normalize
//! to the same token sequence and are treated as the same route.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)}").expect("Invalid regex constant"));

const WILDCARD: &str = "{}";

/// Returns the placeholder names of `template` in order of appearance (repeats included).
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Replaces every placeholder with the value `lookup` returns for it.
///
/// Placeholders without a value are left untouched.
pub fn expand<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    PLACEHOLDER_RE
        .replace_all(template, |cap: &regex::Captures<'_>| {
            lookup(&cap[1])
                .map(str::to_string)
                .unwrap_or_else(|| cap[0].to_string())
        })
        .into_owned()
}

/// A path template with placeholder names erased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedTemplate(Vec<String>);

impl NormalizedTemplate {
    /// The normalized segments; placeholder segments read `{}`.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for NormalizedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Normalizes a path template for collision checks.
pub fn normalize(template: &str) -> NormalizedTemplate {
    NormalizedTemplate(
        template
            .split('/')
            .map(|segment| PLACEHOLDER_RE.replace_all(segment, WILDCARD).into_owned())
            .collect(),
    )
}

/// True when the two templates are indistinguishable at the routing level.
pub fn collides(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(
            placeholders("https://{env}.example.com:{port}/{base}"),
            vec!["env", "port", "base"]
        );
        assert!(placeholders("/pets").is_empty());
    }

    #[test]
    fn test_placeholders_keeps_repeats() {
        assert_eq!(placeholders("https://{env}.{env}.example.com"), vec!["env", "env"]);
    }

    #[test]
    fn test_expand_known_and_unknown() {
        let expanded = expand("https://{env}.example.com/{base}", |name| match name {
            "env" => Some("api"),
            _ => None,
        });
        assert_eq!(expanded, "https://api.example.com/{base}");
    }

    #[test]
    fn test_normalize_erases_names() {
        let normalized = normalize("/pets/{petId}/toys/{toyId}");
        assert_eq!(normalized.to_string(), "/pets/{}/toys/{}");
        assert_eq!(normalized.segments().len(), 5);
    }

    #[test]
    fn test_collision_regardless_of_names() {
        assert!(collides("/pets/{id}", "/pets/{petId}"));
        assert!(!collides("/pets/{id}", "/pets/mine"));
        assert!(!collides("/pets/{id}", "/pets/{id}/toys"));
        assert!(!collides("/pets", "/pets/"));
    }

    #[test]
    fn test_partial_segment_placeholders() {
        assert!(collides("/files/{name}.json", "/files/{id}.json"));
        assert!(!collides("/files/{name}.json", "/files/{name}"));
    }
}
