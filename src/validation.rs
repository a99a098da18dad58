#![deny(missing_docs)]

//! # Validation Engine
//!
//! Pure, side-effect-free checks shared by every constructor. Each check
//! returns `Ok(())` or the `AppError` describing the violated rule and the
//! offending field path.
//!
//! - `check_required`: value present and non-empty.
//! - `check_format`: URL, e-mail, semver, `$ref`, response code, media range,
//!   path template and runtime expression syntax.
//! - `check_enum`: value within a permitted set.
//! - `check_mutually_exclusive`: at most one of a group of fields set.
//! - `check_unique`: first repeated key in declaration order.

use crate::error::{AppError, AppResult, FormatKind};
use crate::field_path::FieldPath;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::LazyLock;
use url::Url;

static RESPONSE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(default|[1-5][0-9]{2}|[1-5]XX)$").expect("Invalid regex constant"));

static MEDIA_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$&^_.+*-]+/[A-Za-z0-9!#$&^_.+*-]+(\s*;\s*[^;]+)*$")
        .expect("Invalid regex constant")
});

static EXPRESSION_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)}").expect("Invalid regex constant"));

/// Values that can be "absent or empty".
pub trait Presence {
    /// True when the value counts as provided.
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        self.as_str().is_present()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Presence for IndexMap<K, V> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

/// Fails with `MissingRequiredField` when `value` is absent or empty.
pub fn check_required<T: Presence + ?Sized>(value: &T, path: &FieldPath) -> AppResult<()> {
    if value.is_present() {
        Ok(())
    } else {
        Err(AppError::MissingRequiredField(path.clone()))
    }
}

/// Fails with `InvalidFormat` when `value` does not parse as `kind`.
pub fn check_format(value: &str, kind: FormatKind, path: &FieldPath) -> AppResult<()> {
    let valid = match kind {
        FormatKind::Url => is_valid_url(value),
        FormatKind::Email => is_valid_email(value),
        FormatKind::Semver => semver::Version::parse(value).is_ok(),
        FormatKind::ReferenceExpression => is_valid_reference(value),
        FormatKind::ResponseCode => RESPONSE_CODE_RE.is_match(value),
        FormatKind::MediaRange => MEDIA_RANGE_RE.is_match(value.trim()),
        FormatKind::PathTemplate => is_valid_path_template(value),
        FormatKind::RuntimeExpression => is_valid_runtime_expression(value),
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidFormat {
            path: path.clone(),
            kind,
            value: value.to_string(),
        })
    }
}

/// Fails with `InvalidEnumValue` when `value` is not one of `allowed`.
pub fn check_enum<T: Display>(value: &str, allowed: &[T], path: &FieldPath) -> AppResult<()> {
    parse_enum(value, allowed, path).map(|_| ())
}

/// Returns the member of `allowed` whose display form is `value`.
///
/// Fails with `InvalidEnumValue` like [`check_enum`].
pub fn parse_enum<'a, T: Display>(
    value: &str,
    allowed: &'a [T],
    path: &FieldPath,
) -> AppResult<&'a T> {
    if let Some(found) = allowed.iter().find(|candidate| candidate.to_string() == value) {
        return Ok(found);
    }
    Err(AppError::InvalidEnumValue {
        path: path.clone(),
        got: value.to_string(),
        allowed: allowed.iter().map(ToString::to_string).collect(),
    })
}

/// Fails with `MutuallyExclusiveFieldsSet` when more than one `(name, is_set)` pair is set.
pub fn check_mutually_exclusive(fields: &[(&str, bool)], path: &FieldPath) -> AppResult<()> {
    let set: Vec<String> = fields
        .iter()
        .filter(|(_, is_set)| *is_set)
        .map(|(name, _)| name.to_string())
        .collect();

    if set.len() > 1 {
        return Err(AppError::MutuallyExclusiveFieldsSet {
            path: path.clone(),
            fields: set,
        });
    }
    Ok(())
}

/// Fails with `DuplicateKey` on the first item whose key was already seen.
///
/// Items for which `key_fn` returns `None` take no part in the check. The
/// reported path is `path[i]` where `i` is the position of the repeat.
pub fn check_unique<I, T, K, F>(items: I, mut key_fn: F, path: &FieldPath) -> AppResult<()>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> Option<K>,
    K: Eq + Hash + Display,
{
    let mut seen: HashMap<K, usize> = HashMap::new();
    for (idx, item) in items.into_iter().enumerate() {
        let Some(key) = key_fn(&item) else {
            continue;
        };
        if seen.contains_key(&key) {
            return Err(AppError::DuplicateKey {
                path: path.index(idx),
                key: key.to_string(),
            });
        }
        seen.insert(key, idx);
    }
    Ok(())
}

fn is_valid_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    Url::parse(value).is_ok()
}

/// True for absolute URIs and for relative references that resolve against a base URL.
pub(crate) fn is_valid_uri_reference(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    Url::parse(value)
        .or_else(|_| Url::parse("https://example.com").and_then(|base| base.join(value)))
        .is_ok()
}

/// A single `@` between a non-empty local part and a domain.
///
/// The domain must contain a dot and may neither start nor end with one.
/// Whitespace is rejected anywhere; no other character classes are checked.
fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_valid_reference(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    if let Some(pointer) = value.strip_prefix('#') {
        return pointer.is_empty() || is_valid_json_pointer(pointer);
    }
    if !is_valid_uri_reference(value) {
        return false;
    }
    match value.split_once('#') {
        Some((_, fragment)) => fragment.is_empty() || is_valid_json_pointer(fragment),
        None => true,
    }
}

fn is_valid_json_pointer(pointer: &str) -> bool {
    if !pointer.starts_with('/') {
        return false;
    }
    // `~` must be followed by `0` or `1`.
    let bytes = pointer.as_bytes();
    bytes.iter().enumerate().all(|(idx, b)| {
        *b != b'~' || matches!(bytes.get(idx + 1), Some(b'0') | Some(b'1'))
    })
}

fn is_valid_path_template(value: &str) -> bool {
    if !value.starts_with('/') {
        return false;
    }
    let mut depth = 0usize;
    let mut name_len = 0usize;
    for c in value.chars() {
        match c {
            '{' => {
                if depth > 0 {
                    return false;
                }
                depth = 1;
                name_len = 0;
            }
            '}' => {
                if depth == 0 || name_len == 0 {
                    return false;
                }
                depth = 0;
            }
            '/' | '?' | '#' if depth > 0 => return false,
            '?' | '#' => return false,
            c if c.is_whitespace() => return false,
            _ => {
                if depth > 0 {
                    name_len += 1;
                }
            }
        }
    }
    depth == 0
}

fn is_valid_runtime_expression(value: &str) -> bool {
    if value.trim().is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut blocks = 0usize;
    for cap in EXPRESSION_BLOCK_RE.captures_iter(value) {
        blocks += 1;
        if !is_valid_expression_body(&cap[1]) {
            return false;
        }
    }
    if blocks == 0 {
        // A constant callback URL.
        return is_valid_url(value);
    }
    // Unbalanced braces around or between blocks.
    let stripped = EXPRESSION_BLOCK_RE.replace_all(value, "");
    !stripped.contains('{') && !stripped.contains('}')
}

fn is_valid_expression_body(body: &str) -> bool {
    match body {
        "$url" | "$method" | "$statusCode" => true,
        _ => {
            let source = body
                .strip_prefix("$request.")
                .or_else(|| body.strip_prefix("$response."));
            match source {
                Some(source) => {
                    source.starts_with("header.")
                        || source.starts_with("query.")
                        || source.starts_with("path.")
                        || source == "body"
                        || source.starts_with("body#/")
                }
                None => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(name: &str) -> FieldPath {
        FieldPath::from(name)
    }

    #[test]
    fn test_check_required_rejects_blank_and_absent() {
        assert!(check_required("Store", &at("title")).is_ok());
        assert_eq!(
            check_required("   ", &at("title")),
            Err(AppError::MissingRequiredField(at("title")))
        );
        let absent: Option<String> = None;
        assert!(check_required(&absent, &at("email")).is_err());
        let empty: Vec<u8> = Vec::new();
        assert!(check_required(&empty, &at("content")).is_err());
    }

    #[test]
    fn test_url_format() {
        assert!(check_format("https://example.com/tos", FormatKind::Url, &at("url")).is_ok());
        let err = check_format("not a url", FormatKind::Url, &at("url")).unwrap_err();
        assert_eq!(format!("{err}"), "url: 'not a url' is not a valid url");
        assert!(check_format("/relative", FormatKind::Url, &at("url")).is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(check_format("support@example.com", FormatKind::Email, &at("email")).is_ok());
        assert!(check_format("not-an-email", FormatKind::Email, &at("email")).is_err());
        assert!(check_format("a@b@example.com", FormatKind::Email, &at("email")).is_err());
        assert!(check_format("me@localhost", FormatKind::Email, &at("email")).is_err());
        assert!(check_format("a@.example.com", FormatKind::Email, &at("email")).is_err());
        assert!(check_format("a@example.com.", FormatKind::Email, &at("email")).is_err());
        assert!(check_format("@example.com", FormatKind::Email, &at("email")).is_err());
        assert!(check_format("first last@example.com", FormatKind::Email, &at("email")).is_err());
    }

    #[test]
    fn test_semver_format() {
        assert!(check_format("3.0.3", FormatKind::Semver, &at("openapi")).is_ok());
        assert!(check_format("3.0", FormatKind::Semver, &at("openapi")).is_err());
    }

    #[test]
    fn test_reference_format() {
        let path = at("$ref");
        for ok in [
            "#/components/schemas/Pet",
            "#",
            "Pet.yaml",
            "https://example.com/defs.yaml#/Pet",
            "../common.yaml#/components/schemas/Error",
        ] {
            assert!(check_format(ok, FormatKind::ReferenceExpression, &path).is_ok(), "{ok}");
        }
        for bad in ["", "#components", "#/a~2b", "has space.yaml"] {
            assert!(check_format(bad, FormatKind::ReferenceExpression, &path).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_response_code_format() {
        let path = at("responses");
        for ok in ["200", "404", "2XX", "default"] {
            assert!(check_format(ok, FormatKind::ResponseCode, &path).is_ok());
        }
        for bad in ["600", "2xx", "ok", "20"] {
            assert!(check_format(bad, FormatKind::ResponseCode, &path).is_err());
        }
    }

    #[test]
    fn test_media_range_format() {
        let path = at("content");
        for ok in ["application/json", "text/*", "*/*", "text/plain; charset=utf-8"] {
            assert!(check_format(ok, FormatKind::MediaRange, &path).is_ok(), "{ok}");
        }
        for bad in ["json", "application/", "a/b/c"] {
            assert!(check_format(bad, FormatKind::MediaRange, &path).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_path_template_format() {
        let path = at("template");
        for ok in ["/", "/pets", "/pets/{petId}", "/files/{name}.{ext}"] {
            assert!(check_format(ok, FormatKind::PathTemplate, &path).is_ok(), "{ok}");
        }
        for bad in ["pets", "/pets/{", "/pets/{}", "/a/{b{c}}", "/a?b=1", "/a/{b/c}"] {
            assert!(check_format(bad, FormatKind::PathTemplate, &path).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_runtime_expression_format() {
        let path = at("callbacks");
        for ok in [
            "{$request.body#/callbackUrl}",
            "http://notify.example.com?id={$request.body#/id}&email={$request.query.email}",
            "{$url}/events",
            "https://static.example.com/hook",
        ] {
            assert!(check_format(ok, FormatKind::RuntimeExpression, &path).is_ok(), "{ok}");
        }
        for bad in ["{request.body}", "{$request.cookie.x}", "", "{$url"] {
            assert!(check_format(bad, FormatKind::RuntimeExpression, &path).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_check_enum() {
        assert!(check_enum("query", &["query", "header"], &at("in")).is_ok());
        let err = check_enum("body", &["query", "header"], &at("in")).unwrap_err();
        assert!(matches!(err, AppError::InvalidEnumValue { ref got, .. } if got == "body"));
    }

    #[test]
    fn test_check_mutually_exclusive_lists_set_fields() {
        assert!(check_mutually_exclusive(&[("example", true), ("examples", false)], &at("x")).is_ok());
        let err = check_mutually_exclusive(
            &[("allOf", true), ("oneOf", true), ("anyOf", false), ("not", false)],
            &FieldPath::root(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AppError::MutuallyExclusiveFieldsSet {
                path: FieldPath::root(),
                fields: vec!["allOf".into(), "oneOf".into()],
            }
        );
    }

    #[test]
    fn test_check_unique_reports_first_repeat() {
        let items = ["a", "b", "a", "b"];
        let err = check_unique(items.iter(), |s| Some(**s), &at("tags")).unwrap_err();
        assert_eq!(
            err,
            AppError::DuplicateKey {
                path: at("tags").index(2),
                key: "a".into(),
            }
        );
    }

    #[test]
    fn test_check_unique_skips_unkeyed_items() {
        let items = [Some(1), None, None, Some(2)];
        assert!(check_unique(items.iter(), |i| **i, &at("items")).is_ok());
    }
}
