#![deny(missing_docs)]

//! # Reference Utilities
//!
//! JSON Pointer helpers for building and taking apart `$ref` targets of the
//! form `#/components/{section}/{name}`. Nothing here resolves a reference.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a component name is placed in a URI fragment.
const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`').add(b'#');

/// Encodes a JSON Pointer segment (`~` as `~0`, `/` as `~1`) and percent-encodes
/// characters not allowed in a URI fragment.
pub(crate) fn encode_pointer_segment(segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    utf8_percent_encode(&escaped, FRAGMENT).to_string()
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Builds a local pointer `#/components/{section}/{name}`.
pub(crate) fn component_pointer(section: &str, name: &str) -> String {
    format!(
        "#/components/{}/{}",
        encode_pointer_segment(section),
        encode_pointer_segment(name)
    )
}

/// Extracts `(section, name)` from a local `#/components/{section}/{name}` pointer.
///
/// Returns `None` for external references and for pointers into other parts of the document.
pub(crate) fn split_component_pointer(ref_str: &str) -> Option<(String, String)> {
    let pointer = ref_str.strip_prefix("#/")?;
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 || segments[0] != "components" {
        return None;
    }

    let section = decode_pointer_segment(segments[1]);
    let name = decode_pointer_segment(segments[2]);
    if section.is_empty() || name.is_empty() {
        None
    } else {
        Some((section, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_pointer_plain() {
        assert_eq!(component_pointer("schemas", "Pet"), "#/components/schemas/Pet");
    }

    #[test]
    fn test_component_pointer_escapes() {
        assert_eq!(
            component_pointer("schemas", "User Profile/details~v2"),
            "#/components/schemas/User%20Profile~1details~0v2"
        );
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let encoded = "User%20Profile~1details";
        let decoded = decode_pointer_segment(encoded);
        assert_eq!(decoded, "User Profile/details");
    }

    #[test]
    fn test_split_component_pointer_round_trip() {
        let pointer = component_pointer("parameters", "limit/offset");
        assert_eq!(
            split_component_pointer(&pointer),
            Some(("parameters".to_string(), "limit/offset".to_string()))
        );
    }

    #[test]
    fn test_split_component_pointer_rejects_non_component() {
        assert!(split_component_pointer("#/paths/~1pets").is_none());
        assert!(split_component_pointer("other.yaml#/components/schemas/Pet").is_none());
        assert!(split_component_pointer("#/components/schemas").is_none());
    }
}
