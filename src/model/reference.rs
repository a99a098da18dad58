//! # References
//!
//! `Reference` is a `$ref` pointer to a component defined elsewhere;
//! `RefOr<T>` is the reference-or-inline union used wherever OpenAPI allows either.
//! References are checked for well-formedness only; resolving them is left to consumers.

use crate::error::{AppError, AppResult, FormatKind};
use crate::field_path::FieldPath;
use crate::ref_utils::{component_pointer, split_component_pointer};
use crate::validation::{check_format, check_required};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A `$ref` pointer. Carries no ownership of its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ReferenceConfig")]
pub struct Reference {
    #[serde(rename = "$ref")]
    ref_location: String,
}

/// Fields accepted by [`Reference::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReferenceConfig {
    /// Local JSON pointer (`#/components/schemas/Pet`) or URI reference.
    #[serde(rename = "$ref")]
    pub ref_location: String,
}

impl Reference {
    /// Validates `config` and builds a `Reference`.
    pub fn new(config: ReferenceConfig) -> AppResult<Self> {
        let path = FieldPath::from("$ref");
        check_required(&config.ref_location, &path)?;
        check_format(&config.ref_location, FormatKind::ReferenceExpression, &path)?;
        Ok(Self {
            ref_location: config.ref_location,
        })
    }

    /// Shorthand for `Reference::new` with just the target.
    pub fn to(target: impl Into<String>) -> AppResult<Self> {
        Self::new(ReferenceConfig {
            ref_location: target.into(),
        })
    }

    /// A local reference `#/components/{section}/{name}`, escaping both segments.
    pub fn component(section: &str, name: &str) -> AppResult<Self> {
        if section.trim().is_empty() {
            return Err(AppError::MissingRequiredField("section".into()));
        }
        if name.trim().is_empty() {
            return Err(AppError::MissingRequiredField("name".into()));
        }
        Self::to(component_pointer(section, name))
    }

    /// The raw `$ref` string.
    pub fn location(&self) -> &str {
        &self.ref_location
    }

    /// True when the target lives in the same document.
    pub fn is_local(&self) -> bool {
        self.ref_location.starts_with('#')
    }

    /// The `(section, name)` pair of a local components reference.
    pub fn component_name(&self) -> Option<(String, String)> {
        split_component_pointer(&self.ref_location)
    }
}

impl TryFrom<ReferenceConfig> for Reference {
    type Error = AppError;

    fn try_from(config: ReferenceConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

/// An entity that is read through its configuration and validating constructor.
///
/// Implemented by every type that can appear inline in a [`RefOr`].
pub trait FromConfig: Sized {
    /// The configuration accepted by the constructor.
    type Config: DeserializeOwned;

    /// Validates `config` and builds the entity.
    fn from_config(config: Self::Config) -> AppResult<Self>;
}

/// Either a reference to a component or the component itself.
///
/// Reading one decides on the `$ref` key alone: a map that has it is a
/// reference and fails if the pointer is malformed, anything else goes
/// through `T`'s constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// A `$ref` pointer.
    Ref(Reference),
    /// An inline value.
    T(T),
}

impl<T> RefOr<T> {
    /// The inline value, if this is not a reference.
    pub fn as_inline(&self) -> Option<&T> {
        match self {
            RefOr::T(value) => Some(value),
            RefOr::Ref(_) => None,
        }
    }

    /// The reference, if this is one.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            RefOr::Ref(reference) => Some(reference),
            RefOr::T(_) => None,
        }
    }
}

/// Why a [`RefOr`] could not be read.
#[derive(Debug)]
pub(crate) enum ReadError {
    /// The value does not have the shape of the expected entity.
    Shape { path: FieldPath, message: String },
    /// A constructor rejected the value.
    Invalid(AppError),
}

impl ReadError {
    pub(crate) fn within(self, prefix: &FieldPath) -> Self {
        match self {
            ReadError::Shape { path, message } => ReadError::Shape {
                path: path.within(prefix),
                message,
            },
            ReadError::Invalid(err) => ReadError::Invalid(err.within(prefix)),
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Shape { path, message } if path.is_root() => f.write_str(message),
            ReadError::Shape { path, message } => write!(f, "{path}: {message}"),
            ReadError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

fn shape(err: serde_json::Error) -> ReadError {
    ReadError::Shape {
        path: FieldPath::root(),
        message: err.to_string(),
    }
}

impl<T: FromConfig> RefOr<T> {
    /// Builds a reference when `value` is a map holding `$ref`, an inline `T` otherwise.
    pub(crate) fn read(value: Value) -> Result<Self, ReadError> {
        let is_reference = value
            .as_object()
            .is_some_and(|map| map.contains_key("$ref"));
        if is_reference {
            let config: ReferenceConfig = serde_json::from_value(value).map_err(shape)?;
            return Reference::new(config)
                .map(RefOr::Ref)
                .map_err(ReadError::Invalid);
        }
        let config: T::Config = serde_json::from_value(value).map_err(shape)?;
        T::from_config(config)
            .map(RefOr::T)
            .map_err(ReadError::Invalid)
    }
}

impl<'de, T: FromConfig> Deserialize<'de> for RefOr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::read(value).map_err(D::Error::custom)
    }
}

impl<T> From<Reference> for RefOr<T> {
    fn from(reference: Reference) -> Self {
        RefOr::Ref(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::Schema;

    #[test]
    fn test_reference_empty_is_missing() {
        assert_eq!(
            Reference::to(""),
            Err(AppError::MissingRequiredField("$ref".into()))
        );
    }

    #[test]
    fn test_reference_malformed_pointer() {
        let err = Reference::to("#components/schemas/Pet").unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidFormat { kind: FormatKind::ReferenceExpression, .. }
        ));
    }

    #[test]
    fn test_reference_external_allowed() {
        let reference = Reference::to("https://example.com/schemas.yaml#/Pet").unwrap();
        assert!(!reference.is_local());
        assert!(reference.component_name().is_none());
    }

    #[test]
    fn test_component_reference_round_trip() {
        let reference = Reference::component("schemas", "Pet").unwrap();
        assert_eq!(reference.location(), "#/components/schemas/Pet");
        assert_eq!(
            reference.component_name(),
            Some(("schemas".to_string(), "Pet".to_string()))
        );
    }

    #[test]
    fn test_component_reference_requires_name() {
        assert!(Reference::component("schemas", " ").is_err());
    }

    #[test]
    fn test_ref_or_deserializes_reference_first() {
        let value: RefOr<Schema> =
            serde_json::from_str(r##"{"$ref": "#/components/schemas/Pet"}"##).unwrap();
        assert!(value.as_reference().is_some());

        let value: RefOr<Schema> = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
        assert!(value.as_inline().is_some());
    }

    #[test]
    fn test_malformed_ref_is_not_read_as_inline() {
        let err = serde_json::from_str::<RefOr<Schema>>(r##"{"$ref": "#components/x"}"##).unwrap_err();
        assert!(format!("{err}")
            .starts_with("$ref: '#components/x' is not a valid reference expression"));

        let err = serde_json::from_str::<RefOr<Schema>>(r#"{"$ref": 7}"#).unwrap_err();
        assert!(format!("{err}").contains("invalid type: integer `7`"));
    }

    #[test]
    fn test_inline_constructor_error_passes_through() {
        let err = serde_json::from_str::<RefOr<Schema>>(r#"{"type": "array"}"#).unwrap_err();
        assert!(format!("{err}").starts_with("Missing required field 'items'"));
    }

    #[test]
    fn test_read_error_is_located() {
        let value = serde_json::json!({"type": "array"});
        let err = RefOr::<Schema>::read(value)
            .unwrap_err()
            .within(&FieldPath::from("properties").field("tags"));
        assert_eq!(format!("{err}"), "Missing required field 'properties.tags.items'");
    }

    #[test]
    fn test_reference_serializes_dollar_ref() {
        let reference = Reference::component("parameters", "limit").unwrap();
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(json, serde_json::json!({"$ref": "#/components/parameters/limit"}));
    }
}
