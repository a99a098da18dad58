//! # Error Handling
//!
//! Provides the unified `AppError` enum returned by every constructor.

use crate::field_path::FieldPath;
use derive_more::Display;

/// The syntactic formats the validation engine knows how to check.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// An absolute URL.
    #[display("url")]
    Url,
    /// An e-mail address.
    #[display("email")]
    Email,
    /// A semantic version (`MAJOR.MINOR.PATCH`).
    #[display("semver")]
    Semver,
    /// A `$ref` target: a local JSON pointer or a URI reference.
    #[display("reference expression")]
    ReferenceExpression,
    /// A response key: `default`, a status code or an `NXX` range.
    #[display("response code")]
    ResponseCode,
    /// A media type or media range such as `application/json` or `text/*`.
    #[display("media range")]
    MediaRange,
    /// A path template such as `/pets/{petId}`.
    #[display("path template")]
    PathTemplate,
    /// A callback key such as `{$request.body#/callbackUrl}`.
    #[display("runtime expression")]
    RuntimeExpression,
}

/// The Global Error Enum.
///
/// Every variant carries the field path of the offending value, relative to
/// the entity whose constructor failed (or to the document root for global checks).
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A mandatory field was absent or empty.
    #[display("Missing required field '{_0}'")]
    MissingRequiredField(FieldPath),

    /// A field failed to parse as the expected format.
    #[display("{path}: '{value}' is not a valid {kind}")]
    InvalidFormat {
        /// Location of the field.
        path: FieldPath,
        /// Expected format.
        kind: FormatKind,
        /// The rejected value.
        value: String,
    },

    /// A field held a value outside its permitted set.
    #[display("{}: '{}' is not one of [{}]", path, got, allowed.join(", "))]
    InvalidEnumValue {
        /// Location of the field.
        path: FieldPath,
        /// The rejected value.
        got: String,
        /// The permitted values.
        allowed: Vec<String>,
    },

    /// More than one of a set of mutually exclusive fields was provided.
    #[display("{}: fields [{}] are mutually exclusive", path, fields.join(", "))]
    MutuallyExclusiveFieldsSet {
        /// Location of the entity holding the fields.
        path: FieldPath,
        /// The fields that were set together.
        fields: Vec<String>,
    },

    /// A numeric constraint has an impossible value, e.g. `maxLength` below `minLength`.
    #[display("{path}: {value} violates {constraint}")]
    OutOfRange {
        /// Location of the field.
        path: FieldPath,
        /// The rejected value.
        value: String,
        /// The bound it must satisfy, e.g. `>= 3` or `> 0`.
        constraint: String,
    },

    /// A key occurred twice where keys must be unique.
    #[display("{path}: duplicate key '{key}'")]
    DuplicateKey {
        /// Location of the repeated entry.
        path: FieldPath,
        /// The repeated key.
        key: String,
    },

    /// Two path templates normalize to the same hierarchy.
    #[display("Path template '{second}' conflicts with '{first}' (same templated shape)")]
    DuplicatePathTemplate {
        /// The template declared first.
        first: String,
        /// The later, colliding template.
        second: String,
    },

    /// An operationId was used by more than one operation.
    #[display("Duplicate operationId '{id}' at {second} (first declared at {first})")]
    DuplicateOperationId {
        /// The repeated operationId.
        id: String,
        /// Location of the first operation using it.
        first: FieldPath,
        /// Location of the repeat.
        second: FieldPath,
    },
}

impl AppError {
    /// Re-roots the error's field paths under `prefix`.
    ///
    /// Template and operationId collisions are document-level and are returned unchanged.
    pub fn within(self, prefix: &FieldPath) -> Self {
        match self {
            AppError::MissingRequiredField(path) => {
                AppError::MissingRequiredField(path.within(prefix))
            }
            AppError::InvalidFormat { path, kind, value } => AppError::InvalidFormat {
                path: path.within(prefix),
                kind,
                value,
            },
            AppError::InvalidEnumValue { path, got, allowed } => AppError::InvalidEnumValue {
                path: path.within(prefix),
                got,
                allowed,
            },
            AppError::MutuallyExclusiveFieldsSet { path, fields } => {
                AppError::MutuallyExclusiveFieldsSet {
                    path: path.within(prefix),
                    fields,
                }
            }
            AppError::OutOfRange {
                path,
                value,
                constraint,
            } => AppError::OutOfRange {
                path: path.within(prefix),
                value,
                constraint,
            },
            AppError::DuplicateKey { path, key } => AppError::DuplicateKey {
                path: path.within(prefix),
                key,
            },
            other => other,
        }
    }

    /// The field path carried by the error, if it has a single one.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            AppError::MissingRequiredField(path)
            | AppError::InvalidFormat { path, .. }
            | AppError::InvalidEnumValue { path, .. }
            | AppError::MutuallyExclusiveFieldsSet { path, .. }
            | AppError::OutOfRange { path, .. }
            | AppError::DuplicateKey { path, .. } => Some(path),
            AppError::DuplicateOperationId { second, .. } => Some(second),
            AppError::DuplicatePathTemplate { .. } => None,
        }
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = AppError::MissingRequiredField("title".into());
        assert_eq!(format!("{}", err), "Missing required field 'title'");
    }

    #[test]
    fn test_enum_display_lists_allowed() {
        let err = AppError::InvalidEnumValue {
            path: "in".into(),
            got: "body".into(),
            allowed: vec!["query".into(), "header".into()],
        };
        assert_eq!(format!("{err}"), "in: 'body' is not one of [query, header]");
    }

    #[test]
    fn test_within_prefixes_local_errors() {
        let err = AppError::DuplicateKey {
            path: FieldPath::from("parameters").index(1),
            key: "id (path)".into(),
        };
        let prefix = FieldPath::from("paths").index(0).field("get");
        let moved = err.within(&prefix);
        assert_eq!(
            moved.path().map(|p| p.to_string()),
            Some("paths[0].get.parameters[1]".to_string())
        );
    }

    #[test]
    fn test_within_keeps_template_collisions() {
        let err = AppError::DuplicatePathTemplate {
            first: "/a/{x}".into(),
            second: "/a/{y}".into(),
        };
        assert_eq!(err.clone().within(&FieldPath::from("paths")), err);
    }
}
