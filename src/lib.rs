#![deny(missing_docs)]

//! # oas-builder
//!
//! Builds OpenAPI 3.0 documents from validated parts.
//!
//! Every entity is created through a constructor that checks its own fields
//! (pass 1); [`Api::new`] then checks the invariants that span the whole
//! document (pass 2). A value that exists is structurally valid. All entities
//! implement `serde::Serialize`, and all but [`Path`] implement
//! `serde::Deserialize` through the same constructors.

/// Shared error types.
pub mod error;

/// Field locations used in error reports.
pub mod field_path;

/// The validation engine.
pub mod validation;

/// Server URL and path template helpers.
pub mod template;

/// JSON pointer helpers for `$ref` targets.
mod ref_utils;

/// Entities of the document object model.
pub mod model;

/// The document root and its global checks.
pub mod document;

/// Lower-case factory functions.
pub mod dsl;

pub use document::{Advisory, AdvisoryKind, Api, ApiConfig, OPENAPI_VERSION};
pub use error::{AppError, AppResult, FormatKind};
pub use field_path::FieldPath;
pub use model::*;
