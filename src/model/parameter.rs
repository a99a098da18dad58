//! # Parameters
//!
//! A parameter is identified by its `(name, in)` pair; the location decides
//! which flags are legal.

use crate::error::{AppError, AppResult};
use crate::field_path::FieldPath;
use crate::model::de::ref_list;
use crate::model::reference::{FromConfig, RefOr};
use crate::model::schema::Schema;
use crate::validation::{check_required, parse_enum};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The `in` field of a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ParameterLocation {
    /// `?name=value`
    #[default]
    Query,
    /// Request header.
    Header,
    /// Templated path segment.
    Path,
    /// Cookie value.
    Cookie,
}

impl ParameterLocation {
    const ALL: [ParameterLocation; 4] = [
        ParameterLocation::Query,
        ParameterLocation::Header,
        ParameterLocation::Path,
        ParameterLocation::Cookie,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParameterLocation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum(s, &Self::ALL, &FieldPath::from("in")).copied()
    }
}

impl TryFrom<String> for ParameterLocation {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        value.parse()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterConfig", rename_all = "camelCase")]
pub struct Parameter {
    name: String,
    #[serde(rename = "in")]
    location: ParameterLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    required: bool,
    #[serde(skip_serializing_if = "is_false")]
    deprecated: bool,
    #[serde(skip_serializing_if = "is_false")]
    allow_empty_value: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<RefOr<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<Value>,
}

/// Fields accepted by [`Parameter::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterConfig {
    /// Case-sensitive parameter name.
    pub name: String,
    /// Where the parameter is carried.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Description of the parameter.
    pub description: Option<String>,
    /// Must be `true` for path parameters.
    #[serde(default)]
    pub required: bool,
    /// Marks the parameter as being phased out.
    #[serde(default)]
    pub deprecated: bool,
    /// Permits `?name=` with no value; query parameters only.
    #[serde(default)]
    pub allow_empty_value: bool,
    /// Shape of the value.
    pub schema: Option<RefOr<Schema>>,
    /// Example value.
    pub example: Option<Value>,
}

impl Parameter {
    /// Validates `config` and builds a `Parameter`.
    pub fn new(config: ParameterConfig) -> AppResult<Self> {
        check_required(&config.name, &FieldPath::from("name"))?;

        if config.location == ParameterLocation::Path && !config.required {
            return Err(AppError::InvalidEnumValue {
                path: "required".into(),
                got: "false".into(),
                allowed: vec!["true".into()],
            });
        }
        if config.allow_empty_value && config.location != ParameterLocation::Query {
            return Err(AppError::InvalidEnumValue {
                path: "in".into(),
                got: config.location.to_string(),
                allowed: vec![ParameterLocation::Query.to_string()],
            });
        }

        Ok(Self {
            name: config.name,
            location: config.location,
            description: config.description,
            required: config.required,
            deprecated: config.deprecated,
            allow_empty_value: config.allow_empty_value,
            schema: config.schema,
            example: config.example,
        })
    }

    /// A required path parameter.
    pub fn in_path(name: impl Into<String>, schema: impl Into<RefOr<Schema>>) -> AppResult<Self> {
        Self::new(ParameterConfig {
            name: name.into(),
            location: ParameterLocation::Path,
            required: true,
            schema: Some(schema.into()),
            ..Default::default()
        })
    }

    /// An optional query parameter.
    pub fn in_query(name: impl Into<String>, schema: impl Into<RefOr<Schema>>) -> AppResult<Self> {
        Self::new(ParameterConfig {
            name: name.into(),
            location: ParameterLocation::Query,
            schema: Some(schema.into()),
            ..Default::default()
        })
    }

    /// The `(name, in)` pair that identifies the parameter within an operation.
    pub fn identity(&self) -> (&str, ParameterLocation) {
        (&self.name, self.location)
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the parameter is carried.
    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    /// Description of the parameter.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the parameter must be supplied.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the parameter is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Whether an empty value is permitted.
    pub fn allows_empty_value(&self) -> bool {
        self.allow_empty_value
    }

    /// Shape of the value.
    pub fn schema(&self) -> Option<&RefOr<Schema>> {
        self.schema.as_ref()
    }
}

impl TryFrom<ParameterConfig> for Parameter {
    type Error = AppError;

    fn try_from(config: ParameterConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl FromConfig for Parameter {
    type Config = ParameterConfig;

    fn from_config(config: ParameterConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl From<Parameter> for RefOr<Parameter> {
    fn from(parameter: Parameter) -> Self {
        RefOr::T(parameter)
    }
}

/// Reads a `parameters` list, locating entry errors at `parameters[i]`.
pub(crate) fn deserialize_parameters<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<RefOr<Parameter>>, D::Error> {
    ref_list(deserializer, FieldPath::from("parameters"))
}

/// Key used for parameter uniqueness checks.
///
/// Inline parameters are keyed by identity; references by their target, so
/// the same `$ref` listed twice is a duplicate.
pub(crate) fn parameter_key(parameter: &RefOr<Parameter>) -> String {
    match parameter {
        RefOr::T(inline) => format!("{} in {}", inline.name, inline.location),
        RefOr::Ref(reference) => reference.location().to_string(),
    }
}
