//! # Servers
//!
//! `Server` URL templates and the `ServerVariable`s that fill them.

use crate::error::{AppError, AppResult, FormatKind};
use crate::field_path::FieldPath;
use crate::model::de::unique_map;
use crate::template::{expand, placeholders};
use crate::validation::{check_enum, check_required, check_unique, is_valid_uri_reference};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A substitution value for one `{name}` placeholder of a server URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ServerVariableConfig")]
pub struct ServerVariable {
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<String>>,
    default: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// Fields accepted by [`ServerVariable::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerVariableConfig {
    /// Allowed values; when present, `default` must be one of them.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    /// Value used when the client supplies none.
    pub default: String,
    /// Description of the variable.
    pub description: Option<String>,
}

impl ServerVariable {
    /// Validates `config` and builds a `ServerVariable`.
    pub fn new(config: ServerVariableConfig) -> AppResult<Self> {
        if let Some(allowed) = &config.enum_values {
            let path = FieldPath::from("enum");
            check_required(allowed, &path)?;
            check_unique(allowed.iter(), |v| Some(v.to_string()), &path)?;
            check_enum(&config.default, allowed, &FieldPath::from("default"))?;
        }

        Ok(Self {
            enum_values: config.enum_values,
            default: config.default,
            description: config.description,
        })
    }

    /// A variable with only a default value.
    pub fn with_default(default: impl Into<String>) -> Self {
        Self {
            enum_values: None,
            default: default.into(),
            description: None,
        }
    }

    /// Allowed values, if restricted.
    pub fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    /// Default substitution value.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Description of the variable.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl TryFrom<ServerVariableConfig> for ServerVariable {
    type Error = AppError;

    fn try_from(config: ServerVariableConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

fn deserialize_variables<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IndexMap<String, ServerVariable>, D::Error> {
    unique_map(deserializer, FieldPath::from("variables"))
}

/// A target host, possibly templated with `{name}` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ServerConfig")]
pub struct Server {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    variables: IndexMap<String, ServerVariable>,
}

/// Fields accepted by [`Server::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerConfig {
    /// Absolute or relative URL; `{name}` placeholders refer to `variables`.
    pub url: String,
    /// Description of the host.
    pub description: Option<String>,
    /// Variables keyed by placeholder name.
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: IndexMap<String, ServerVariable>,
}

impl Server {
    /// Validates `config` and builds a `Server`.
    ///
    /// Every placeholder must name a variable, every variable must appear in
    /// the URL exactly once, and the URL with defaults substituted must be a
    /// URI reference without query or fragment.
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let url_path = FieldPath::from("url");
        check_required(&config.url, &url_path)?;

        let names = placeholders(&config.url);
        check_unique(names.iter(), |name| Some(name.to_string()), &url_path)?;

        let variables_path = FieldPath::from("variables");
        for name in &names {
            if !config.variables.contains_key(*name) {
                return Err(AppError::MissingRequiredField(variables_path.field(*name)));
            }
        }
        for name in config.variables.keys() {
            if !names.contains(&name.as_str()) {
                return Err(AppError::InvalidEnumValue {
                    path: variables_path.field(name.as_str()),
                    got: name.clone(),
                    allowed: names.iter().map(|n| n.to_string()).collect(),
                });
            }
        }

        let expanded = expand(&config.url, |name| {
            config.variables.get(name).map(ServerVariable::default_value)
        });
        if expanded.contains('?') || expanded.contains('#') || !is_valid_uri_reference(&expanded) {
            return Err(AppError::InvalidFormat {
                path: url_path,
                kind: FormatKind::Url,
                value: config.url,
            });
        }

        Ok(Self {
            url: config.url,
            description: config.description,
            variables: config.variables,
        })
    }

    /// The server a document falls back to when it declares none.
    pub fn root() -> Self {
        Self {
            url: "/".to_string(),
            description: None,
            variables: IndexMap::new(),
        }
    }

    /// URL template.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Description of the host.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Variables keyed by placeholder name, in declaration order.
    pub fn variables(&self) -> &IndexMap<String, ServerVariable> {
        &self.variables
    }

    /// The URL with every variable replaced by its default.
    pub fn default_url(&self) -> String {
        expand(&self.url, |name| {
            self.variables.get(name).map(ServerVariable::default_value)
        })
    }
}

impl TryFrom<ServerConfig> for Server {
    type Error = AppError;

    fn try_from(config: ServerConfig) -> AppResult<Self> {
        Self::new(config)
    }
}
