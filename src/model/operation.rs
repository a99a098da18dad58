//! # Operations and Callbacks

use crate::error::{AppError, AppResult, FormatKind};
use crate::field_path::FieldPath;
use crate::model::media::{RequestBody, Response};
use crate::model::metadata::ExternalDocs;
use crate::model::de::{ref_map, unique_map};
use crate::model::parameter::{deserialize_parameters, parameter_key, Parameter};
use crate::model::path::{Path, PathConfig};
use crate::model::reference::RefOr;
use crate::model::server::Server;
use crate::validation::{check_format, check_required, check_unique};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Security schemes required by an operation, keyed by scheme name.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

fn is_false(value: &bool) -> bool {
    !*value
}

fn deserialize_responses<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IndexMap<String, RefOr<Response>>, D::Error> {
    ref_map(deserializer, FieldPath::from("responses"))
}

fn deserialize_callbacks<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IndexMap<String, Callback>, D::Error> {
    unique_map(deserializer, FieldPath::from("callbacks"))
}

/// A single API operation on a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OperationConfig", rename_all = "camelCase")]
pub struct Operation {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_docs: Option<ExternalDocs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<RefOr<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_body: Option<RefOr<RequestBody>>,
    responses: IndexMap<String, RefOr<Response>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    callbacks: IndexMap<String, Callback>,
    #[serde(skip_serializing_if = "is_false")]
    deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    security: Option<Vec<SecurityRequirement>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    servers: Vec<Server>,
}

/// Fields accepted by [`Operation::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationConfig {
    /// Grouping tags; unique.
    pub tags: Vec<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Further documentation.
    pub external_docs: Option<ExternalDocs>,
    /// Document-wide unique identifier.
    pub operation_id: Option<String>,
    /// Parameters; no two share a `(name, in)` pair.
    #[serde(deserialize_with = "deserialize_parameters")]
    pub parameters: Vec<RefOr<Parameter>>,
    /// Request payload.
    pub request_body: Option<RefOr<RequestBody>>,
    /// Responses keyed by status code, `NXX` range or `default`; at least one.
    #[serde(deserialize_with = "deserialize_responses")]
    pub responses: IndexMap<String, RefOr<Response>>,
    /// Out-of-band requests keyed by callback name.
    #[serde(deserialize_with = "deserialize_callbacks")]
    pub callbacks: IndexMap<String, Callback>,
    /// Marks the operation as being phased out.
    pub deprecated: bool,
    /// Alternative security requirements; `Some(vec![])` removes document-level security.
    pub security: Option<Vec<SecurityRequirement>>,
    /// Servers overriding the path and document ones.
    pub servers: Vec<Server>,
}

impl Operation {
    /// Validates `config` and builds an `Operation`.
    pub fn new(config: OperationConfig) -> AppResult<Self> {
        let root = FieldPath::root();
        check_unique(
            config.tags.iter(),
            |tag| Some(tag.to_string()),
            &root.field("tags"),
        )?;
        if let Some(id) = &config.operation_id {
            check_required(id, &root.field("operationId"))?;
        }
        check_unique(
            config.parameters.iter(),
            |param| Some(parameter_key(param)),
            &root.field("parameters"),
        )?;

        let responses_path = root.field("responses");
        check_required(&config.responses, &responses_path)?;
        for code in config.responses.keys() {
            check_format(code, FormatKind::ResponseCode, &responses_path.field(code.as_str()))?;
        }

        Ok(Self {
            tags: config.tags,
            summary: config.summary,
            description: config.description,
            external_docs: config.external_docs,
            operation_id: config.operation_id,
            parameters: config.parameters,
            request_body: config.request_body,
            responses: config.responses,
            callbacks: config.callbacks,
            deprecated: config.deprecated,
            security: config.security,
            servers: config.servers,
        })
    }

    /// Grouping tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Short summary.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Long description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Document-wide unique identifier.
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Parameters declared on the operation itself.
    pub fn parameters(&self) -> &[RefOr<Parameter>] {
        &self.parameters
    }

    /// Request payload.
    pub fn request_body(&self) -> Option<&RefOr<RequestBody>> {
        self.request_body.as_ref()
    }

    /// Responses keyed by status code.
    pub fn responses(&self) -> &IndexMap<String, RefOr<Response>> {
        &self.responses
    }

    /// Callbacks keyed by name.
    pub fn callbacks(&self) -> &IndexMap<String, Callback> {
        &self.callbacks
    }

    /// Whether the operation is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Security requirements.
    pub fn security(&self) -> Option<&[SecurityRequirement]> {
        self.security.as_deref()
    }

    /// Operation-level servers.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }
}

impl TryFrom<OperationConfig> for Operation {
    type Error = AppError;

    fn try_from(config: OperationConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

/// Requests the API may send back to the caller, keyed by runtime expression.
///
/// Each entry is a [`Path`] whose key is an expression such as
/// `{$request.body#/callbackUrl}` instead of a `/` template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "CallbackConfig")]
pub struct Callback {
    expressions: IndexMap<String, Path>,
}

/// Fields accepted by [`Callback::new`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackConfig {
    /// Path items keyed by runtime expression.
    pub expressions: IndexMap<String, PathConfig>,
}

impl<'de> Deserialize<'de> for CallbackConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            expressions: unique_map(deserializer, FieldPath::root())?,
        })
    }
}

impl Callback {
    /// Validates `config` and builds a `Callback`.
    ///
    /// Errors from an entry are reported under its expression key.
    pub fn new(config: CallbackConfig) -> AppResult<Self> {
        check_required(&config.expressions, &FieldPath::root())?;
        let mut expressions = IndexMap::with_capacity(config.expressions.len());
        for (expression, path_config) in config.expressions {
            let prefix = FieldPath::root().field(expression.as_str());
            let path = Path::callback(expression.as_str(), path_config)
                .map_err(|err| err.within(&prefix))?;
            expressions.insert(expression, path);
        }
        Ok(Self { expressions })
    }

    /// Builds a callback from already validated callback paths, keyed by their expression.
    ///
    /// Two paths with the same expression fail with `DuplicateKey`.
    pub fn from_paths(paths: impl IntoIterator<Item = Path>) -> AppResult<Self> {
        let mut expressions = IndexMap::new();
        for path in paths {
            let expression = path.template().to_string();
            if expressions.contains_key(&expression) {
                return Err(AppError::DuplicateKey {
                    path: FieldPath::root().field(expression.as_str()),
                    key: expression,
                });
            }
            expressions.insert(expression, path);
        }
        check_required(&expressions, &FieldPath::root())?;
        for expression in expressions.keys() {
            check_format(expression, FormatKind::RuntimeExpression, &FieldPath::root().field(expression.as_str()))?;
        }
        Ok(Self { expressions })
    }

    /// Path items keyed by runtime expression.
    pub fn expressions(&self) -> &IndexMap<String, Path> {
        &self.expressions
    }
}

impl TryFrom<CallbackConfig> for Callback {
    type Error = AppError;

    fn try_from(config: CallbackConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl Serialize for Callback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.expressions.serialize(serializer)
    }
}
