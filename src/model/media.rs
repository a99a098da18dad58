//! # Media and Bodies
//!
//! Payload descriptions keyed by media range: `MediaType` and its `Example`
//! and `Encoding` entries, plus the `RequestBody` and `Response` objects that
//! carry a `content` map.

use crate::error::{AppError, AppResult, FormatKind};
use crate::field_path::FieldPath;
use crate::model::reference::{FromConfig, RefOr};
use crate::model::schema::Schema;
use crate::model::de::{ref_map, unique_map};
use crate::validation::{
    check_format, check_mutually_exclusive, check_required, is_valid_uri_reference,
};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Keys must be media ranges, unique ignoring case. A repeat is reported under its own key.
fn check_content_keys(content: &IndexMap<String, MediaType>, path: &FieldPath) -> AppResult<()> {
    let mut seen = HashSet::new();
    for key in content.keys() {
        let entry = path.field(key.as_str());
        check_format(key, FormatKind::MediaRange, &entry)?;
        if !seen.insert(key.trim().to_ascii_lowercase()) {
            return Err(AppError::DuplicateKey {
                path: entry,
                key: key.clone(),
            });
        }
    }
    Ok(())
}

fn deserialize_content<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IndexMap<String, MediaType>, D::Error> {
    unique_map(deserializer, FieldPath::from("content"))
}

fn deserialize_examples<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<IndexMap<String, RefOr<Example>>>, D::Error> {
    ref_map(deserializer, FieldPath::from("examples")).map(Some)
}

/// A named example payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExampleConfig", rename_all = "camelCase")]
pub struct Example {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_value: Option<String>,
}

/// Fields accepted by [`Example::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleConfig {
    /// Short description.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Embedded literal example.
    pub value: Option<Value>,
    /// Location of an example that cannot be embedded.
    pub external_value: Option<String>,
}

impl Example {
    /// Validates `config` and builds an `Example`.
    pub fn new(config: ExampleConfig) -> AppResult<Self> {
        check_mutually_exclusive(
            &[
                ("value", config.value.is_some()),
                ("externalValue", config.external_value.is_some()),
            ],
            &FieldPath::root(),
        )?;
        if let Some(external) = &config.external_value {
            if !is_valid_uri_reference(external) {
                return Err(AppError::InvalidFormat {
                    path: "externalValue".into(),
                    kind: FormatKind::Url,
                    value: external.clone(),
                });
            }
        }

        Ok(Self {
            summary: config.summary,
            description: config.description,
            value: config.value,
            external_value: config.external_value,
        })
    }

    /// An example carrying just a literal value.
    pub fn of_value(value: Value) -> Self {
        Self {
            summary: None,
            description: None,
            value: Some(value),
            external_value: None,
        }
    }

    /// Short description.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Embedded literal example.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Location of an external example.
    pub fn external_value(&self) -> Option<&str> {
        self.external_value.as_deref()
    }
}

impl TryFrom<ExampleConfig> for Example {
    type Error = AppError;

    fn try_from(config: ExampleConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl FromConfig for Example {
    type Config = ExampleConfig;

    fn from_config(config: ExampleConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

/// Serialization hints for one property of a multipart or form body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EncodingConfig", rename_all = "camelCase")]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explode: Option<bool>,
    #[serde(skip_serializing_if = "is_false")]
    allow_reserved: bool,
}

/// Fields accepted by [`Encoding::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingConfig {
    /// Comma-separated media ranges for the property.
    pub content_type: Option<String>,
    /// Serialization style, as for query parameters.
    pub style: Option<String>,
    /// Whether arrays and objects generate separate parameters.
    pub explode: Option<bool>,
    /// Whether reserved characters are sent unescaped.
    #[serde(default)]
    pub allow_reserved: bool,
}

impl Encoding {
    /// Validates `config` and builds an `Encoding`.
    pub fn new(config: EncodingConfig) -> AppResult<Self> {
        if let Some(content_type) = &config.content_type {
            let path = FieldPath::from("contentType");
            check_required(content_type, &path)?;
            for range in content_type.split(',') {
                check_format(range.trim(), FormatKind::MediaRange, &path)?;
            }
        }

        Ok(Self {
            content_type: config.content_type,
            style: config.style,
            explode: config.explode,
            allow_reserved: config.allow_reserved,
        })
    }

    /// Media ranges for the property.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

impl TryFrom<EncodingConfig> for Encoding {
    type Error = AppError;

    fn try_from(config: EncodingConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

/// Schema and examples for one media range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MediaTypeConfig")]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<RefOr<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    examples: Option<IndexMap<String, RefOr<Example>>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    encoding: IndexMap<String, Encoding>,
}

/// Fields accepted by [`MediaType::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaTypeConfig {
    /// Shape of the payload.
    pub schema: Option<RefOr<Schema>>,
    /// A single example; excludes `examples`.
    pub example: Option<Value>,
    /// Named examples; excludes `example`.
    #[serde(default, deserialize_with = "deserialize_examples")]
    pub examples: Option<IndexMap<String, RefOr<Example>>>,
    /// Per-property encoding, keyed by property name.
    #[serde(default)]
    pub encoding: IndexMap<String, Encoding>,
}

impl MediaType {
    /// Validates `config` and builds a `MediaType`.
    ///
    /// `example` and `examples` are exclusive by presence: an empty
    /// `examples` map still counts as set.
    pub fn new(config: MediaTypeConfig) -> AppResult<Self> {
        check_mutually_exclusive(
            &[
                ("example", config.example.is_some()),
                ("examples", config.examples.is_some()),
            ],
            &FieldPath::root(),
        )?;
        if let Some(examples) = &config.examples {
            let path = FieldPath::from("examples");
            for name in examples.keys() {
                check_required(name, &path)?;
            }
        }

        Ok(Self {
            schema: config.schema,
            example: config.example,
            examples: config.examples,
            encoding: config.encoding,
        })
    }

    /// A media type carrying only a schema.
    pub fn with_schema(schema: impl Into<RefOr<Schema>>) -> Self {
        Self {
            schema: Some(schema.into()),
            example: None,
            examples: None,
            encoding: IndexMap::new(),
        }
    }

    /// Shape of the payload.
    pub fn schema(&self) -> Option<&RefOr<Schema>> {
        self.schema.as_ref()
    }

    /// The single example.
    pub fn example(&self) -> Option<&Value> {
        self.example.as_ref()
    }

    /// Named examples.
    pub fn examples(&self) -> Option<&IndexMap<String, RefOr<Example>>> {
        self.examples.as_ref()
    }

    /// Per-property encoding.
    pub fn encoding(&self) -> &IndexMap<String, Encoding> {
        &self.encoding
    }
}

impl TryFrom<MediaTypeConfig> for MediaType {
    type Error = AppError;

    fn try_from(config: MediaTypeConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

/// The payload accepted by an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RequestBodyConfig")]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    content: IndexMap<String, MediaType>,
    #[serde(skip_serializing_if = "is_false")]
    required: bool,
}

/// Fields accepted by [`RequestBody::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBodyConfig {
    /// Description of the body.
    pub description: Option<String>,
    /// Payloads keyed by media range; at least one.
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: IndexMap<String, MediaType>,
    /// Whether the body must be sent.
    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    /// Validates `config` and builds a `RequestBody`.
    pub fn new(config: RequestBodyConfig) -> AppResult<Self> {
        let path = FieldPath::from("content");
        check_required(&config.content, &path)?;
        check_content_keys(&config.content, &path)?;

        Ok(Self {
            description: config.description,
            content: config.content,
            required: config.required,
        })
    }

    /// Description of the body.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Payloads keyed by media range.
    pub fn content(&self) -> &IndexMap<String, MediaType> {
        &self.content
    }

    /// Whether the body must be sent.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl TryFrom<RequestBodyConfig> for RequestBody {
    type Error = AppError;

    fn try_from(config: RequestBodyConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl FromConfig for RequestBody {
    type Config = RequestBodyConfig;

    fn from_config(config: RequestBodyConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl From<RequestBody> for RefOr<RequestBody> {
    fn from(body: RequestBody) -> Self {
        RefOr::T(body)
    }
}

/// One possible response of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResponseConfig")]
pub struct Response {
    description: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    content: IndexMap<String, MediaType>,
}

/// Fields accepted by [`Response::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseConfig {
    /// Short description of the response.
    pub description: String,
    /// Payloads keyed by media range; may be empty.
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    /// Validates `config` and builds a `Response`.
    pub fn new(config: ResponseConfig) -> AppResult<Self> {
        check_required(&config.description, &FieldPath::from("description"))?;
        check_content_keys(&config.content, &FieldPath::from("content"))?;
        Ok(Self {
            description: config.description,
            content: config.content,
        })
    }

    /// A response with a description and no payload.
    pub fn described(description: impl Into<String>) -> AppResult<Self> {
        Self::new(ResponseConfig {
            description: description.into(),
            content: IndexMap::new(),
        })
    }

    /// Short description of the response.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Payloads keyed by media range.
    pub fn content(&self) -> &IndexMap<String, MediaType> {
        &self.content
    }
}

impl TryFrom<ResponseConfig> for Response {
    type Error = AppError;

    fn try_from(config: ResponseConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl FromConfig for Response {
    type Config = ResponseConfig;

    fn from_config(config: ResponseConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl From<Response> for RefOr<Response> {
    fn from(response: Response) -> Self {
        RefOr::T(response)
    }
}
