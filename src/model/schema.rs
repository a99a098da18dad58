//! # Schemas
//!
//! Structural model of the OpenAPI 3.0 Schema Object. Only the shape of a
//! schema is checked (composition exclusivity, array items, bound ordering);
//! instance data is never validated against it.

use crate::error::{AppError, AppResult};
use crate::field_path::FieldPath;
use crate::model::de::ref_map;
use crate::model::reference::{FromConfig, RefOr};
use crate::validation::{check_mutually_exclusive, check_unique, parse_enum};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SchemaType {
    /// Whole numbers.
    Integer,
    /// Any number.
    Number,
    /// Text.
    String,
    /// `true` / `false`.
    Boolean,
    /// Ordered list; requires `items`.
    Array,
    /// Key/value map.
    Object,
}

impl SchemaType {
    const ALL: [SchemaType; 6] = [
        SchemaType::Integer,
        SchemaType::Number,
        SchemaType::String,
        SchemaType::Boolean,
        SchemaType::Array,
        SchemaType::Object,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum(s, &Self::ALL, &FieldPath::from("type")).copied()
    }
}

impl TryFrom<String> for SchemaType {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        value.parse()
    }
}

/// The single composition keyword a schema node may carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Composition {
    /// Must match every subschema.
    AllOf(Vec<RefOr<Schema>>),
    /// Must match exactly one subschema.
    OneOf(Vec<RefOr<Schema>>),
    /// Must match at least one subschema.
    AnyOf(Vec<RefOr<Schema>>),
    /// Must not match the subschema.
    Not(Box<RefOr<Schema>>),
}

impl Composition {
    /// The keyword as written in a document.
    pub fn keyword(&self) -> &'static str {
        match self {
            Composition::AllOf(_) => "allOf",
            Composition::OneOf(_) => "oneOf",
            Composition::AnyOf(_) => "anyOf",
            Composition::Not(_) => "not",
        }
    }
}

/// The `additionalProperties` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` allows any extra property, `false` forbids them.
    Allowed(bool),
    /// Extra properties must match this schema.
    Schema(Box<RefOr<Schema>>),
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A Schema Object node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaConfig", rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(flatten)]
    composition: Option<Composition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<RefOr<Schema>>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<String, RefOr<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_properties: Option<AdditionalProperties>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    required: Vec<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    enum_values: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<Value>,
    #[serde(skip_serializing_if = "is_false")]
    nullable: bool,
    #[serde(skip_serializing_if = "is_false")]
    read_only: bool,
    #[serde(skip_serializing_if = "is_false")]
    write_only: bool,
    #[serde(skip_serializing_if = "is_false")]
    deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,
    #[serde(skip_serializing_if = "is_false")]
    exclusive_minimum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,
    #[serde(skip_serializing_if = "is_false")]
    exclusive_maximum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    multiple_of: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_items: Option<u64>,
    #[serde(skip_serializing_if = "is_false")]
    unique_items: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_properties: Option<u64>,
}

/// Fields accepted by [`Schema::new`].
///
/// The four composition keywords are separate fields here; `Schema::new`
/// folds them into a single [`Composition`] and rejects more than one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaConfig {
    /// The `type` keyword.
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Refinement of `type`, e.g. `int64` or `date-time`.
    pub format: Option<String>,
    /// Short title.
    pub title: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Composition keywords; at most one of these four may be set.
    pub all_of: Option<Vec<RefOr<Schema>>>,
    /// Must match exactly one subschema.
    pub one_of: Option<Vec<RefOr<Schema>>>,
    /// Must match at least one subschema.
    pub any_of: Option<Vec<RefOr<Schema>>>,
    /// Must not match the subschema.
    pub not: Option<Box<RefOr<Schema>>>,
    /// Item schema; required when `type` is `array`.
    pub items: Option<Box<RefOr<Schema>>>,
    /// Property schemas, in declaration order.
    #[serde(deserialize_with = "deserialize_properties")]
    pub properties: IndexMap<String, RefOr<Schema>>,
    /// Policy for properties not listed in `properties`.
    pub additional_properties: Option<AdditionalProperties>,
    /// Names of required properties; unique.
    pub required: Vec<String>,
    /// Permitted values.
    #[serde(rename = "enum")]
    pub enum_values: Vec<Value>,
    /// Value assumed when none is supplied.
    pub default: Option<Value>,
    /// Example instance.
    pub example: Option<Value>,
    /// Whether `null` is accepted.
    pub nullable: bool,
    /// Excludes `writeOnly`.
    pub read_only: bool,
    /// Excludes `readOnly`.
    pub write_only: bool,
    /// Marks the schema as being phased out.
    pub deprecated: bool,
    /// Lower numeric bound; must not exceed `maximum`.
    pub minimum: Option<f64>,
    /// Makes `minimum` exclusive.
    pub exclusive_minimum: bool,
    /// Upper numeric bound.
    pub maximum: Option<f64>,
    /// Makes `maximum` exclusive.
    pub exclusive_maximum: bool,
    /// Must be greater than zero.
    pub multiple_of: Option<f64>,
    /// Minimum string length.
    pub min_length: Option<u64>,
    /// Maximum string length; must not be below `minLength`.
    pub max_length: Option<u64>,
    /// ECMA 262 regular expression, stored as written.
    pub pattern: Option<String>,
    /// Minimum array length.
    pub min_items: Option<u64>,
    /// Maximum array length; must not be below `minItems`.
    pub max_items: Option<u64>,
    /// Whether array items must be distinct.
    pub unique_items: bool,
    /// Minimum property count.
    pub min_properties: Option<u64>,
    /// Maximum property count; must not be below `minProperties`.
    pub max_properties: Option<u64>,
}

fn deserialize_properties<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IndexMap<String, RefOr<Schema>>, D::Error> {
    ref_map(deserializer, FieldPath::from("properties"))
}

fn check_bounds<T>(lower: Option<T>, upper: Option<T>, upper_field: &str) -> AppResult<()>
where
    T: PartialOrd + fmt::Display,
{
    if let (Some(lower), Some(upper)) = (lower, upper) {
        if upper < lower {
            return Err(AppError::OutOfRange {
                path: FieldPath::from(upper_field),
                value: upper.to_string(),
                constraint: format!(">= {}", lower),
            });
        }
    }
    Ok(())
}

fn fold_composition(config: &mut SchemaConfig) -> AppResult<Option<Composition>> {
    check_mutually_exclusive(
        &[
            ("allOf", config.all_of.is_some()),
            ("oneOf", config.one_of.is_some()),
            ("anyOf", config.any_of.is_some()),
            ("not", config.not.is_some()),
        ],
        &FieldPath::root(),
    )?;

    type Variant = fn(Vec<RefOr<Schema>>) -> Composition;
    let lists: [(&str, Option<Vec<RefOr<Schema>>>, Variant); 3] = [
        ("allOf", config.all_of.take(), Composition::AllOf),
        ("oneOf", config.one_of.take(), Composition::OneOf),
        ("anyOf", config.any_of.take(), Composition::AnyOf),
    ];
    for (keyword, list, variant) in lists {
        if let Some(list) = list {
            if list.is_empty() {
                return Err(AppError::MissingRequiredField(keyword.into()));
            }
            return Ok(Some(variant(list)));
        }
    }
    Ok(config.not.take().map(Composition::Not))
}

impl Schema {
    /// Validates `config` and builds a `Schema`.
    pub fn new(mut config: SchemaConfig) -> AppResult<Self> {
        let composition = fold_composition(&mut config)?;

        if config.schema_type == Some(SchemaType::Array) && config.items.is_none() {
            return Err(AppError::MissingRequiredField("items".into()));
        }

        check_mutually_exclusive(
            &[("readOnly", config.read_only), ("writeOnly", config.write_only)],
            &FieldPath::root(),
        )?;
        check_unique(
            config.required.iter(),
            |name| Some(name.to_string()),
            &FieldPath::from("required"),
        )?;

        let numeric = [
            ("minimum", config.minimum),
            ("maximum", config.maximum),
            ("multipleOf", config.multiple_of),
        ];
        for (field, value) in numeric {
            if let Some(value) = value.filter(|value| !value.is_finite()) {
                return Err(AppError::OutOfRange {
                    path: FieldPath::from(field),
                    value: value.to_string(),
                    constraint: "finite".into(),
                });
            }
        }
        if let Some(multiple_of) = config.multiple_of {
            if multiple_of <= 0.0 {
                return Err(AppError::OutOfRange {
                    path: FieldPath::from("multipleOf"),
                    value: multiple_of.to_string(),
                    constraint: "> 0".into(),
                });
            }
        }
        check_bounds(config.minimum, config.maximum, "maximum")?;
        check_bounds(config.min_length, config.max_length, "maxLength")?;
        check_bounds(config.min_items, config.max_items, "maxItems")?;
        check_bounds(config.min_properties, config.max_properties, "maxProperties")?;

        Ok(Self {
            schema_type: config.schema_type,
            format: config.format,
            title: config.title,
            description: config.description,
            composition,
            items: config.items,
            properties: config.properties,
            additional_properties: config.additional_properties,
            required: config.required,
            enum_values: config.enum_values,
            default: config.default,
            example: config.example,
            nullable: config.nullable,
            read_only: config.read_only,
            write_only: config.write_only,
            deprecated: config.deprecated,
            minimum: config.minimum,
            exclusive_minimum: config.exclusive_minimum,
            maximum: config.maximum,
            exclusive_maximum: config.exclusive_maximum,
            multiple_of: config.multiple_of,
            min_length: config.min_length,
            max_length: config.max_length,
            pattern: config.pattern,
            min_items: config.min_items,
            max_items: config.max_items,
            unique_items: config.unique_items,
            min_properties: config.min_properties,
            max_properties: config.max_properties,
        })
    }

    /// A bare schema of the given scalar or object type.
    ///
    /// Fails for [`SchemaType::Array`], which needs `items`; use [`Schema::array_of`].
    pub fn of_type(schema_type: SchemaType) -> AppResult<Self> {
        Self::new(SchemaConfig {
            schema_type: Some(schema_type),
            ..Default::default()
        })
    }

    /// An array schema with the given item schema.
    pub fn array_of(items: impl Into<RefOr<Schema>>) -> AppResult<Self> {
        Self::new(SchemaConfig {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items.into())),
            ..Default::default()
        })
    }

    /// The `type` keyword.
    pub fn schema_type(&self) -> Option<SchemaType> {
        self.schema_type
    }

    /// The `format` keyword.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Description of the schema.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The composition keyword, if any.
    pub fn composition(&self) -> Option<&Composition> {
        self.composition.as_ref()
    }

    /// Item schema of an array.
    pub fn items(&self) -> Option<&RefOr<Schema>> {
        self.items.as_deref()
    }

    /// Declared properties, in declaration order.
    pub fn properties(&self) -> &IndexMap<String, RefOr<Schema>> {
        &self.properties
    }

    /// Names of required properties.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Permitted values.
    pub fn enum_values(&self) -> &[Value] {
        &self.enum_values
    }

    /// Whether `null` is accepted.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl TryFrom<SchemaConfig> for Schema {
    type Error = AppError;

    fn try_from(config: SchemaConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl FromConfig for Schema {
    type Config = SchemaConfig;

    fn from_config(config: SchemaConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

impl From<Schema> for RefOr<Schema> {
    fn from(schema: Schema) -> Self {
        RefOr::T(schema)
    }
}
