//! # Document Object Model
//!
//! Every entity is built by a validating constructor taking its `XConfig`;
//! deserialization routes through the same constructor.

pub(crate) mod de;
pub mod media;
pub mod metadata;
pub mod operation;
pub mod parameter;
pub mod path;
pub mod reference;
pub mod schema;
pub mod server;

pub use media::{
    Encoding, EncodingConfig, Example, ExampleConfig, MediaType, MediaTypeConfig, RequestBody,
    RequestBodyConfig, Response, ResponseConfig,
};
pub use metadata::{
    Contact, ContactConfig, ExternalDocs, ExternalDocsConfig, Info, InfoConfig, License,
    LicenseConfig,
};
pub use operation::{Callback, CallbackConfig, Operation, OperationConfig, SecurityRequirement};
pub use parameter::{Parameter, ParameterConfig, ParameterLocation};
pub use path::{HttpMethod, Path, PathConfig};
pub use reference::{FromConfig, RefOr, Reference, ReferenceConfig};
pub use schema::{AdditionalProperties, Composition, Schema, SchemaConfig, SchemaType};
pub use server::{Server, ServerConfig, ServerVariable, ServerVariableConfig};
