//! # Factory Functions
//!
//! One lower-case function per entity, each a thin wrapper over the
//! validating constructor, so documents read top-down:
//!
//! ```
//! use oas_builder::dsl::{api, info, license, server};
//! use oas_builder::{ApiConfig, InfoConfig, LicenseConfig, ServerConfig};
//!
//! # fn main() -> oas_builder::AppResult<()> {
//! let document = api(ApiConfig {
//!     servers: vec![server(ServerConfig {
//!         url: "http://petstore.swagger.io/v1".into(),
//!         ..Default::default()
//!     })?],
//!     ..ApiConfig::new(info(InfoConfig {
//!         title: "Swagger Petstore".into(),
//!         version: "1.0.0".into(),
//!         license: Some(license(LicenseConfig {
//!             name: "MIT".into(),
//!             url: None,
//!         })?),
//!         ..Default::default()
//!     })?)
//! })?;
//! assert_eq!(document.info().title(), "Swagger Petstore");
//! # Ok(())
//! # }
//! ```

use crate::document::{Api, ApiConfig};
use crate::error::AppResult;
use crate::model::*;

/// See [`Contact::new`].
pub fn contact(config: ContactConfig) -> AppResult<Contact> {
    Contact::new(config)
}

/// See [`License::new`].
pub fn license(config: LicenseConfig) -> AppResult<License> {
    License::new(config)
}

/// See [`Info::new`].
pub fn info(config: InfoConfig) -> AppResult<Info> {
    Info::new(config)
}

/// See [`ServerVariable::new`].
pub fn server_variable(config: ServerVariableConfig) -> AppResult<ServerVariable> {
    ServerVariable::new(config)
}

/// See [`Server::new`].
pub fn server(config: ServerConfig) -> AppResult<Server> {
    Server::new(config)
}

/// See [`ExternalDocs::new`].
pub fn external_docs(config: ExternalDocsConfig) -> AppResult<ExternalDocs> {
    ExternalDocs::new(config)
}

/// See [`Reference::to`].
pub fn reference(target: impl Into<String>) -> AppResult<Reference> {
    Reference::to(target)
}

/// See [`Schema::new`].
pub fn schema(config: SchemaConfig) -> AppResult<Schema> {
    Schema::new(config)
}

/// See [`Example::new`].
pub fn example(config: ExampleConfig) -> AppResult<Example> {
    Example::new(config)
}

/// See [`Encoding::new`].
pub fn encoding(config: EncodingConfig) -> AppResult<Encoding> {
    Encoding::new(config)
}

/// See [`MediaType::new`].
pub fn media_type(config: MediaTypeConfig) -> AppResult<MediaType> {
    MediaType::new(config)
}

/// See [`RequestBody::new`].
pub fn request_body(config: RequestBodyConfig) -> AppResult<RequestBody> {
    RequestBody::new(config)
}

/// See [`Response::new`].
pub fn response(config: ResponseConfig) -> AppResult<Response> {
    Response::new(config)
}

/// See [`Parameter::new`].
pub fn parameter(config: ParameterConfig) -> AppResult<Parameter> {
    Parameter::new(config)
}

/// See [`Operation::new`].
pub fn operation(config: OperationConfig) -> AppResult<Operation> {
    Operation::new(config)
}

/// See [`Callback::new`].
pub fn callback(config: CallbackConfig) -> AppResult<Callback> {
    Callback::new(config)
}

/// See [`Path::new`].
pub fn path(config: PathConfig) -> AppResult<Path> {
    Path::new(config)
}

/// See [`Api::new`].
pub fn api(config: ApiConfig) -> AppResult<Api> {
    Api::new(config)
}
