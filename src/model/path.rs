//! # Path Items
//!
//! A `Path` groups the operations available on one URL template. The same
//! structure, keyed by a runtime expression instead of a template, is the
//! value type of a callback.

use crate::error::{AppError, AppResult, FormatKind};
use crate::field_path::FieldPath;
use crate::model::operation::Operation;
use crate::model::parameter::{deserialize_parameters, parameter_key, Parameter, ParameterLocation};
use crate::model::reference::RefOr;
use crate::model::server::Server;
use crate::template::placeholders;
use crate::validation::{check_format, check_required, check_unique, parse_enum};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// HTTP verbs a path item can carry, in canonical scan order.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `get`
    #[display("get")]
    Get,
    /// `put`
    #[display("put")]
    Put,
    /// `post`
    #[display("post")]
    Post,
    /// `delete`
    #[display("delete")]
    Delete,
    /// `options`
    #[display("options")]
    Options,
    /// `head`
    #[display("head")]
    Head,
    /// `patch`
    #[display("patch")]
    Patch,
    /// `trace`
    #[display("trace")]
    Trace,
}

impl HttpMethod {
    /// Every verb, in the order operations are scanned.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// False for verbs whose request body consumers ignore.
    pub fn has_request_body_semantics(&self) -> bool {
        !matches!(
            self,
            HttpMethod::Get | HttpMethod::Head | HttpMethod::Delete | HttpMethod::Trace
        )
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum(s, &Self::ALL, &FieldPath::from("method")).copied()
    }
}

/// Operations and shared settings for one path template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    #[serde(skip)]
    template: String,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    ref_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Operation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    servers: Vec<Server>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<RefOr<Parameter>>,
}

/// Fields accepted by [`Path::new`] and [`Path::callback`].
///
/// `template` is the key of the entry in its parent map, so it is never read
/// from the entry body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Template starting with `/`, e.g. `/pets/{petId}`.
    #[serde(skip)]
    pub template: String,
    /// External definition of this path item.
    #[serde(rename = "$ref")]
    pub ref_location: Option<String>,
    /// Summary applying to every operation.
    pub summary: Option<String>,
    /// Description applying to every operation.
    pub description: Option<String>,
    /// `GET` operation.
    pub get: Option<Operation>,
    /// `PUT` operation.
    pub put: Option<Operation>,
    /// `POST` operation.
    pub post: Option<Operation>,
    /// `DELETE` operation.
    pub delete: Option<Operation>,
    /// `OPTIONS` operation.
    pub options: Option<Operation>,
    /// `HEAD` operation.
    pub head: Option<Operation>,
    /// `PATCH` operation.
    pub patch: Option<Operation>,
    /// `TRACE` operation.
    pub trace: Option<Operation>,
    /// Servers overriding the document ones.
    pub servers: Vec<Server>,
    /// Parameters shared by every operation.
    #[serde(deserialize_with = "deserialize_parameters")]
    pub parameters: Vec<RefOr<Parameter>>,
}

impl Path {
    /// Validates `config` and builds a `Path`.
    ///
    /// Inline `in: path` parameters, at either level, must name a
    /// placeholder of the template.
    pub fn new(config: PathConfig) -> AppResult<Self> {
        let template_path = FieldPath::from("template");
        check_required(&config.template, &template_path)?;
        check_format(&config.template, FormatKind::PathTemplate, &template_path)?;

        let template = config.template.clone();
        let path = Self::build(template.clone(), config)?;
        path.check_path_parameters(&placeholders(&template))?;
        Ok(path)
    }

    /// Builds the path item of a callback, keyed by `expression`.
    pub fn callback(expression: impl Into<String>, config: PathConfig) -> AppResult<Self> {
        let expression = expression.into();
        let expression_path = FieldPath::from("expression");
        check_required(&expression, &expression_path)?;
        check_format(&expression, FormatKind::RuntimeExpression, &expression_path)?;
        Self::build(expression, config)
    }

    fn build(template: String, config: PathConfig) -> AppResult<Self> {
        if let Some(location) = &config.ref_location {
            check_format(location, FormatKind::ReferenceExpression, &FieldPath::from("$ref"))?;
        }
        check_unique(
            config.parameters.iter(),
            |param| Some(parameter_key(param)),
            &FieldPath::from("parameters"),
        )?;

        let path = Self {
            template,
            ref_location: config.ref_location,
            summary: config.summary,
            description: config.description,
            get: config.get,
            put: config.put,
            post: config.post,
            delete: config.delete,
            options: config.options,
            head: config.head,
            patch: config.patch,
            trace: config.trace,
            servers: config.servers,
            parameters: config.parameters,
        };

        let shared: HashSet<String> = path.parameters.iter().map(parameter_key).collect();
        for (method, operation) in path.operations() {
            for key in operation.parameters().iter().map(parameter_key) {
                if shared.contains(&key) {
                    log::debug!(
                        "{} {}: parameter '{}' overrides the path-level declaration",
                        method,
                        path.template,
                        key
                    );
                }
            }
        }
        Ok(path)
    }

    fn check_path_parameters(&self, names: &[&str]) -> AppResult<()> {
        let check = |params: &[RefOr<Parameter>], base: FieldPath| -> AppResult<()> {
            for (idx, param) in params.iter().enumerate() {
                let Some(param) = param.as_inline() else {
                    continue;
                };
                if param.location() == ParameterLocation::Path && !names.contains(&param.name()) {
                    return Err(AppError::InvalidEnumValue {
                        path: base.index(idx).field("name"),
                        got: param.name().to_string(),
                        allowed: names.iter().map(|name| name.to_string()).collect(),
                    });
                }
            }
            Ok(())
        };

        check(&self.parameters, FieldPath::from("parameters"))?;
        for (method, operation) in self.operations() {
            let base = FieldPath::root().field(method.to_string()).field("parameters");
            check(operation.parameters(), base)?;
        }
        Ok(())
    }

    /// The template, or the runtime expression for a callback path.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// External definition of this path item.
    pub fn ref_location(&self) -> Option<&str> {
        self.ref_location.as_deref()
    }

    /// Summary applying to every operation.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Description applying to every operation.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The operation bound to `method`, if any.
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    /// Declared operations in canonical verb order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> + '_ {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |method| self.operation(method).map(|op| (method, op)))
    }

    /// Servers overriding the document ones.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Parameters shared by every operation.
    pub fn parameters(&self) -> &[RefOr<Parameter>] {
        &self.parameters
    }

    /// Parameters in effect for `method`: the path-level ones it does not
    /// override, followed by its own. Empty when no operation is bound.
    pub fn effective_parameters(&self, method: HttpMethod) -> Vec<&RefOr<Parameter>> {
        let Some(operation) = self.operation(method) else {
            return Vec::new();
        };
        let overridden: HashSet<String> = operation.parameters().iter().map(parameter_key).collect();
        self.parameters
            .iter()
            .filter(|param| !overridden.contains(&parameter_key(param)))
            .chain(operation.parameters())
            .collect()
    }
}
