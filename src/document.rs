//! # Document Root
//!
//! `Api` aggregates the validated parts of a document and runs the checks
//! that need the whole tree:
//!
//! 1. no two path templates normalize to the same shape,
//! 2. every operationId is used once, callbacks included,
//! 3. request bodies on bodiless verbs are recorded as [`Advisory`] findings.

use crate::error::{AppError, AppResult, FormatKind};
use crate::field_path::FieldPath;
use crate::model::de::unique_map;
use crate::model::{HttpMethod, Info, Operation, Path, PathConfig, Server};
use crate::template::{normalize, NormalizedTemplate};
use crate::validation::{check_format, check_required};
use derive_more::Display;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::HashMap;

/// The `openapi` version written when the caller does not choose one.
pub const OPENAPI_VERSION: &str = "3.0.3";

fn default_openapi() -> String {
    OPENAPI_VERSION.to_string()
}

/// A non-fatal finding attached to an otherwise valid document.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum AdvisoryKind {
    /// An operation on GET, HEAD, DELETE or TRACE declares a request body.
    #[display("requestBody on {} is ignored by most consumers", _0.to_string().to_uppercase())]
    RequestBodyOnBodilessMethod(HttpMethod),
}

/// An [`AdvisoryKind`] and where it was found.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("{location}: {kind}")]
pub struct Advisory {
    /// What was found.
    pub kind: AdvisoryKind,
    /// The operation it concerns, e.g. `paths[0].get`.
    pub location: FieldPath,
}

/// A complete, validated OpenAPI 3.0 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ApiConfig")]
pub struct Api {
    openapi: String,
    info: Info,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    servers: Vec<Server>,
    #[serde(serialize_with = "serialize_paths")]
    paths: Vec<Path>,
    #[serde(skip)]
    advisories: Vec<Advisory>,
}

/// Fields accepted by [`Api::new`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    /// OpenAPI version; must be `3.0.x`.
    #[serde(default = "default_openapi")]
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// Target hosts; `/` is assumed when empty.
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Path items in declaration order.
    #[serde(default, deserialize_with = "deserialize_paths")]
    pub paths: Vec<Path>,
}

impl ApiConfig {
    /// A configuration with the default version and no servers or paths.
    pub fn new(info: Info) -> Self {
        Self {
            openapi: default_openapi(),
            info,
            servers: Vec::new(),
            paths: Vec::new(),
        }
    }
}

fn serialize_paths<S: Serializer>(paths: &[Path], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(paths.iter().map(|path| (path.template(), path)))
}

fn deserialize_paths<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Path>, D::Error> {
    let configs: IndexMap<String, PathConfig> = unique_map(deserializer, FieldPath::from("paths"))?;
    configs
        .into_iter()
        .map(|(template, mut config)| {
            let prefix = FieldPath::from("paths").field(template.as_str());
            config.template = template;
            Path::new(config).map_err(|err| D::Error::custom(err.within(&prefix)))
        })
        .collect()
}

/// An operation reached while scanning the document, callbacks included.
struct OperationSite<'a> {
    location: FieldPath,
    method: HttpMethod,
    operation: &'a Operation,
}

fn push_operations<'a>(path: &'a Path, base: FieldPath, sites: &mut Vec<OperationSite<'a>>) {
    for (method, operation) in path.operations() {
        let location = base.field(method.to_string());
        sites.push(OperationSite {
            location: location.clone(),
            method,
            operation,
        });
        for (name, callback) in operation.callbacks() {
            for (expression, callback_path) in callback.expressions() {
                let nested = location
                    .field("callbacks")
                    .field(name.as_str())
                    .field(expression.as_str());
                push_operations(callback_path, nested, sites);
            }
        }
    }
}

fn collect_operations(paths: &[Path]) -> Vec<OperationSite<'_>> {
    let mut sites = Vec::new();
    for (idx, path) in paths.iter().enumerate() {
        push_operations(path, FieldPath::from("paths").index(idx), &mut sites);
    }
    sites
}

fn check_openapi_version(version: &str) -> AppResult<()> {
    let path = FieldPath::from("openapi");
    check_required(version, &path)?;
    check_format(version, FormatKind::Semver, &path)?;
    match semver::Version::parse(version) {
        Ok(parsed) if parsed.major == 3 && parsed.minor == 0 => Ok(()),
        _ => Err(AppError::InvalidEnumValue {
            path,
            got: version.to_string(),
            allowed: vec!["3.0.x".into()],
        }),
    }
}

fn check_path_templates(paths: &[Path]) -> AppResult<()> {
    let mut seen: HashMap<NormalizedTemplate, &str> = HashMap::new();
    for path in paths {
        let normalized = normalize(path.template());
        if let Some(first) = seen.get(&normalized) {
            return Err(AppError::DuplicatePathTemplate {
                first: first.to_string(),
                second: path.template().to_string(),
            });
        }
        seen.insert(normalized, path.template());
    }
    Ok(())
}

fn check_operation_ids(sites: &[OperationSite<'_>]) -> AppResult<()> {
    let mut seen: HashMap<&str, &FieldPath> = HashMap::new();
    for site in sites {
        let Some(id) = site.operation.operation_id() else {
            continue;
        };
        if let Some(first) = seen.get(id) {
            return Err(AppError::DuplicateOperationId {
                id: id.to_string(),
                first: (*first).clone(),
                second: site.location.clone(),
            });
        }
        seen.insert(id, &site.location);
    }
    Ok(())
}

fn body_advisories(sites: &[OperationSite<'_>]) -> Vec<Advisory> {
    sites
        .iter()
        .filter(|site| {
            site.operation.request_body().is_some() && !site.method.has_request_body_semantics()
        })
        .map(|site| Advisory {
            kind: AdvisoryKind::RequestBodyOnBodilessMethod(site.method),
            location: site.location.clone(),
        })
        .collect()
}

impl Api {
    /// Validates the assembled document.
    ///
    /// Every part was checked by its own constructor; this runs the
    /// document-wide checks and reports the first violation.
    pub fn new(config: ApiConfig) -> AppResult<Self> {
        check_openapi_version(&config.openapi)?;
        check_path_templates(&config.paths)?;

        let sites = collect_operations(&config.paths);
        check_operation_ids(&sites)?;
        let advisories = body_advisories(&sites);
        for advisory in &advisories {
            log::warn!("{advisory}");
        }
        log::debug!(
            "Assembled OpenAPI {} document '{}' with {} paths and {} operations",
            config.openapi,
            config.info.title(),
            config.paths.len(),
            sites.len()
        );
        drop(sites);

        Ok(Self {
            openapi: config.openapi,
            info: config.info,
            servers: config.servers,
            paths: config.paths,
            advisories,
        })
    }

    /// The `openapi` version string.
    pub fn openapi(&self) -> &str {
        &self.openapi
    }

    /// Document metadata.
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Declared servers.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Declared servers, or the single server `/` when there are none.
    pub fn effective_servers(&self) -> Cow<'_, [Server]> {
        if self.servers.is_empty() {
            Cow::Owned(vec![Server::root()])
        } else {
            Cow::Borrowed(&self.servers)
        }
    }

    /// Path items in declaration order.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The path item declared with exactly `template`.
    pub fn path(&self, template: &str) -> Option<&Path> {
        self.paths.iter().find(|path| path.template() == template)
    }

    /// The top-level operation carrying `operation_id`.
    pub fn operation_by_id(&self, operation_id: &str) -> Option<(&Path, HttpMethod, &Operation)> {
        self.paths.iter().find_map(|path| {
            path.operations()
                .find(|(_, operation)| operation.operation_id() == Some(operation_id))
                .map(|(method, operation)| (path, method, operation))
        })
    }

    /// Non-fatal findings, in scan order.
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
}

impl TryFrom<ApiConfig> for Api {
    type Error = AppError;

    fn try_from(config: ApiConfig) -> AppResult<Self> {
        Self::new(config)
    }
}
