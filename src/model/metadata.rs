//! # Metadata Descriptors
//!
//! `Contact`, `License`, `Info` and `ExternalDocs`.

use crate::error::{AppError, AppResult, FormatKind};
use crate::field_path::FieldPath;
use crate::validation::{check_format, check_required};
use serde::{Deserialize, Serialize};

/// Contact information for the exposed API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContactConfig")]
pub struct Contact {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    email: String,
}

/// Fields accepted by [`Contact::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContactConfig {
    /// Person or organization to contact.
    pub name: String,
    /// Contact page; must be a URL.
    pub url: Option<String>,
    /// Contact e-mail address.
    pub email: String,
}

impl Contact {
    /// Validates `config` and builds a `Contact`.
    pub fn new(config: ContactConfig) -> AppResult<Self> {
        let root = FieldPath::root();
        check_required(&config.name, &root.field("name"))?;
        if let Some(url) = &config.url {
            check_format(url, FormatKind::Url, &root.field("url"))?;
        }
        check_required(&config.email, &root.field("email"))?;
        check_format(&config.email, FormatKind::Email, &root.field("email"))?;

        Ok(Self {
            name: config.name,
            url: config.url,
            email: config.email,
        })
    }

    /// Person or organization to contact.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact page.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Contact e-mail address.
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl TryFrom<ContactConfig> for Contact {
    type Error = AppError;

    fn try_from(config: ContactConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

/// License information for the exposed API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LicenseConfig")]
pub struct License {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// Fields accepted by [`License::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LicenseConfig {
    /// License name, e.g. `MIT`.
    pub name: String,
    /// License text location; must be a URL.
    pub url: Option<String>,
}

impl License {
    /// Validates `config` and builds a `License`.
    pub fn new(config: LicenseConfig) -> AppResult<Self> {
        let root = FieldPath::root();
        check_required(&config.name, &root.field("name"))?;
        if let Some(url) = &config.url {
            check_format(url, FormatKind::Url, &root.field("url"))?;
        }
        Ok(Self {
            name: config.name,
            url: config.url,
        })
    }

    /// License name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// License text location.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl TryFrom<LicenseConfig> for License {
    type Error = AppError;

    fn try_from(config: LicenseConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

/// API metadata: title, version and optional descriptive fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InfoConfig", rename_all = "camelCase")]
pub struct Info {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    terms_of_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<License>,
    version: String,
}

/// Fields accepted by [`Info::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoConfig {
    /// Application title.
    pub title: String,
    /// Version of the API description (not of the OpenAPI format).
    pub version: String,
    /// Longer description; CommonMark allowed.
    pub description: Option<String>,
    /// Terms of service; must be a URL.
    pub terms_of_service: Option<String>,
    /// Contact information.
    pub contact: Option<Contact>,
    /// License information.
    pub license: Option<License>,
}

impl Info {
    /// Validates `config` and builds an `Info`.
    pub fn new(config: InfoConfig) -> AppResult<Self> {
        let root = FieldPath::root();
        check_required(&config.title, &root.field("title"))?;
        check_required(&config.version, &root.field("version"))?;
        if let Some(terms) = &config.terms_of_service {
            check_format(terms, FormatKind::Url, &root.field("termsOfService"))?;
        }

        Ok(Self {
            title: config.title,
            description: config.description,
            terms_of_service: config.terms_of_service,
            contact: config.contact,
            license: config.license,
            version: config.version,
        })
    }

    /// Application title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Version of the API description.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Longer description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Terms of service URL.
    pub fn terms_of_service(&self) -> Option<&str> {
        self.terms_of_service.as_deref()
    }

    /// Contact information.
    pub fn contact(&self) -> Option<&Contact> {
        self.contact.as_ref()
    }

    /// License information.
    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }
}

impl TryFrom<InfoConfig> for Info {
    type Error = AppError;

    fn try_from(config: InfoConfig) -> AppResult<Self> {
        Self::new(config)
    }
}

/// A link to documentation hosted outside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExternalDocsConfig")]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    url: String,
}

/// Fields accepted by [`ExternalDocs::new`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalDocsConfig {
    /// Target documentation; must be a URL.
    pub url: String,
    /// Short description of the target.
    pub description: Option<String>,
}

impl ExternalDocs {
    /// Validates `config` and builds an `ExternalDocs`.
    pub fn new(config: ExternalDocsConfig) -> AppResult<Self> {
        let path = FieldPath::from("url");
        check_required(&config.url, &path)?;
        check_format(&config.url, FormatKind::Url, &path)?;
        Ok(Self {
            description: config.description,
            url: config.url,
        })
    }

    /// Target documentation URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Short description of the target.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl TryFrom<ExternalDocsConfig> for ExternalDocs {
    type Error = AppError;

    fn try_from(config: ExternalDocsConfig) -> AppResult<Self> {
        Self::new(config)
    }
}
