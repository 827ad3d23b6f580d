use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod mime;
mod namespace;
mod path;

pub use namespace::{Namespace, NamespaceError, MAX_NAMESPACE_LEN};
pub use mime::{content_type_for, is_markup, root_document, GENERIC_BINARY};
pub use path::{extension_of, SitePath, SitePathError};

/// File name every site is expected to answer `/` with.
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// Shared error type for the sitehost kernel crates.
#[derive(Debug, Error, Clone)]
pub enum SiteError {
    #[error("{message}")]
    Message { message: String },
}

impl SiteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Outcome of a successful ingestion or rename, handed to the metadata registry.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteSummary {
    pub namespace: Namespace,
    pub url: String,
    pub file_count: usize,
    /// MIME type of the document served for the site root, if any.
    pub primary_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SiteSummary {
    pub fn new(
        namespace: Namespace,
        url: impl Into<String>,
        file_count: usize,
        primary_type: Option<String>,
    ) -> Self {
        Self {
            namespace,
            url: url.into(),
            file_count,
            primary_type,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for SiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "namespace={} url={} files={} primary={}",
            self.namespace,
            self.url,
            self.file_count,
            self.primary_type.as_deref().unwrap_or("-")
        )
    }
}

/// Whether an ingestion may overwrite an occupied namespace.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum IngestMode {
    #[default]
    Create,
    Replace,
}

impl IngestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestMode::Create => "create",
            IngestMode::Replace => "replace",
        }
    }
}

impl std::str::FromStr for IngestMode {
    type Err = SiteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "create" => Ok(IngestMode::Create),
            "replace" | "overwrite" => Ok(IngestMode::Replace),
            other => Err(SiteError::new(format!("unknown ingest mode '{other}'"))),
        }
    }
}

impl fmt::Display for IngestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
