use thiserror::Error;

use sitehost_archive::NormalizeError;
use sitehost_site_store::StoreError;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum IngestErrKind {
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),
    #[error("namespace '{0}' already has content")]
    NamespaceTaken(String),
    #[error("namespace '{0}' has no content")]
    UnknownNamespace(String),
    #[error(transparent)]
    Normalize(NormalizeError),
    #[error(transparent)]
    Store(StoreError),
    #[error("rename copied {completed} objects but {} failed; source kept", .failed.len())]
    RenamePartial {
        completed: usize,
        failed: Vec<String>,
    },
    /// The copy landed but the source could not be fully cleared.
    #[error("site copied to '{target}' but {} source objects remain", .leftover.len())]
    RenameCleanupPartial {
        target: String,
        removed: usize,
        leftover: Vec<String>,
    },
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(transparent)]
pub struct IngestError(pub IngestErrKind);

impl IngestError {
    pub fn new(kind: IngestErrKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &IngestErrKind {
        &self.0
    }

    /// Machine-checkable error kind; wrapped errors keep their own code.
    pub fn code(&self) -> &'static str {
        match &self.0 {
            IngestErrKind::InvalidNamespace(_) => "invalid_namespace",
            IngestErrKind::NamespaceTaken(_) => "namespace_taken",
            IngestErrKind::UnknownNamespace(_) => "unknown_namespace",
            IngestErrKind::Normalize(err) => err.code(),
            IngestErrKind::Store(err) => err.code(),
            IngestErrKind::RenamePartial { .. } => "rename_partial",
            IngestErrKind::RenameCleanupPartial { .. } => "rename_cleanup_partial",
        }
    }

    pub fn failed_keys(&self) -> &[String] {
        match &self.0 {
            IngestErrKind::RenamePartial { failed, .. } => failed,
            IngestErrKind::RenameCleanupPartial { leftover, .. } => leftover,
            IngestErrKind::Store(err) => err.failed_keys(),
            _ => &[],
        }
    }
}

impl From<IngestErrKind> for IngestError {
    fn from(kind: IngestErrKind) -> Self {
        IngestError(kind)
    }
}

impl From<NormalizeError> for IngestError {
    fn from(err: NormalizeError) -> Self {
        IngestErrKind::Normalize(err).into()
    }
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        IngestErrKind::Store(err).into()
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
