use thiserror::Error;

use sitehost_site_store::StoreError;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ServeErrKind {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden path: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Store(StoreError),
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(transparent)]
pub struct ServeError(pub ServeErrKind);

impl ServeError {
    pub fn new(kind: ServeErrKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &ServeErrKind {
        &self.0
    }

    pub fn code(&self) -> &'static str {
        match &self.0 {
            ServeErrKind::NotFound(_) => "not_found",
            ServeErrKind::Forbidden(_) => "forbidden",
            ServeErrKind::Store(err) => err.code(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.0, ServeErrKind::NotFound(_))
    }

    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        ServeErrKind::NotFound(path.into()).into()
    }

    pub(crate) fn forbidden(path: impl Into<String>) -> Self {
        ServeErrKind::Forbidden(path.into()).into()
    }
}

impl From<ServeErrKind> for ServeError {
    fn from(kind: ServeErrKind) -> Self {
        ServeError(kind)
    }
}

impl From<StoreError> for ServeError {
    fn from(err: StoreError) -> Self {
        ServeErrKind::Store(err).into()
    }
}

pub type ServeResult<T> = Result<T, ServeError>;
