use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StoreErrKind {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("partial failure: {completed} completed, {} failed", .failed.len())]
    PartialFailure {
        completed: usize,
        failed: Vec<String>,
    },
    #[error("invalid object key: {0}")]
    InvalidKey(String),
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(transparent)]
pub struct StoreError(pub StoreErrKind);

impl StoreError {
    pub fn new(kind: StoreErrKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &StoreErrKind {
        &self.0
    }

    pub fn code(&self) -> &'static str {
        match self.0 {
            StoreErrKind::Unavailable(_) => "store_unavailable",
            StoreErrKind::PartialFailure { .. } => "partial_failure",
            StoreErrKind::InvalidKey(_) => "invalid_key",
        }
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        StoreErrKind::Unavailable(detail.into()).into()
    }

    /// Keys that could not be processed, for partial outcomes.
    pub fn failed_keys(&self) -> &[String] {
        match &self.0 {
            StoreErrKind::PartialFailure { failed, .. } => failed,
            _ => &[],
        }
    }
}

impl From<StoreErrKind> for StoreError {
    fn from(kind: StoreErrKind) -> Self {
        StoreError(kind)
    }
}
