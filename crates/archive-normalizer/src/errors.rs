use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum NormalizeErrKind {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("corrupt archive: {0}")]
    CorruptArchive(String),
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(transparent)]
pub struct NormalizeError(pub NormalizeErrKind);

impl NormalizeError {
    pub fn new(kind: NormalizeErrKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &NormalizeErrKind {
        &self.0
    }

    pub fn code(&self) -> &'static str {
        match self.0 {
            NormalizeErrKind::UnsupportedFormat(_) => "unsupported_format",
            NormalizeErrKind::CorruptArchive(_) => "corrupt_archive",
        }
    }

    pub(crate) fn unsupported(detail: impl Into<String>) -> Self {
        NormalizeErrKind::UnsupportedFormat(detail.into()).into()
    }

    pub(crate) fn corrupt(detail: impl Into<String>) -> Self {
        NormalizeErrKind::CorruptArchive(detail.into()).into()
    }
}

impl From<NormalizeErrKind> for NormalizeError {
    fn from(kind: NormalizeErrKind) -> Self {
        NormalizeError(kind)
    }
}

impl From<zip::result::ZipError> for NormalizeError {
    fn from(err: zip::result::ZipError) -> Self {
        NormalizeError::corrupt(err.to_string())
    }
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;
