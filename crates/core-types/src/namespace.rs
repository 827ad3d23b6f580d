use std::fmt;

use thiserror::Error;

/// A namespace doubles as a DNS label, so it shares the label length limit.
pub const MAX_NAMESPACE_LEN: usize = 63;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum NamespaceError {
    #[error("namespace must not be empty")]
    Empty,
    #[error("namespace exceeds {MAX_NAMESPACE_LEN} characters ({0})")]
    TooLong(usize),
    #[error("namespace contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Tenant site identifier matching `[a-zA-Z0-9_-]+`. Case is preserved and significant.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(try_from = "String", into = "String"))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    pub fn parse(raw: &str) -> Result<Self, NamespaceError> {
        if raw.is_empty() {
            return Err(NamespaceError::Empty);
        }
        let len = raw.chars().count();
        if len > MAX_NAMESPACE_LEN {
            return Err(NamespaceError::TooLong(len));
        }
        if let Some(bad) = raw
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-'))
        {
            return Err(NamespaceError::InvalidChar(bad));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key prefix owned by this namespace, always slash-terminated so that
    /// `abc` never matches keys of `abcd`.
    pub fn key_prefix(&self) -> String {
        format!("{}/", self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Namespace {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Namespace::parse(&value)
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.0
    }
}

impl std::str::FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::parse(s)
    }
}
