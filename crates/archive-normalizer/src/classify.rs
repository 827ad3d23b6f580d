use std::fmt;

use serde::{Deserialize, Serialize};
use sitehost_core_types::extension_of;

use crate::errors::{NormalizeError, NormalizeResult};

const ARCHIVE_EXTENSIONS: &[&str] = &["zip"];
const MARKUP_EXTENSIONS: &[&str] = &["html", "htm"];
/// Containers we recognise but cannot unpack.
const UNSUPPORTED_CONTAINERS: &[&str] = &["tar", "tgz", "gz", "bz2", "xz", "zst", "rar", "7z"];

/// How an upload is turned into a site tree. Decided from the declared file name only.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Archive,
    Markup,
    Opaque,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Archive => "archive",
            PayloadKind::Markup => "markup",
            PayloadKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(filename: &str) -> NormalizeResult<PayloadKind> {
    let name = base_name(filename)?;
    let Some(ext) = extension_of(name) else {
        return Ok(PayloadKind::Opaque);
    };
    if ARCHIVE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(PayloadKind::Archive)
    } else if MARKUP_EXTENSIONS.contains(&ext.as_str()) {
        Ok(PayloadKind::Markup)
    } else if UNSUPPORTED_CONTAINERS.contains(&ext.as_str()) {
        Err(NormalizeError::unsupported(format!(
            "'.{ext}' containers are not supported; upload a .zip"
        )))
    } else {
        Ok(PayloadKind::Opaque)
    }
}

/// Final component of a declared file name. Some clients send full local paths.
pub(crate) fn base_name(filename: &str) -> NormalizeResult<&str> {
    let trimmed = filename.trim();
    let name = trimmed
        .rsplit(|ch| ch == '/' || ch == '\\')
        .next()
        .unwrap_or(trimmed);
    if name.is_empty() || name == "." || name == ".." {
        return Err(NormalizeError::unsupported("payload has no usable file name"));
    }
    Ok(name)
}
