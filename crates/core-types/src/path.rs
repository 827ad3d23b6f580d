use std::fmt;

use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SitePathError {
    #[error("path is empty")]
    Empty,
    #[error("path is absolute")]
    Absolute,
    #[error("path contains a parent segment")]
    ParentSegment,
    #[error("path escapes the site root")]
    Escapes,
    #[error("path segment {0:?} is not allowed")]
    InvalidSegment(String),
}

/// Canonical POSIX-style relative path of a site object.
///
/// A `SitePath` never starts with `/`, never contains `.`/`..` or empty segments,
/// and never contains control characters or backslashes.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(try_from = "String", into = "String"))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SitePath(String);

impl SitePath {
    /// Strict parse used for storage keys and request paths: any `..` segment is refused.
    pub fn parse(raw: &str) -> Result<Self, SitePathError> {
        if raw.starts_with('/') || has_drive_prefix(raw) {
            return Err(SitePathError::Absolute);
        }
        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(SitePathError::ParentSegment),
                other => {
                    check_segment(other)?;
                    segments.push(other);
                }
            }
        }
        Self::from_segments(&segments)
    }

    /// Lexically resolves an archive entry name against the archive root.
    ///
    /// Backslashes are treated as separators; `..` is allowed as long as it never climbs
    /// above the root.
    pub fn resolve_within_root(raw: &str) -> Result<Self, SitePathError> {
        let normalized = raw.replace('\\', "/");
        if normalized.starts_with('/') || has_drive_prefix(&normalized) {
            return Err(SitePathError::Absolute);
        }
        let mut stack: Vec<&str> = Vec::new();
        for segment in normalized.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    if stack.pop().is_none() {
                        return Err(SitePathError::Escapes);
                    }
                }
                other => {
                    check_segment(other)?;
                    stack.push(other);
                }
            }
        }
        Self::from_segments(&stack)
    }

    /// Path of the document answered for directory requests.
    pub fn default_document() -> Self {
        Self(crate::DEFAULT_DOCUMENT.to_string())
    }

    fn from_segments(segments: &[&str]) -> Result<Self, SitePathError> {
        if segments.is_empty() {
            return Err(SitePathError::Empty);
        }
        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Lower-cased extension of the final segment, without the dot.
    pub fn extension(&self) -> Option<String> {
        extension_of(self.file_name())
    }

    pub fn first_segment(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// Drops the first segment; `None` when the path has a single segment.
    pub fn strip_first_segment(&self) -> Option<SitePath> {
        self.0
            .split_once('/')
            .map(|(_, rest)| SitePath(rest.to_string()))
    }

    pub fn join(&self, child: &str) -> Result<SitePath, SitePathError> {
        SitePath::parse(&format!("{}/{}", self.0, child))
    }
}

/// Lower-cased extension of a bare file name, without the dot. Dotfiles have none.
pub fn extension_of(name: &str) -> Option<String> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}

fn check_segment(segment: &str) -> Result<(), SitePathError> {
    if segment.chars().any(|ch| ch.is_control() || ch == '\\') {
        return Err(SitePathError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl fmt::Display for SitePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SitePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SitePath {
    type Error = SitePathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SitePath::parse(&value)
    }
}

impl From<SitePath> for String {
    fn from(value: SitePath) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_collapses_redundant_segments() {
        let path = SitePath::parse("css//./a.css").unwrap();
        assert_eq!(path.as_str(), "css/a.css");
        assert_eq!(path.depth(), 2);
        assert_eq!(path.file_name(), "a.css");
        assert_eq!(path.extension().as_deref(), Some("css"));
    }

    #[test]
    fn parse_refuses_parent_and_absolute() {
        assert_eq!(
            SitePath::parse("a/../b"),
            Err(SitePathError::ParentSegment)
        );
        assert_eq!(SitePath::parse("/etc/passwd"), Err(SitePathError::Absolute));
        assert_eq!(SitePath::parse("C:/boot.ini"), Err(SitePathError::Absolute));
        assert_eq!(SitePath::parse(""), Err(SitePathError::Empty));
        assert_eq!(SitePath::parse("./"), Err(SitePathError::Empty));
        assert!(matches!(
            SitePath::parse("a\\b"),
            Err(SitePathError::InvalidSegment(_))
        ));
    }

    #[test]
    fn resolve_keeps_entries_inside_root() {
        assert_eq!(
            SitePath::resolve_within_root("site/../index.html")
                .unwrap()
                .as_str(),
            "index.html"
        );
        assert_eq!(
            SitePath::resolve_within_root("dir\\sub\\file.txt")
                .unwrap()
                .as_str(),
            "dir/sub/file.txt"
        );
        assert_eq!(
            SitePath::resolve_within_root("../../etc/passwd"),
            Err(SitePathError::Escapes)
        );
        assert_eq!(
            SitePath::resolve_within_root("a/../../x"),
            Err(SitePathError::Escapes)
        );
        assert_eq!(
            SitePath::resolve_within_root("/etc/passwd"),
            Err(SitePathError::Absolute)
        );
    }

    #[test]
    fn first_segment_helpers() {
        let path = SitePath::parse("site/css/a.css").unwrap();
        assert_eq!(path.first_segment(), "site");
        assert_eq!(path.strip_first_segment().unwrap().as_str(), "css/a.css");
        assert!(SitePath::parse("index.html")
            .unwrap()
            .strip_first_segment()
            .is_none());
    }

    #[test]
    fn extension_ignores_dotfiles() {
        assert_eq!(SitePath::parse(".htaccess").unwrap().extension(), None);
        assert_eq!(
            SitePath::parse("PAGE.HTM").unwrap().extension().as_deref(),
            Some("htm")
        );
    }
}
