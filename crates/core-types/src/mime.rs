use crate::path::{extension_of, SitePath};
use crate::DEFAULT_DOCUMENT;

/// Type reported for anything the table does not know.
pub const GENERIC_BINARY: &str = "application/octet-stream";

const MARKUP_EXTENSIONS: &[&str] = &["html", "htm"];

static CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("webmanifest", "application/manifest+json"),
    ("xml", "application/xml"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("wasm", "application/wasm"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("eot", "application/vnd.ms-fontobject"),
];

/// Content type derived from the extension of a stored path.
pub fn content_type_for(path: &SitePath) -> &'static str {
    content_type_for_name(path.file_name())
}

pub fn content_type_for_name(name: &str) -> &'static str {
    extension_of(name)
        .and_then(|ext| {
            CONTENT_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(GENERIC_BINARY)
}

pub fn is_markup(path: &SitePath) -> bool {
    path.extension()
        .map(|ext| MARKUP_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Document answered for the site root: `index.html` when present, otherwise the
/// shallowest markup object (ties broken by path order).
pub fn root_document(paths: &[SitePath]) -> Option<&SitePath> {
    if let Some(index) = paths.iter().find(|p| p.as_str() == DEFAULT_DOCUMENT) {
        return Some(index);
    }
    paths
        .iter()
        .filter(|p| is_markup(p))
        .min_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.cmp(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(raw: &[&str]) -> Vec<SitePath> {
        raw.iter().map(|p| SitePath::parse(p).unwrap()).collect()
    }

    #[test]
    fn maps_known_and_unknown_extensions() {
        assert_eq!(content_type_for_name("a.CSS"), "text/css");
        assert_eq!(content_type_for_name("logo.svg"), "image/svg+xml");
        assert_eq!(content_type_for_name("blob.xyz"), GENERIC_BINARY);
        assert_eq!(content_type_for_name("Makefile"), GENERIC_BINARY);
    }

    #[test]
    fn root_document_prefers_index() {
        let tree = paths(&["about.html", "index.html"]);
        assert_eq!(root_document(&tree).unwrap().as_str(), "index.html");
    }

    #[test]
    fn root_document_falls_back_to_shallowest_markup() {
        let tree = paths(&["a/z.html", "b.htm", "c.html", "style.css"]);
        assert_eq!(root_document(&tree).unwrap().as_str(), "b.htm");
        assert!(root_document(&paths(&["style.css"])).is_none());
        assert!(root_document(&[]).is_none());
    }
}
