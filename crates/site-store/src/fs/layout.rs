use std::path::{Path, PathBuf};

use sitehost_core_types::{Namespace, SitePath};

/// Scratch directory for in-flight writes. Namespaces cannot start with a dot, so it
/// never collides with a site directory.
pub const STAGING_DIR: &str = ".staging";

pub fn namespace_dir(root: &Path, namespace: &Namespace) -> PathBuf {
    root.join(namespace.as_str())
}

pub fn object_path(root: &Path, namespace: &Namespace, path: &SitePath) -> PathBuf {
    let mut full = namespace_dir(root, namespace);
    for segment in path.segments() {
        full.push(segment);
    }
    full
}

pub fn staging_path(root: &Path) -> PathBuf {
    let mut path = root.join(STAGING_DIR);
    path.push(format!("{}.tmp", uuid::Uuid::new_v4()));
    path
}
