use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sitehost_core_types::SitePath;
use tracing::warn;

/// Files found under a namespace directory plus the directories that could not be read.
#[derive(Debug, Default)]
pub struct Walk {
    pub files: Vec<SitePath>,
    pub unreadable: Vec<PathBuf>,
}

/// Recursively lists regular files below `base`, relative to it. A missing `base` is an
/// empty namespace; an unreadable `base` is an error.
pub fn walk_namespace(base: &Path) -> io::Result<Walk> {
    let mut walk = Walk::default();
    let top = match fs::read_dir(base) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(walk),
        Err(err) => return Err(err),
    };
    let mut pending = vec![(top, String::new())];
    while let Some((entries, prefix)) = pending.pop() {
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(dir = %base.join(&prefix).display(), %err, "skipping unreadable entry");
                    walk.unreadable.push(base.join(&prefix));
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(_) => {
                    walk.unreadable.push(entry.path());
                    continue;
                }
            };
            if file_type.is_dir() {
                match fs::read_dir(entry.path()) {
                    Ok(children) => pending.push((children, relative)),
                    Err(err) => {
                        warn!(dir = %entry.path().display(), %err, "cannot read directory");
                        walk.unreadable.push(entry.path());
                    }
                }
            } else if file_type.is_file() {
                match SitePath::parse(&relative) {
                    Ok(path) => walk.files.push(path),
                    Err(err) => warn!(file = %relative, %err, "ignoring file with unusable name"),
                }
            }
        }
    }
    walk.files.sort();
    Ok(walk)
}
