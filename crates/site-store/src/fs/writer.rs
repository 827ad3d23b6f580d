use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::layout;

/// Writes through a staging file and renames into place, so readers never observe a
/// half-written object.
pub fn write_atomic(root: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = layout::staging_path(root);
    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }
    let result = (|| {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Removes a file, then every directory between it and `stop` that became empty.
pub fn remove_and_prune(path: &Path, stop: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    }
    let mut current = path.parent();
    while let Some(dir) = current {
        if !dir.starts_with(stop) || fs::remove_dir(dir).is_err() {
            break;
        }
        if dir == stop {
            break;
        }
        current = dir.parent();
    }
    Ok(true)
}
