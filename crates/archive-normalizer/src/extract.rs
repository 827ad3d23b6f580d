use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use sitehost_core_types::SitePath;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::errors::{NormalizeError, NormalizeResult};
use crate::policy::ArchiveLimits;

/// Inflates every file entry of a ZIP payload, keyed by its root-relative path.
///
/// Directory markers are skipped, and entries that are absolute or climb above the
/// archive root are discarded rather than failing the whole upload.
pub fn extract_zip(
    bytes: &[u8],
    limits: &ArchiveLimits,
) -> NormalizeResult<BTreeMap<SitePath, Vec<u8>>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    if archive.len() > limits.max_entries {
        return Err(NormalizeError::corrupt(format!(
            "archive lists {} entries (limit {})",
            archive.len(),
            limits.max_entries
        )));
    }

    let mut files = BTreeMap::new();
    let mut total: u64 = 0;
    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let raw_name = file.name().to_string();
        if file.is_dir() || raw_name.ends_with('/') || raw_name.ends_with('\\') {
            continue;
        }
        let path = match SitePath::resolve_within_root(&raw_name) {
            Ok(path) => path,
            Err(err) => {
                warn!(entry = %raw_name, %err, "discarding archive entry outside the site root");
                continue;
            }
        };
        if limits.skip_os_metadata && is_os_metadata(&path) {
            debug!(entry = %raw_name, "skipping os metadata entry");
            continue;
        }

        let remaining = limits.max_total_bytes.saturating_sub(total);
        // The declared size is attacker-controlled; let the buffer grow with real output.
        let mut content = Vec::new();
        (&mut file)
            .take(remaining.saturating_add(1))
            .read_to_end(&mut content)
            .map_err(|err| NormalizeError::corrupt(format!("failed to inflate {raw_name}: {err}")))?;
        total += content.len() as u64;
        if total > limits.max_total_bytes {
            return Err(NormalizeError::corrupt(format!(
                "archive expands beyond {} bytes",
                limits.max_total_bytes
            )));
        }

        if files.insert(path, content).is_some() {
            warn!(entry = %raw_name, "duplicate archive entry; keeping the later copy");
        }
    }
    Ok(files)
}

fn is_os_metadata(path: &SitePath) -> bool {
    path.first_segment() == "__MACOSX" || matches!(path.file_name(), ".DS_Store" | "Thumbs.db")
}
