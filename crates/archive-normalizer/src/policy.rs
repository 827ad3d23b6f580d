use serde::{Deserialize, Serialize};

/// Guard rails applied while decompressing an uploaded container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveLimits {
    pub max_entries: usize,
    pub max_total_bytes: u64,
    /// Drop resource-fork noise such as `__MACOSX/` and `.DS_Store` before collapsing.
    pub skip_os_metadata: bool,
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_total_bytes: 512 * 1024 * 1024,
            skip_os_metadata: true,
        }
    }
}
