use sitehost_core_types::SitePath;

use crate::classify::PayloadKind;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizedEntry {
    pub path: SitePath,
    pub bytes: Vec<u8>,
}

impl NormalizedEntry {
    pub fn new(path: SitePath, bytes: Vec<u8>) -> Self {
        Self { path, bytes }
    }
}

/// Flat, path-ordered site tree produced from one upload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizedSite {
    pub kind: PayloadKind,
    pub entries: Vec<NormalizedEntry>,
    /// Number of wrapper directories removed by the collapse rule.
    pub collapsed_levels: usize,
}

impl NormalizedSite {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
