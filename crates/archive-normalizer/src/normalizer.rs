use sitehost_core_types::SitePath;
use tracing::debug;

use crate::classify::{base_name, classify, PayloadKind};
use crate::collapse::collapse_wrappers;
use crate::errors::{NormalizeError, NormalizeResult};
use crate::extract::extract_zip;
use crate::model::{NormalizedEntry, NormalizedSite};
use crate::policy::ArchiveLimits;

#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    limits: ArchiveLimits,
}

impl Normalizer {
    pub fn new(limits: ArchiveLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ArchiveLimits {
        &self.limits
    }

    /// Turns an upload into a flat site tree ordered by path.
    ///
    /// Markup files always land at the default document; other single files keep their
    /// name; ZIP containers are inflated and stripped of wrapper directories.
    pub fn normalize(&self, filename: &str, bytes: &[u8]) -> NormalizeResult<NormalizedSite> {
        let kind = classify(filename)?;
        let site = match kind {
            PayloadKind::Markup => NormalizedSite {
                kind,
                entries: vec![NormalizedEntry::new(SitePath::default_document(), bytes.to_vec())],
                collapsed_levels: 0,
            },
            PayloadKind::Opaque => {
                let name = base_name(filename)?;
                let path = SitePath::parse(name).map_err(|err| {
                    NormalizeError::unsupported(format!("file name {name:?} is not usable: {err}"))
                })?;
                NormalizedSite {
                    kind,
                    entries: vec![NormalizedEntry::new(path, bytes.to_vec())],
                    collapsed_levels: 0,
                }
            }
            PayloadKind::Archive => {
                let files = extract_zip(bytes, &self.limits)?;
                let (files, collapsed_levels) = collapse_wrappers(files);
                NormalizedSite {
                    kind,
                    entries: files
                        .into_iter()
                        .map(|(path, bytes)| NormalizedEntry::new(path, bytes))
                        .collect(),
                    collapsed_levels,
                }
            }
        };
        debug!(
            filename,
            kind = %site.kind,
            entries = site.len(),
            collapsed = site.collapsed_levels,
            "payload normalized"
        );
        Ok(site)
    }
}

/// Normalizes with the default archive limits.
pub fn normalize(filename: &str, bytes: &[u8]) -> NormalizeResult<NormalizedSite> {
    Normalizer::default().normalize(filename, bytes)
}

