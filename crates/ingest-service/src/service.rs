use std::sync::Arc;

use sitehost_archive::Normalizer;
use sitehost_core_types::{
    content_type_for, root_document, IngestMode, Namespace, SitePath, SiteSummary,
};
use sitehost_site_store::{object_key, SiteStore, StoreErrKind, StoreError};
use tracing::{info, instrument, warn};

use crate::errors::{IngestErrKind, IngestError, IngestResult};
use crate::metrics;
use crate::policy::IngestPolicy;
use crate::registry::{RegistryEvent, RegistrySink, TracingRegistrySink};

/// One uploaded payload. The declared MIME type is advisory and never drives decisions.
#[derive(Clone, Debug, Default)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub declared_mime: Option<String>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            declared_mime: None,
        }
    }
}

/// Write path of the engine: validates names, normalizes payloads and moves whole site
/// trees in and out of the store.
///
/// Mutations of the same namespace must be serialized by the caller; this type holds no
/// per-namespace state.
pub struct IngestService {
    store: Arc<dyn SiteStore>,
    normalizer: Normalizer,
    policy: IngestPolicy,
    registry: Arc<dyn RegistrySink>,
}

impl IngestService {
    pub fn new(store: Arc<dyn SiteStore>, policy: IngestPolicy) -> Self {
        Self {
            store,
            normalizer: Normalizer::new(policy.archive.clone()),
            policy,
            registry: Arc::new(TracingRegistrySink),
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn RegistrySink>) -> Self {
        self.registry = registry;
        self
    }

    pub fn store(&self) -> &Arc<dyn SiteStore> {
        &self.store
    }

    pub fn policy(&self) -> &IngestPolicy {
        &self.policy
    }

    pub fn validate_namespace(&self, raw: &str) -> IngestResult<Namespace> {
        let namespace = Namespace::parse(raw)
            .map_err(|err| IngestErrKind::InvalidNamespace(format!("{raw:?}: {err}")))?;
        if self.policy.is_reserved(namespace.as_str()) {
            return Err(IngestErrKind::InvalidNamespace(format!("{raw:?} is reserved")).into());
        }
        Ok(namespace)
    }

    #[instrument(
        name = "sitehost.ingest",
        skip(self, upload),
        fields(filename = %upload.filename, bytes = upload.bytes.len())
    )]
    pub async fn ingest(
        &self,
        namespace: &str,
        upload: Upload,
        mode: IngestMode,
    ) -> IngestResult<SiteSummary> {
        let result = self.ingest_inner(namespace, upload, mode).await;
        match &result {
            Ok(summary) => {
                metrics::record(mode.as_str(), "ok");
                metrics::observe_files(summary.file_count);
            }
            Err(err) => {
                metrics::record(mode.as_str(), err.code());
                warn!(namespace, code = err.code(), %err, "ingestion failed");
            }
        }
        result
    }

    async fn ingest_inner(
        &self,
        raw_namespace: &str,
        upload: Upload,
        mode: IngestMode,
    ) -> IngestResult<SiteSummary> {
        let namespace = self.validate_namespace(raw_namespace)?;
        // Normalize first: a bad payload must fail before anything is written or removed.
        let site = self.normalizer.normalize(&upload.filename, &upload.bytes)?;

        let existing = self.store.list(&namespace).await?;
        if !existing.is_empty() {
            match mode {
                IngestMode::Create => {
                    return Err(IngestErrKind::NamespaceTaken(namespace.to_string()).into())
                }
                IngestMode::Replace => {
                    let removed = self.store.delete_prefix(&namespace).await?;
                    info!(namespace = %namespace, removed, "previous site tree removed");
                }
            }
        }

        let total = site.len();
        let paths: Vec<SitePath> = site.entries.iter().map(|e| e.path.clone()).collect();
        let mut failed = Vec::new();
        for entry in site.entries {
            if let Err(err) = self.store.put(&namespace, &entry.path, entry.bytes).await {
                warn!(namespace = %namespace, path = %entry.path, %err, "object write failed");
                failed.push(object_key(&namespace, &entry.path));
            }
        }
        if !failed.is_empty() {
            let completed = total - failed.len();
            let err = if completed == 0 {
                StoreError::unavailable(format!("all {total} object writes failed"))
            } else {
                StoreErrKind::PartialFailure { completed, failed }.into()
            };
            return Err(err.into());
        }

        let summary = self.summarize(&namespace, &paths);
        info!(
            namespace = %namespace,
            mode = %mode,
            kind = %site.kind,
            files = total,
            collapsed = site.collapsed_levels,
            "site ingested"
        );
        self.registry.emit(RegistryEvent::Recorded(summary.clone()));
        Ok(summary)
    }

    /// Moves a whole site tree to a new namespace. Never merges into an occupied one.
    #[instrument(name = "sitehost.rename", skip(self))]
    pub async fn rename(&self, old: &str, new: &str) -> IngestResult<SiteSummary> {
        let result = self.rename_inner(old, new).await;
        match &result {
            Ok(_) => metrics::record("rename", "ok"),
            Err(err) => {
                metrics::record("rename", err.code());
                warn!(code = err.code(), %err, "rename failed");
            }
        }
        result
    }

    async fn rename_inner(&self, old: &str, new: &str) -> IngestResult<SiteSummary> {
        let source = Namespace::parse(old)
            .map_err(|err| IngestErrKind::InvalidNamespace(format!("{old:?}: {err}")))?;
        let target = self.validate_namespace(new)?;

        let paths = self.store.list(&source).await?;
        if paths.is_empty() {
            return Err(IngestErrKind::UnknownNamespace(source.to_string()).into());
        }
        if source == target {
            return Ok(self.summarize(&source, &paths));
        }
        if !self.store.list(&target).await?.is_empty() {
            return Err(IngestErrKind::NamespaceTaken(target.to_string()).into());
        }

        let copied = match self.store.copy_prefix(&source, &target).await {
            Ok(copied) => copied,
            Err(err) => return Err(self.abort_rename(&target, err).await),
        };
        let removed = match self.store.delete_prefix(&source).await {
            Ok(removed) => removed,
            Err(err) => return Err(self.incomplete_cleanup(&source, &target, &paths, err)),
        };
        info!(from = %source, to = %target, copied, removed, "site renamed");

        let summary = self.summarize(&target, &paths);
        self.registry.emit(RegistryEvent::Forgotten(source));
        self.registry.emit(RegistryEvent::Recorded(summary.clone()));
        Ok(summary)
    }

    /// The destination was empty before the copy, so clearing it restores both sides.
    async fn abort_rename(&self, target: &Namespace, err: StoreError) -> IngestError {
        if let Err(cleanup) = self.store.delete_prefix(target).await {
            warn!(namespace = %target, %cleanup, "could not clear partial rename target");
        }
        match err.kind() {
            StoreErrKind::PartialFailure { completed, failed } => IngestErrKind::RenamePartial {
                completed: *completed,
                failed: failed.clone(),
            }
            .into(),
            _ => err.into(),
        }
    }

    /// The target already holds the full tree; whatever the source still holds is reported.
    fn incomplete_cleanup(
        &self,
        source: &Namespace,
        target: &Namespace,
        paths: &[SitePath],
        err: StoreError,
    ) -> IngestError {
        let (removed, leftover) = match err.kind() {
            StoreErrKind::PartialFailure { completed, failed } => (*completed, failed.clone()),
            _ => (0, paths.iter().map(|path| object_key(source, path)).collect()),
        };
        warn!(
            from = %source,
            to = %target,
            removed,
            leftover = ?leftover,
            %err,
            "site renamed but source objects were left behind"
        );
        self.registry.emit(RegistryEvent::Recorded(self.summarize(target, paths)));
        IngestErrKind::RenameCleanupPartial {
            target: target.to_string(),
            removed,
            leftover,
        }
        .into()
    }

    #[instrument(name = "sitehost.delete", skip(self))]
    pub async fn delete(&self, namespace: &str) -> IngestResult<usize> {
        let result = self.delete_inner(namespace).await;
        match &result {
            Ok(_) => metrics::record("delete", "ok"),
            Err(err) => metrics::record("delete", err.code()),
        }
        result
    }

    async fn delete_inner(&self, raw_namespace: &str) -> IngestResult<usize> {
        let namespace = Namespace::parse(raw_namespace)
            .map_err(|err| IngestErrKind::InvalidNamespace(format!("{raw_namespace:?}: {err}")))?;
        let removed = self.store.delete_prefix(&namespace).await?;
        if removed > 0 {
            info!(namespace = %namespace, removed, "site deleted");
            self.registry.emit(RegistryEvent::Forgotten(namespace));
        }
        Ok(removed)
    }

    pub async fn list(&self, namespace: &str) -> IngestResult<Vec<SitePath>> {
        let namespace = Namespace::parse(namespace)
            .map_err(|err| IngestErrKind::InvalidNamespace(format!("{namespace:?}: {err}")))?;
        Ok(self.store.list(&namespace).await?)
    }

    fn summarize(&self, namespace: &Namespace, paths: &[SitePath]) -> SiteSummary {
        let primary = root_document(paths)
            .or_else(|| paths.iter().min())
            .map(|path| content_type_for(path).to_string());
        SiteSummary::new(
            namespace.clone(),
            self.policy.site_url(namespace),
            paths.len(),
            primary,
        )
    }
}
