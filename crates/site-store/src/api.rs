use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sitehost_core_types::{Namespace, SitePath};
use tracing::{debug, warn};

use crate::deadline::DeadlineStore;
use crate::errors::{StoreErrKind, StoreError};
use crate::fs::FsSiteStore;
use crate::memory::InMemorySiteStore;
use crate::policy::{StoreBackend, StorePolicyView};

pub type StoreResult<T> = Result<T, StoreError>;

/// Flat key of one site object, as reported in partial-failure lists.
pub fn object_key(namespace: &Namespace, path: &SitePath) -> String {
    format!("{}{}", namespace.key_prefix(), path)
}

/// Object store keyed by `(namespace, relative path)`.
///
/// Backends implement the single-object primitives; the prefix operations are derived
/// from them and report per-key failures instead of stopping at the first one.
#[async_trait]
pub trait SiteStore: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Writes or overwrites one object.
    async fn put(&self, namespace: &Namespace, path: &SitePath, bytes: Vec<u8>)
        -> StoreResult<()>;

    async fn get(&self, namespace: &Namespace, path: &SitePath) -> StoreResult<Option<Vec<u8>>>;

    /// Every relative path stored for the namespace, in path order.
    async fn list(&self, namespace: &Namespace) -> StoreResult<Vec<SitePath>>;

    /// Removes one object; `false` when nothing was stored under the key.
    async fn delete(&self, namespace: &Namespace, path: &SitePath) -> StoreResult<bool>;

    /// Cheap check used by readiness probes.
    async fn probe(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn delete_prefix(&self, namespace: &Namespace) -> StoreResult<usize> {
        let paths = self.list(namespace).await?;
        let mut completed = 0;
        let mut failed = Vec::new();
        for path in paths {
            match self.delete(namespace, &path).await {
                Ok(true) => completed += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(namespace = %namespace, path = %path, %err, "delete failed");
                    failed.push(object_key(namespace, &path));
                }
            }
        }
        debug!(namespace = %namespace, completed, failed = failed.len(), "delete_prefix finished");
        finish_bulk(completed, failed)
    }

    /// Copies every object of `src` to the same relative path under `dst`. The source is
    /// left in place.
    async fn copy_prefix(&self, src: &Namespace, dst: &Namespace) -> StoreResult<usize> {
        let paths = self.list(src).await?;
        let mut completed = 0;
        let mut failed = Vec::new();
        for path in paths {
            let copied = match self.get(src, &path).await {
                Ok(Some(bytes)) => self.put(dst, &path, bytes).await,
                Ok(None) => Err(StoreErrKind::InvalidKey(object_key(src, &path)).into()),
                Err(err) => Err(err),
            };
            match copied {
                Ok(()) => completed += 1,
                Err(err) => {
                    warn!(src = %src, dst = %dst, path = %path, %err, "copy failed");
                    failed.push(object_key(src, &path));
                }
            }
        }
        debug!(src = %src, dst = %dst, completed, failed = failed.len(), "copy_prefix finished");
        finish_bulk(completed, failed)
    }
}

pub(crate) fn finish_bulk(completed: usize, failed: Vec<String>) -> StoreResult<usize> {
    if failed.is_empty() {
        Ok(completed)
    } else {
        Err(StoreErrKind::PartialFailure { completed, failed }.into())
    }
}

#[derive(Clone, Debug, Default)]
pub struct SiteStoreBuilder {
    policy: StorePolicyView,
}

impl SiteStoreBuilder {
    pub fn new(policy: StorePolicyView) -> Self {
        Self { policy }
    }

    pub fn build(self) -> Arc<dyn SiteStore> {
        let inner: Arc<dyn SiteStore> = match self.policy.backend {
            StoreBackend::Memory => Arc::new(InMemorySiteStore::default()),
            StoreBackend::Fs => Arc::new(FsSiteStore::new(self.policy.io.root.clone())),
        };
        if self.policy.op_timeout_ms == 0 {
            return inner;
        }
        Arc::new(DeadlineStore::new(
            inner,
            Duration::from_millis(self.policy.op_timeout_ms),
        ))
    }
}
