use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sitehost_core_types::{Namespace, SitePath};

use crate::api::{SiteStore, StoreResult};
use crate::errors::StoreError;

/// Runs `fut` under `limit`; expiry is reported as an unavailable store.
pub async fn with_deadline<T, F>(op: &'static str, limit: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::unavailable(format!(
            "{op} timed out after {}ms",
            limit.as_millis()
        ))),
    }
}

/// Wraps a backend so that no primitive can hang past the configured limit.
///
/// Prefix operations are not overridden: they run on top of the bounded primitives,
/// so a stalled key surfaces as one entry of a partial failure.
pub struct DeadlineStore {
    inner: Arc<dyn SiteStore>,
    limit: Duration,
}

impl DeadlineStore {
    pub fn new(inner: Arc<dyn SiteStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl SiteStore for DeadlineStore {
    fn backend(&self) -> &'static str {
        self.inner.backend()
    }

    async fn put(&self, namespace: &Namespace, path: &SitePath, bytes: Vec<u8>) -> StoreResult<()> {
        with_deadline("put", self.limit, self.inner.put(namespace, path, bytes)).await
    }

    async fn get(&self, namespace: &Namespace, path: &SitePath) -> StoreResult<Option<Vec<u8>>> {
        with_deadline("get", self.limit, self.inner.get(namespace, path)).await
    }

    async fn list(&self, namespace: &Namespace) -> StoreResult<Vec<SitePath>> {
        with_deadline("list", self.limit, self.inner.list(namespace)).await
    }

    async fn delete(&self, namespace: &Namespace, path: &SitePath) -> StoreResult<bool> {
        with_deadline("delete", self.limit, self.inner.delete(namespace, path)).await
    }

    async fn probe(&self) -> StoreResult<()> {
        with_deadline("probe", self.limit, self.inner.probe()).await
    }
}
