use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use sitehost_asset_server::{AssetServer, Resolver};
use sitehost_ingest::{IngestService, TracingRegistrySink};
use sitehost_site_store::{SiteStore, SiteStoreBuilder};

use super::locks::NamespaceLocks;
use crate::Config;

/// Everything a request handler needs; cheap to clone.
#[derive(Clone)]
pub struct ServeState {
    pub(crate) ingest: Arc<IngestService>,
    pub(crate) assets: Arc<AssetServer>,
    pub(crate) resolver: Arc<Resolver>,
    pub(crate) locks: Arc<NamespaceLocks>,
    pub(crate) health: Arc<ServeHealth>,
    pub(crate) max_upload_bytes: usize,
}

impl ServeState {
    /// Builds the store selected by `config.store` and wires both services onto it.
    pub fn from_config(config: &Config) -> Self {
        let store = SiteStoreBuilder::new(config.store_policy()).build();
        Self::with_store(store, config)
    }

    pub fn with_store(store: Arc<dyn SiteStore>, config: &Config) -> Self {
        let ingest = IngestService::new(Arc::clone(&store), config.ingest_policy())
            .with_registry(Arc::new(TracingRegistrySink));
        Self {
            ingest: Arc::new(ingest),
            assets: Arc::new(AssetServer::new(store)),
            resolver: Arc::new(Resolver::new(config.routing_policy())),
            locks: Arc::new(NamespaceLocks::new()),
            health: Arc::new(ServeHealth::new()),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }

    pub fn store(&self) -> &Arc<dyn SiteStore> {
        self.ingest.store()
    }

    pub fn locks(&self) -> &Arc<NamespaceLocks> {
        &self.locks
    }

    pub fn health_snapshot(&self) -> HealthSnapshot {
        self.health.snapshot()
    }

    pub fn mark_live(&self) {
        self.health.mark_live();
    }

    pub fn mark_ready(&self) {
        self.health.mark_ready();
    }

    pub fn mark_unready(&self, error: impl Into<String>) {
        self.health.mark_unready(error);
    }
}

#[derive(Clone, Debug)]
pub struct HealthSnapshot {
    pub ready: bool,
    pub live: bool,
    pub last_ready_check: Option<u64>,
    pub last_error: Option<String>,
}

#[derive(Default)]
pub struct ServeHealth {
    live: AtomicBool,
    ready: AtomicBool,
    last_ready_check: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl ServeHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_live(&self) {
        self.live.store(true, Ordering::SeqCst);
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
        self.update_last_check();
        *self.last_error.lock() = None;
    }

    pub fn mark_unready(&self, error: impl Into<String>) {
        self.ready.store(false, Ordering::SeqCst);
        self.update_last_check();
        *self.last_error.lock() = Some(error.into());
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            ready: self.ready.load(Ordering::SeqCst),
            live: self.live.load(Ordering::SeqCst),
            last_ready_check: self.last_ready_check(),
            last_error: self.last_error.lock().clone(),
        }
    }

    fn update_last_check(&self) {
        if let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) {
            self.last_ready_check
                .store(duration.as_secs(), Ordering::SeqCst);
        }
    }

    fn last_ready_check(&self) -> Option<u64> {
        match self.last_ready_check.load(Ordering::SeqCst) {
            0 => None,
            value => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServeHealth;

    #[test]
    fn readiness_tracks_last_error() {
        let health = ServeHealth::new();
        assert!(!health.snapshot().live);

        health.mark_live();
        health.mark_unready("store probe failed");
        let snapshot = health.snapshot();
        assert!(snapshot.live);
        assert!(!snapshot.ready);
        assert_eq!(snapshot.last_error.as_deref(), Some("store probe failed"));
        assert!(snapshot.last_ready_check.is_some());

        health.mark_ready();
        let snapshot = health.snapshot();
        assert!(snapshot.ready);
        assert!(snapshot.last_error.is_none());
    }
}
