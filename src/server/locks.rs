use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-namespace mutation locks.
///
/// At most one ingest, rename or delete runs against a namespace at a time. Slots are
/// created on demand and pruned once nobody holds or waits on them.
#[derive(Default)]
pub struct NamespaceLocks {
    slots: DashMap<String, LockSlot>,
}

struct LockSlot {
    mutex: Arc<Mutex<()>>,
    last_used: Instant,
}

/// Guards held for the duration of one mutation.
pub struct NamespaceGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl NamespaceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, namespace: &str) -> NamespaceGuard {
        let guard = self.slot(namespace).lock_owned().await;
        NamespaceGuard {
            _guards: vec![guard],
        }
    }

    /// Locks two namespaces in sorted order so concurrent renames cannot deadlock.
    pub async fn acquire_pair(&self, first: &str, second: &str) -> NamespaceGuard {
        let mut names = [first, second];
        names.sort_unstable();
        let mut guards = Vec::with_capacity(2);
        guards.push(self.slot(names[0]).lock_owned().await);
        if names[1] != names[0] {
            guards.push(self.slot(names[1]).lock_owned().await);
        }
        NamespaceGuard { _guards: guards }
    }

    fn slot(&self, namespace: &str) -> Arc<Mutex<()>> {
        let mut entry = self
            .slots
            .entry(namespace.to_string())
            .or_insert_with(|| LockSlot {
                mutex: Arc::new(Mutex::new(())),
                last_used: Instant::now(),
            });
        entry.last_used = Instant::now();
        Arc::clone(&entry.mutex)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drops slots idle for at least `max_idle` that no task holds or waits on.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        if max_idle.is_zero() {
            return 0;
        }
        let now = Instant::now();
        let before = self.slots.len();
        self.slots.retain(|_, slot| {
            Arc::strong_count(&slot.mutex) > 1 || now.duration_since(slot.last_used) < max_idle
        });
        before.saturating_sub(self.slots.len())
    }
}
