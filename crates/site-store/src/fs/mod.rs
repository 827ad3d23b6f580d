mod layout;
mod walk;
mod writer;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sitehost_core_types::{Namespace, SitePath};
use tracing::debug;

use crate::api::{object_key, SiteStore, StoreResult};
use crate::errors::{StoreErrKind, StoreError};

pub use layout::STAGING_DIR;

/// Filesystem backend: `<root>/<namespace>/<relative path>`.
///
/// Blocking I/O runs on the blocking pool so slow disks never stall the request workers.
#[derive(Clone, Debug)]
pub struct FsSiteStore {
    root: Arc<PathBuf>,
}

impl FsSiteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn blocking<T, F>(&self, op: &'static str, key: String, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> io::Result<T> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        let joined = tokio::task::spawn_blocking(move || work(&root)).await;
        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(StoreError::unavailable(format!("{op} {key}: {err}"))),
            Err(err) => Err(StoreError::unavailable(format!("{op} {key}: {err}"))),
        }
    }
}

#[async_trait]
impl SiteStore for FsSiteStore {
    fn backend(&self) -> &'static str {
        "fs"
    }

    async fn put(&self, namespace: &Namespace, path: &SitePath, bytes: Vec<u8>) -> StoreResult<()> {
        let (ns, rel) = (namespace.clone(), path.clone());
        self.blocking("put", object_key(namespace, path), move |root| {
            let target = layout::object_path(root, &ns, &rel);
            writer::write_atomic(root, &target, &bytes)
        })
        .await
    }

    async fn get(&self, namespace: &Namespace, path: &SitePath) -> StoreResult<Option<Vec<u8>>> {
        let (ns, rel) = (namespace.clone(), path.clone());
        self.blocking("get", object_key(namespace, path), move |root| {
            let target = layout::object_path(root, &ns, &rel);
            match std::fs::metadata(&target) {
                Ok(meta) if meta.is_file() => std::fs::read(&target).map(Some),
                Ok(_) => Ok(None),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            }
        })
        .await
    }

    async fn list(&self, namespace: &Namespace) -> StoreResult<Vec<SitePath>> {
        let ns = namespace.clone();
        let walk = self
            .blocking("list", namespace.key_prefix(), move |root| {
                walk::walk_namespace(&layout::namespace_dir(root, &ns))
            })
            .await?;
        if !walk.unreadable.is_empty() {
            return Err(StoreErrKind::PartialFailure {
                completed: walk.files.len(),
                failed: walk
                    .unreadable
                    .iter()
                    .map(|dir| dir.display().to_string())
                    .collect(),
            }
            .into());
        }
        Ok(walk.files)
    }

    async fn delete(&self, namespace: &Namespace, path: &SitePath) -> StoreResult<bool> {
        let (ns, rel) = (namespace.clone(), path.clone());
        let removed = self
            .blocking("delete", object_key(namespace, path), move |root| {
                let target = layout::object_path(root, &ns, &rel);
                writer::remove_and_prune(&target, &layout::namespace_dir(root, &ns))
            })
            .await?;
        debug!(namespace = %namespace, path = %path, removed, "fs delete");
        Ok(removed)
    }

    async fn probe(&self) -> StoreResult<()> {
        self.blocking("probe", self.root.display().to_string(), |root| {
            std::fs::create_dir_all(root.join(STAGING_DIR))
        })
        .await
    }
}
