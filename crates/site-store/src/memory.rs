use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use sitehost_core_types::{Namespace, SitePath};

use crate::api::{SiteStore, StoreResult};

/// Process-local backend. Each namespace owns an ordered map of its objects.
#[derive(Default)]
pub struct InMemorySiteStore {
    trees: DashMap<Namespace, BTreeMap<SitePath, Vec<u8>>>,
}

impl InMemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn namespace_count(&self) -> usize {
        self.trees.len()
    }
}

#[async_trait]
impl SiteStore for InMemorySiteStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, namespace: &Namespace, path: &SitePath, bytes: Vec<u8>) -> StoreResult<()> {
        self.trees
            .entry(namespace.clone())
            .or_default()
            .insert(path.clone(), bytes);
        Ok(())
    }

    async fn get(&self, namespace: &Namespace, path: &SitePath) -> StoreResult<Option<Vec<u8>>> {
        Ok(self
            .trees
            .get(namespace)
            .and_then(|tree| tree.get(path).cloned()))
    }

    async fn list(&self, namespace: &Namespace) -> StoreResult<Vec<SitePath>> {
        Ok(self
            .trees
            .get(namespace)
            .map(|tree| tree.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, namespace: &Namespace, path: &SitePath) -> StoreResult<bool> {
        let removed = match self.trees.get_mut(namespace) {
            Some(mut tree) => tree.remove(path).is_some(),
            None => return Ok(false),
        };
        self.trees.remove_if(namespace, |_, tree| tree.is_empty());
        Ok(removed)
    }

    async fn delete_prefix(&self, namespace: &Namespace) -> StoreResult<usize> {
        Ok(self
            .trees
            .remove(namespace)
            .map(|(_, tree)| tree.len())
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(raw: &str) -> Namespace {
        Namespace::parse(raw).unwrap()
    }

    fn path(raw: &str) -> SitePath {
        SitePath::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn prefixes_do_not_leak_between_namespaces() {
        let store = InMemorySiteStore::new();
        store.put(&ns("abc"), &path("index.html"), b"a".to_vec()).await.unwrap();
        store.put(&ns("abcd"), &path("index.html"), b"b".to_vec()).await.unwrap();

        assert_eq!(store.delete_prefix(&ns("abc")).await.unwrap(), 1);
        assert!(store.list(&ns("abc")).await.unwrap().is_empty());
        assert_eq!(store.list(&ns("abcd")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_namespaces_are_dropped() {
        let store = InMemorySiteStore::new();
        store.put(&ns("demo"), &path("a.txt"), vec![1]).await.unwrap();
        assert!(store.delete(&ns("demo"), &path("a.txt")).await.unwrap());
        assert!(!store.delete(&ns("demo"), &path("a.txt")).await.unwrap());
        assert_eq!(store.namespace_count(), 0);
    }
}
