use std::sync::Arc;

use sitehost_core_types::{Namespace, SitePath};
use sitehost_site_store::{
    FsSiteStore, InMemorySiteStore, SiteStore, SiteStoreBuilder, StoreBackend, StoreErrKind,
    StorePolicyView, STAGING_DIR,
};

fn ns(raw: &str) -> Namespace {
    Namespace::parse(raw).unwrap()
}

fn path(raw: &str) -> SitePath {
    SitePath::parse(raw).unwrap()
}

fn backends(dir: &tempfile::TempDir) -> Vec<Arc<dyn SiteStore>> {
    vec![
        Arc::new(InMemorySiteStore::new()),
        Arc::new(FsSiteStore::new(dir.path().join("sites"))),
    ]
}

async fn seed(store: &dyn SiteStore, namespace: &Namespace, files: &[(&str, &[u8])]) {
    for (rel, bytes) in files {
        store
            .put(namespace, &path(rel), bytes.to_vec())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn put_is_idempotent_and_list_is_ordered() {
    let dir = tempfile::tempdir().unwrap();
    for store in backends(&dir) {
        let demo = ns("demo");
        seed(
            store.as_ref(),
            &demo,
            &[("z.txt", b"z"), ("css/a.css", b"a"), ("index.html", b"1")],
        )
        .await;
        store.put(&demo, &path("index.html"), b"2".to_vec()).await.unwrap();

        let listed: Vec<String> = store
            .list(&demo)
            .await
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(listed, vec!["css/a.css", "index.html", "z.txt"], "{}", store.backend());
        assert_eq!(
            store.get(&demo, &path("index.html")).await.unwrap(),
            Some(b"2".to_vec())
        );
        assert_eq!(store.get(&demo, &path("missing.txt")).await.unwrap(), None);
        assert_eq!(store.get(&demo, &path("css")).await.unwrap(), None);
    }
}

#[tokio::test]
async fn unknown_namespace_lists_empty() {
    let dir = tempfile::tempdir().unwrap();
    for store in backends(&dir) {
        assert!(store.list(&ns("nobody")).await.unwrap().is_empty());
        assert_eq!(store.delete_prefix(&ns("nobody")).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn delete_prefix_respects_namespace_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    for store in backends(&dir) {
        seed(store.as_ref(), &ns("abc"), &[("a/b/c.txt", b"1"), ("d.txt", b"2")]).await;
        seed(store.as_ref(), &ns("abcd"), &[("d.txt", b"3")]).await;

        assert_eq!(store.delete_prefix(&ns("abc")).await.unwrap(), 2);
        assert!(store.list(&ns("abc")).await.unwrap().is_empty());
        assert_eq!(store.list(&ns("abcd")).await.unwrap(), vec![path("d.txt")]);
    }
}

#[tokio::test]
async fn copy_prefix_preserves_paths_and_source() {
    let dir = tempfile::tempdir().unwrap();
    for store in backends(&dir) {
        let (old, new) = (ns("old"), ns("new"));
        seed(store.as_ref(), &old, &[("index.html", b"<p>"), ("img/x.png", b"png")]).await;

        assert_eq!(store.copy_prefix(&old, &new).await.unwrap(), 2);
        assert_eq!(store.list(&old).await.unwrap(), store.list(&new).await.unwrap());
        assert_eq!(
            store.get(&new, &path("img/x.png")).await.unwrap(),
            Some(b"png".to_vec())
        );
    }
}

#[tokio::test]
async fn fs_backend_prunes_directories_and_hides_staging() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("sites");
    let store = FsSiteStore::new(&root);
    store.probe().await.unwrap();
    seed(&store, &ns("demo"), &[("deep/er/file.txt", b"x")]).await;

    assert!(root.join("demo/deep/er/file.txt").is_file());
    assert!(store.delete(&ns("demo"), &path("deep/er/file.txt")).await.unwrap());
    assert!(!root.join("demo").exists());
    assert!(root.join(STAGING_DIR).is_dir());
    assert_eq!(std::fs::read_dir(root.join(STAGING_DIR)).unwrap().count(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn fs_backend_reports_unreadable_directories() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("sites");
    let store = FsSiteStore::new(&root);
    seed(&store, &ns("demo"), &[("ok.txt", b"1"), ("locked/secret.txt", b"2")]).await;

    let locked = root.join("demo/locked");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
    let outcome = store.list(&ns("demo")).await;
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    // Running as root bypasses permission bits, in which case the listing is complete.
    match outcome {
        Ok(paths) => assert_eq!(paths.len(), 2),
        Err(err) => match err.kind() {
            StoreErrKind::PartialFailure { completed, failed } => {
                assert_eq!(*completed, 1);
                assert_eq!(failed.len(), 1);
            }
            other => panic!("unexpected error {other:?}"),
        },
    }
}

#[tokio::test]
async fn builder_selects_backend() {
    let memory = SiteStoreBuilder::new(StorePolicyView::memory()).build();
    assert_eq!(memory.backend(), "memory");

    let dir = tempfile::tempdir().unwrap();
    let mut policy = StorePolicyView::default();
    policy.backend = StoreBackend::Fs;
    policy.io.root = dir.path().to_path_buf();
    policy.op_timeout_ms = 0;
    let fs = SiteStoreBuilder::new(policy).build();
    assert_eq!(fs.backend(), "fs");
    fs.put(&ns("x"), &path("a.txt"), vec![1]).await.unwrap();
    assert!(dir.path().join("x/a.txt").is_file());
}
