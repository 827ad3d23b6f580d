use std::sync::Arc;

use sitehost_core_types::{
    content_type_for, root_document, Namespace, SitePath, SitePathError, DEFAULT_DOCUMENT,
};
use sitehost_site_store::SiteStore;
use tracing::{debug, instrument};

use crate::errors::{ServeError, ServeResult};
use crate::metrics;

/// A stored object ready to be written to the wire.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Asset {
    pub status: u16,
    pub path: SitePath,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Asset {
    fn found(path: SitePath, bytes: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: content_type_for(&path),
            path,
            bytes,
        }
    }
}

/// Read path of the engine: looks up objects and applies the default-document and
/// markup fallbacks.
#[derive(Clone)]
pub struct AssetServer {
    store: Arc<dyn SiteStore>,
}

impl AssetServer {
    pub fn new(store: Arc<dyn SiteStore>) -> Self {
        Self { store }
    }

    #[instrument(name = "sitehost.serve", skip(self), fields(namespace = %namespace))]
    pub async fn serve(&self, namespace: &Namespace, relative_path: &str) -> ServeResult<Asset> {
        let result = self.lookup(namespace, relative_path).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) => err.code(),
        };
        metrics::record(outcome);
        result
    }

    async fn lookup(&self, namespace: &Namespace, relative_path: &str) -> ServeResult<Asset> {
        let requested = relative_path.trim_start_matches('/');
        if requested
            .split(|ch| ch == '/' || ch == '\\')
            .any(|segment| segment == "..")
        {
            return Err(ServeError::forbidden(requested));
        }

        let directory = requested.is_empty() || requested.ends_with('/');
        let candidate = if directory {
            format!("{requested}{DEFAULT_DOCUMENT}")
        } else {
            requested.to_string()
        };
        let path = match SitePath::parse(&candidate) {
            Ok(path) => path,
            Err(SitePathError::Empty) => SitePath::default_document(),
            Err(SitePathError::Absolute | SitePathError::ParentSegment | SitePathError::Escapes) => {
                return Err(ServeError::forbidden(requested))
            }
            Err(SitePathError::InvalidSegment(_)) => return Err(ServeError::not_found(requested)),
        };

        if let Some(bytes) = self.store.get(namespace, &path).await? {
            return Ok(Asset::found(path, bytes));
        }

        if path.as_str() == DEFAULT_DOCUMENT {
            return self.markup_fallback(namespace, requested).await;
        }

        if !directory {
            if let Ok(index) = path.join(DEFAULT_DOCUMENT) {
                if let Some(bytes) = self.store.get(namespace, &index).await? {
                    debug!(namespace = %namespace, path = %index, "serving directory index");
                    return Ok(Asset::found(index, bytes));
                }
            }
        }
        Err(ServeError::not_found(requested))
    }

    /// Single pass over the listing for sites whose root document was not uploaded as
    /// `index.html`.
    async fn markup_fallback(&self, namespace: &Namespace, requested: &str) -> ServeResult<Asset> {
        let paths = self.store.list(namespace).await?;
        let Some(document) = root_document(&paths) else {
            return Err(ServeError::not_found(requested));
        };
        if document.as_str() == DEFAULT_DOCUMENT {
            // Listed but vanished between the lookup and the listing.
            return Err(ServeError::not_found(requested));
        }
        match self.store.get(namespace, document).await? {
            Some(bytes) => {
                debug!(namespace = %namespace, path = %document, "serving markup fallback");
                Ok(Asset::found(document.clone(), bytes))
            }
            None => Err(ServeError::not_found(requested)),
        }
    }
}
