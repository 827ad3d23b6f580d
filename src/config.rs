use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sitehost_archive::ArchiveLimits;
use sitehost_asset_server::RoutingPolicy;
use sitehost_ingest::IngestPolicy;
use sitehost_site_store::StorePolicyView;
use tracing::{info, warn};

/// Process configuration, loaded from YAML and patched from `SITEHOST_*` variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub routing: RoutingConfig,
    pub store: StorePolicyView,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Upper bound on an upload request body, in bytes.
    pub max_upload_bytes: usize,
    pub api_tokens: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8787,
            max_upload_bytes: 64 * 1024 * 1024,
            api_tokens: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    #[serde(flatten)]
    pub policy: RoutingPolicy,
    pub url_scheme: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            policy: RoutingPolicy::default(),
            url_scheme: "http".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Namespaces refused on top of the routing layer's reserved labels.
    pub reserved_namespaces: Vec<String>,
    pub archive: ArchiveLimits,
}

impl Config {
    pub fn routing_policy(&self) -> RoutingPolicy {
        self.routing.policy.clone()
    }

    /// Ingestion refuses every label the resolver would never route to a tenant.
    pub fn ingest_policy(&self) -> IngestPolicy {
        let mut reserved = self.routing.policy.reserved_labels.clone();
        for extra in &self.ingest.reserved_namespaces {
            if !reserved.iter().any(|label| label.eq_ignore_ascii_case(extra)) {
                reserved.push(extra.clone());
            }
        }
        IngestPolicy {
            reserved_namespaces: reserved,
            base_domain: self.routing.policy.base_domain.clone(),
            url_scheme: self.routing.url_scheme.clone(),
            archive: self.ingest.archive.clone(),
        }
    }

    pub fn store_policy(&self) -> StorePolicyView {
        self.store.clone()
    }

    /// Applies `SITEHOST_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub(crate) fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(domain) = non_empty(lookup("SITEHOST_BASE_DOMAIN")) {
            info!(base_domain = %domain, "base domain overridden from environment");
            self.routing.policy.base_domain = domain;
        }
        if let Some(root) = non_empty(lookup("SITEHOST_STORE_ROOT")) {
            self.store.io.root = PathBuf::from(root);
        }
        if let Some(raw) = non_empty(lookup("SITEHOST_STORE_BACKEND")) {
            match raw.parse() {
                Ok(backend) => self.store.backend = backend,
                Err(err) => warn!(%err, "ignoring SITEHOST_STORE_BACKEND"),
            }
        }
        if let Some(raw) = non_empty(lookup("SITEHOST_API_TOKENS")) {
            self.server.api_tokens = raw
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(raw) = non_empty(lookup("SITEHOST_PORT")) {
            match raw.parse() {
                Ok(port) => self.server.port = port,
                Err(err) => warn!(value = %raw, %err, "ignoring SITEHOST_PORT"),
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use sitehost_site_store::StoreBackend;

    use super::*;

    #[test]
    fn yaml_sections_fill_missing_fields_with_defaults() {
        let yaml = r#"
routing:
  base_domain: example.com
  url_scheme: https
store:
  backend: memory
ingest:
  reserved_namespaces: [api, admin]
  archive:
    max_entries: 50
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.routing.policy.base_domain, "example.com");
        assert_eq!(config.routing.policy.path_prefix, "site");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.ingest.archive.max_entries, 50);
        assert!(config.ingest.archive.skip_os_metadata);

        let ingest = config.ingest_policy();
        assert_eq!(ingest.site_url(&"demo".parse().unwrap()), "https://demo.example.com");
        assert!(ingest.is_reserved("WWW"));
        assert!(ingest.is_reserved("admin"));
    }

    #[test]
    fn env_overrides_patch_the_loaded_values() {
        let vars: HashMap<&str, &str> = [
            ("SITEHOST_BASE_DOMAIN", "sites.test"),
            ("SITEHOST_STORE_BACKEND", "memory"),
            ("SITEHOST_API_TOKENS", " alpha, ,beta "),
            ("SITEHOST_PORT", "not-a-port"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.routing.policy.base_domain, "sites.test");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.server.api_tokens, vec!["alpha", "beta"]);
        assert_eq!(config.server.port, 8787);
    }
}
