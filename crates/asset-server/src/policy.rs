use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingPolicy {
    /// Tenants live at `<namespace>.<base_domain>`.
    pub base_domain: String,
    /// Left-most labels that never name a tenant.
    pub reserved_labels: Vec<String>,
    /// Extra suffixes treated like the base domain for subdomains, while their bare form
    /// switches to path/query resolution. Used for local development.
    pub dev_suffixes: Vec<String>,
    /// First path segment introducing `/<prefix>/<namespace>/...` in fallback mode.
    pub path_prefix: String,
    /// Query parameter naming the namespace in fallback mode.
    pub query_param: String,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            base_domain: "localhost".into(),
            reserved_labels: vec!["www".into()],
            dev_suffixes: vec!["localhost".into()],
            path_prefix: "site".into(),
            query_param: "name".into(),
        }
    }
}

impl RoutingPolicy {
    pub fn with_base_domain(mut self, base_domain: impl Into<String>) -> Self {
        self.base_domain = base_domain.into();
        self
    }

    pub fn is_reserved(&self, label: &str) -> bool {
        self.reserved_labels
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(label))
    }
}
