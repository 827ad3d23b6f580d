use serde::{Deserialize, Serialize};
use sitehost_archive::ArchiveLimits;
use sitehost_core_types::Namespace;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestPolicy {
    /// Labels that can never become tenant namespaces. Compared case-insensitively,
    /// since they double as host labels.
    pub reserved_namespaces: Vec<String>,
    pub base_domain: String,
    pub url_scheme: String,
    pub archive: ArchiveLimits,
}

impl Default for IngestPolicy {
    fn default() -> Self {
        Self {
            reserved_namespaces: vec!["www".into()],
            base_domain: "localhost".into(),
            url_scheme: "http".into(),
            archive: ArchiveLimits::default(),
        }
    }
}

impl IngestPolicy {
    pub fn is_reserved(&self, label: &str) -> bool {
        self.reserved_namespaces
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(label))
    }

    pub fn site_url(&self, namespace: &Namespace) -> String {
        format!("{}://{}.{}", self.url_scheme, namespace, self.base_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_labels_ignore_case() {
        let policy = IngestPolicy::default();
        assert!(policy.is_reserved("WWW"));
        assert!(!policy.is_reserved("blog"));
    }

    #[test]
    fn url_uses_scheme_and_base_domain() {
        let policy = IngestPolicy {
            base_domain: "example.com".into(),
            url_scheme: "https".into(),
            ..IngestPolicy::default()
        };
        let ns = Namespace::parse("Demo").unwrap();
        assert_eq!(policy.site_url(&ns), "https://Demo.example.com");
    }
}
