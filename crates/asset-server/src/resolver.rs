use percent_encoding::percent_decode_str;
use sitehost_core_types::Namespace;
use url::form_urlencoded;

use crate::policy::RoutingPolicy;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedVia {
    Host,
    PathPrefix,
    Query,
}

/// A request mapped onto a tenant. `relative_path` is decoded but not yet validated;
/// the asset server decides whether it is safe.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolved {
    pub namespace: Namespace,
    pub relative_path: String,
    pub via: ResolvedVia,
}

enum HostMatch<'a> {
    Tenant(&'a str),
    Reserved,
    Foreign,
}

/// Maps `(host, path, query)` to a tenant. Pure and side-effect free.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    policy: RoutingPolicy,
}

impl Resolver {
    pub fn new(policy: RoutingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Host-based resolution first. Hosts outside every configured suffix (bare
    /// `localhost`, raw IPs, a missing header) fall back to `/<prefix>/<name>/...` and
    /// then to the `?<param>=<name>` query.
    pub fn resolve(&self, host: Option<&str>, path: &str, query: Option<&str>) -> Option<Resolved> {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let relative = decoded.trim_start_matches('/');
        match host.map(|raw| self.match_host(strip_port(raw))) {
            Some(HostMatch::Tenant(label)) => Some(Resolved {
                namespace: Namespace::parse(label).ok()?,
                relative_path: relative.to_string(),
                via: ResolvedVia::Host,
            }),
            Some(HostMatch::Reserved) => None,
            Some(HostMatch::Foreign) | None => self.resolve_fallback(relative, query),
        }
    }

    #[cfg(test)]
    fn tenant_from_host(&self, host: &str) -> Option<Namespace> {
        match self.match_host(strip_port(host)) {
            HostMatch::Tenant(label) => Namespace::parse(label).ok(),
            _ => None,
        }
    }

    fn match_host<'a>(&self, host: &'a str) -> HostMatch<'a> {
        let host = host.trim_end_matches('.');
        for suffix in &self.policy.dev_suffixes {
            match strip_domain_suffix(host, suffix) {
                Some("") => return HostMatch::Foreign,
                Some(labels) => return self.classify_labels(labels),
                None => {}
            }
        }
        match strip_domain_suffix(host, &self.policy.base_domain) {
            Some("") => HostMatch::Reserved,
            Some(labels) => self.classify_labels(labels),
            None => HostMatch::Foreign,
        }
    }

    fn classify_labels<'a>(&self, labels: &'a str) -> HostMatch<'a> {
        let leftmost = labels.split('.').next().unwrap_or(labels);
        if leftmost.is_empty() || self.policy.is_reserved(leftmost) {
            HostMatch::Reserved
        } else {
            HostMatch::Tenant(leftmost)
        }
    }

    fn resolve_fallback(&self, relative: &str, query: Option<&str>) -> Option<Resolved> {
        let prefix = self.policy.path_prefix.trim_matches('/');
        if !prefix.is_empty() {
            let rest = relative
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('/'));
            if let Some(rest) = rest {
                let (name, inner) = rest.split_once('/').unwrap_or((rest, ""));
                if let Some(namespace) = self.tenant_name(name) {
                    return Some(Resolved {
                        namespace,
                        relative_path: inner.trim_start_matches('/').to_string(),
                        via: ResolvedVia::PathPrefix,
                    });
                }
            }
        }

        let query = query?;
        let (_, name) = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| *key == self.policy.query_param.as_str())?;
        Some(Resolved {
            namespace: self.tenant_name(&name)?,
            relative_path: relative.to_string(),
            via: ResolvedVia::Query,
        })
    }

    fn tenant_name(&self, raw: &str) -> Option<Namespace> {
        if self.policy.is_reserved(raw) {
            return None;
        }
        Namespace::parse(raw).ok()
    }
}

/// Drops a `:port` suffix, keeping bracketed IPv6 literals intact.
fn strip_port(host: &str) -> &str {
    let host = host.trim();
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port))
            if !name.contains(':') && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            name
        }
        _ => host,
    }
}

/// Labels left of `suffix` (`""` for the bare suffix), compared case-insensitively.
fn strip_domain_suffix<'a>(host: &'a str, suffix: &str) -> Option<&'a str> {
    let suffix = suffix.trim_matches('.');
    if suffix.is_empty() {
        return None;
    }
    if host.eq_ignore_ascii_case(suffix) {
        return Some("");
    }
    let split = host.len().checked_sub(suffix.len() + 1)?;
    let tail = host.get(split + 1..)?;
    if host.as_bytes()[split] == b'.' && tail.eq_ignore_ascii_case(suffix) {
        host.get(..split)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(base: &str) -> Resolver {
        Resolver::new(RoutingPolicy::default().with_base_domain(base))
    }

    fn pair(resolved: Option<Resolved>) -> Option<(String, String)> {
        resolved.map(|r| (r.namespace.to_string(), r.relative_path))
    }

    #[test]
    fn subdomain_of_base_domain() {
        let r = resolver("example.com");
        assert_eq!(
            pair(r.resolve(Some("abc.example.com"), "/x/y", None)),
            Some(("abc".into(), "x/y".into()))
        );
        assert_eq!(
            pair(r.resolve(Some("abc.EXAMPLE.com:8443"), "/", None)),
            Some(("abc".into(), "".into()))
        );
        assert_eq!(
            pair(r.resolve(Some("a.b.example.com."), "/", None)),
            Some(("a".into(), "".into()))
        );
    }

    #[test]
    fn reserved_hosts_are_unresolved() {
        let r = resolver("example.com");
        assert!(r.resolve(Some("www.example.com"), "/", None).is_none());
        assert!(r.resolve(Some("WWW.example.com"), "/", None).is_none());
        assert!(r
            .resolve(Some("example.com"), "/site/demo/", Some("name=demo"))
            .is_none());
    }

    #[test]
    fn localhost_uses_query_and_path_fallback() {
        let r = resolver("example.com");
        assert_eq!(
            pair(r.resolve(Some("localhost:3000"), "/", Some("name=abc"))),
            Some(("abc".into(), "".into()))
        );
        let via_path = r
            .resolve(Some("localhost:3000"), "/site/demo/css/a.css", Some("name=other"))
            .unwrap();
        assert_eq!(via_path.via, ResolvedVia::PathPrefix);
        assert_eq!(via_path.namespace.as_str(), "demo");
        assert_eq!(via_path.relative_path, "css/a.css");
        assert_eq!(
            pair(r.resolve(Some("127.0.0.1"), "/site/demo", None)),
            Some(("demo".into(), "".into()))
        );
        assert!(r.resolve(Some("localhost"), "/about", None).is_none());
        assert!(r.resolve(None, "/", Some("name=bad.name")).is_none());
    }

    #[test]
    fn dev_suffix_subdomains_resolve() {
        let r = resolver("example.com");
        let resolved = r.resolve(Some("demo.localhost:8080"), "/a%20b.html", None).unwrap();
        assert_eq!(resolved.via, ResolvedVia::Host);
        assert_eq!(resolved.relative_path, "a b.html");
        assert_eq!(r.tenant_from_host("demo.localhost").unwrap().as_str(), "demo");
        assert!(r.tenant_from_host("localhost").is_none());
    }

    #[test]
    fn unrelated_hosts_and_odd_inputs() {
        let r = resolver("example.com");
        assert!(r.tenant_from_host("abc.example.org").is_none());
        assert!(r.tenant_from_host("notexample.com").is_none());
        assert!(r.tenant_from_host("[::1]:3000").is_none());
        assert!(r.tenant_from_host("bad_host!.example.com").is_none());
        assert!(r.tenant_from_host("ñ.example.com").is_none());
        assert_eq!(strip_port("[::1]:3000"), "[::1]");
        assert_eq!(strip_port("host:80"), "host");
        assert_eq!(strip_port("::1"), "::1");
    }
}
