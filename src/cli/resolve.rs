use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sitehost_asset_server::{ResolvedVia, Resolver};

use super::context::CliContext;
use super::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct ResolveArgs {
    /// Value of the Host header, port included if any
    pub host: String,

    /// Request path
    #[arg(default_value = "/")]
    pub path: String,

    /// Raw query string, e.g. `name=demo`
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResolveReport {
    pub host: String,
    pub path: String,
    pub namespace: Option<String>,
    pub relative_path: Option<String>,
    pub via: Option<&'static str>,
}

pub fn cmd_resolve(args: ResolveArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let resolver = Resolver::new(ctx.config().routing_policy());
    let report = resolve_report(&resolver, &args);
    emit(output, &report, || match (&report.namespace, &report.relative_path) {
        (Some(namespace), Some(relative)) => format!(
            "{} {} -> namespace={} path=/{} via={}",
            report.host,
            report.path,
            namespace,
            relative,
            report.via.unwrap_or("-")
        ),
        _ => format!("{} {} -> unresolved (404)", report.host, report.path),
    })
}

fn resolve_report(resolver: &Resolver, args: &ResolveArgs) -> ResolveReport {
    let resolved = resolver.resolve(Some(&args.host), &args.path, args.query.as_deref());
    ResolveReport {
        host: args.host.clone(),
        path: args.path.clone(),
        namespace: resolved.as_ref().map(|r| r.namespace.to_string()),
        relative_path: resolved.as_ref().map(|r| r.relative_path.clone()),
        via: resolved.map(|r| match r.via {
            ResolvedVia::Host => "host",
            ResolvedVia::PathPrefix => "path_prefix",
            ResolvedVia::Query => "query",
        }),
    }
}

#[cfg(test)]
mod tests {
    use sitehost_asset_server::RoutingPolicy;

    use super::*;

    fn args(host: &str, path: &str, query: Option<&str>) -> ResolveArgs {
        ResolveArgs {
            host: host.into(),
            path: path.into(),
            query: query.map(str::to_string),
        }
    }

    #[test]
    fn reports_each_resolution_route() {
        let resolver = Resolver::new(RoutingPolicy::default().with_base_domain("example.com"));

        let report = resolve_report(&resolver, &args("demo.example.com", "/css/a.css", None));
        assert_eq!(report.namespace.as_deref(), Some("demo"));
        assert_eq!(report.relative_path.as_deref(), Some("css/a.css"));
        assert_eq!(report.via, Some("host"));

        let report = resolve_report(&resolver, &args("localhost:8787", "/site/demo/", None));
        assert_eq!(report.namespace.as_deref(), Some("demo"));
        assert_eq!(report.via, Some("path_prefix"));

        let report = resolve_report(&resolver, &args("127.0.0.1", "/", Some("name=demo")));
        assert_eq!(report.via, Some("query"));

        let report = resolve_report(&resolver, &args("www.example.com", "/", None));
        assert!(report.namespace.is_none());
        assert!(report.via.is_none());
    }
}
