use anyhow::Result;
use serde::Serialize;

use super::context::CliContext;
use super::output::{emit, OutputFormat};

#[derive(Serialize)]
struct InfoReport {
    version: &'static str,
    build_date: &'static str,
    git_hash: &'static str,
    git_branch: &'static str,
    config_path: String,
    base_domain: String,
    url_scheme: String,
    reserved_namespaces: Vec<String>,
    store_backend: String,
    store_root: String,
    store_timeout_ms: u64,
    bind: String,
    max_upload_bytes: usize,
    api_tokens: usize,
}

pub fn cmd_info(ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let config = ctx.config();
    let ingest = config.ingest_policy();
    let report = InfoReport {
        version: env!("CARGO_PKG_VERSION"),
        build_date: env!("BUILD_DATE"),
        git_hash: env!("GIT_HASH"),
        git_branch: env!("GIT_BRANCH"),
        config_path: ctx.config_path().display().to_string(),
        base_domain: ingest.base_domain.clone(),
        url_scheme: ingest.url_scheme.clone(),
        reserved_namespaces: ingest.reserved_namespaces.clone(),
        store_backend: format!("{:?}", config.store.backend).to_lowercase(),
        store_root: config.store.io.root.display().to_string(),
        store_timeout_ms: config.store.op_timeout_ms,
        bind: format!("{}:{}", config.server.bind, config.server.port),
        max_upload_bytes: config.server.max_upload_bytes,
        api_tokens: config.server.api_tokens.len(),
    };

    emit(output, &report, || {
        let mut lines = vec![
            "Sitehost System Information".to_string(),
            "===========================".to_string(),
            format!("Version: {}", report.version),
            format!("Build Date: {}", report.build_date),
            format!("Git Commit: {} ({})", report.git_hash, report.git_branch),
            String::new(),
            "Configuration:".to_string(),
            format!("- Config File: {}", report.config_path),
            format!("- Base Domain: {}", report.base_domain),
            format!("- URL Scheme: {}", report.url_scheme),
            format!(
                "- Reserved Namespaces: {}",
                report.reserved_namespaces.join(", ")
            ),
            format!(
                "- Store: {} at {} (timeout {}ms)",
                report.store_backend, report.store_root, report.store_timeout_ms
            ),
            format!("- Listen: {}", report.bind),
            format!("- Max Upload: {} bytes", report.max_upload_bytes),
        ];
        lines.push(if report.api_tokens == 0 {
            "- API Tokens: none (upload API unauthenticated)".to_string()
        } else {
            format!("- API Tokens: {}", report.api_tokens)
        });
        if ctx.metrics_port() > 0 {
            lines.push(format!("- Metrics Port: {}", ctx.metrics_port()));
        }
        lines.join("\n")
    })
}
