use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use sitehost_core_types::{IngestMode, SitePath};
use sitehost_ingest::Upload;
use sitehost_site_store::StoreBackend;
use tracing::warn;

use super::context::CliContext;
use super::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct DeployArgs {
    /// Target namespace
    pub namespace: String,

    /// Page, single file or ZIP archive to ingest
    pub file: PathBuf,

    /// Replace whatever the namespace currently holds
    #[arg(long)]
    pub replace: bool,

    /// File name to ingest under instead of the local one (drives format detection)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct RenameArgs {
    pub old: String,
    pub new: String,
}

#[derive(Args, Clone, Debug)]
pub struct DeleteArgs {
    pub namespace: String,
}

#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    pub namespace: String,
}

#[derive(Serialize)]
struct DeleteReport<'a> {
    namespace: &'a str,
    deleted: usize,
}

#[derive(Serialize)]
struct ListReport<'a> {
    namespace: &'a str,
    files: &'a [SitePath],
}

pub async fn cmd_deploy(args: DeployArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    warn_if_ephemeral(ctx);
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let filename = match args.name {
        Some(name) => name,
        None => args
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let mode = if args.replace {
        IngestMode::Replace
    } else {
        IngestMode::Create
    };

    let summary = ctx
        .ingest()
        .ingest(&args.namespace, Upload::new(filename, bytes), mode)
        .await
        .with_context(|| format!("deploy to '{}' failed", args.namespace))?;
    emit(output, &summary, || {
        format!(
            "Deployed {} file(s) to {}\n{}",
            summary.file_count, summary.url, summary
        )
    })
}

pub async fn cmd_rename(args: RenameArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    warn_if_ephemeral(ctx);
    let summary = ctx
        .ingest()
        .rename(&args.old, &args.new)
        .await
        .with_context(|| format!("rename '{}' -> '{}' failed", args.old, args.new))?;
    emit(output, &summary, || {
        format!("Renamed {} to {}\n{}", args.old, summary.namespace, summary)
    })
}

pub async fn cmd_delete(args: DeleteArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    warn_if_ephemeral(ctx);
    let deleted = ctx
        .ingest()
        .delete(&args.namespace)
        .await
        .with_context(|| format!("delete of '{}' failed", args.namespace))?;
    let report = DeleteReport {
        namespace: &args.namespace,
        deleted,
    };
    emit(output, &report, || {
        format!("Deleted {} object(s) from {}", deleted, args.namespace)
    })
}

pub async fn cmd_list(args: ListArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let files = ctx
        .ingest()
        .list(&args.namespace)
        .await
        .with_context(|| format!("listing '{}' failed", args.namespace))?;
    let report = ListReport {
        namespace: &args.namespace,
        files: &files,
    };
    emit(output, &report, || {
        if files.is_empty() {
            return format!("{} is empty", args.namespace);
        }
        files
            .iter()
            .map(|path| path.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn warn_if_ephemeral(ctx: &CliContext) {
    if ctx.config().store.backend == StoreBackend::Memory {
        warn!("store backend is 'memory'; changes vanish when this command exits");
    }
}
