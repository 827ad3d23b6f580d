use std::env;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use super::context::CliContext;
use crate::server::{build_router, AuthPolicy, NamespaceLocks, ServeState};
use crate::Config;

const LOCK_IDLE_TTL: Duration = Duration::from_secs(600);
const LOCK_GC_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Port to listen on (defaults to server.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind (defaults to server.bind)
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Base domain tenants are served under (overrides routing.base_domain)
    #[arg(long)]
    pub base_domain: Option<String>,

    /// API token accepted by the upload endpoints (repeat for multiple tokens)
    #[arg(long = "auth-token", value_name = "TOKEN")]
    pub auth_token: Vec<String>,

    /// Serve the upload API without a token guard (local testing only)
    #[arg(long = "disable-auth")]
    pub disable_auth: bool,
}

pub async fn cmd_serve(args: ServeArgs, ctx: &CliContext) -> Result<()> {
    let mut config = ctx.config().clone();
    if let Some(domain) = args.base_domain.as_deref() {
        config.routing.policy.base_domain = domain.trim().to_string();
    }

    let state = ServeState::from_config(&config);
    spawn_lock_cleanup(Arc::clone(state.locks()));
    let auth_policy = build_serve_auth_policy(&args, &config);
    if let Some(policy) = auth_policy.as_ref() {
        info!(tokens = policy.allowed_tokens.len(), "Upload API token guard enabled");
    } else {
        warn!("Upload API is unauthenticated; do not expose this port publicly");
    }

    state.mark_live();
    match state.store().probe().await {
        Ok(()) => {
            state.mark_ready();
            info!(store = state.store().backend(), "Store readiness probe passed");
        }
        Err(err) => {
            state.mark_unready(err.to_string());
            error!(%err, "Store readiness probe failed");
        }
    }

    let router = build_router(state, auth_policy);
    let addr = SocketAddr::new(
        args.bind.unwrap_or(config.server.bind),
        args.port.unwrap_or(config.server.port),
    );
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind front door on {}", addr))?;
    info!(
        %addr,
        base_domain = %config.routing.policy.base_domain,
        store = ?config.store.backend,
        "Sitehost front door listening"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("front door exited unexpectedly")?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!(?err, "failed to listen for shutdown signal"),
    }
}

fn spawn_lock_cleanup(locks: Arc<NamespaceLocks>) {
    debug!(
        ttl_secs = LOCK_IDLE_TTL.as_secs(),
        interval_secs = LOCK_GC_INTERVAL.as_secs(),
        "Namespace lock GC enabled"
    );
    tokio::spawn(async move {
        let mut ticker = interval(LOCK_GC_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = locks.prune_idle(LOCK_IDLE_TTL);
            if removed > 0 {
                debug!(removed, "Pruned idle namespace locks");
            }
        }
    });
}

/// Tokens come from `--auth-token`, `server.api_tokens` (already patched by
/// `SITEHOST_API_TOKENS`) and `SITEHOST_API_TOKEN`.
fn build_serve_auth_policy(args: &ServeArgs, config: &Config) -> Option<Arc<AuthPolicy>> {
    if args.disable_auth {
        warn!("Upload API auth disabled via --disable-auth");
        return None;
    }

    let mut tokens: Vec<String> = args.auth_token.clone();
    tokens.extend(config.server.api_tokens.iter().cloned());
    if let Ok(value) = env::var("SITEHOST_API_TOKEN") {
        tokens.push(value);
    }
    let policy = AuthPolicy::from_tokens(tokens);
    if policy.is_empty() {
        return None;
    }
    Some(Arc::new(policy))
}
