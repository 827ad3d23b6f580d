use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::metrics;

mod assets;
mod sites;

pub(crate) use assets::{serve_fallback, tenant_host_middleware};
pub(crate) use sites::router as site_routes;

use super::auth::{api_auth_middleware, AuthPolicy};
use super::state::ServeState;

/// Full front door: health and metrics, the upload API (token-guarded when `auth` is
/// set) and tenant serving for everything else.
pub fn build_router(state: ServeState, auth: Option<Arc<AuthPolicy>>) -> Router {
    let mut api = site_routes().layer(DefaultBodyLimit::max(state.max_upload_bytes));
    if let Some(policy) = auth {
        api = api.route_layer(middleware::from_fn_with_state(policy, api_auth_middleware));
    }

    shell_router()
        .merge(api)
        .fallback(serve_fallback)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_host_middleware,
        ))
        .layer(cors_layer())
        .with_state(state)
}

pub(crate) fn shell_router() -> Router<ServeState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/livez", get(live_handler))
        .route("/readyz", get(ready_handler))
        .route("/metrics", get(metrics_proxy_handler))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

async fn health_handler(State(state): State<ServeState>) -> impl IntoResponse {
    let snapshot = state.health_snapshot();
    Json(json!({
        "status": "ok",
        "store": state.store().backend(),
        "ready": snapshot.ready,
        "live": snapshot.live,
        "last_ready_check_ts": snapshot.last_ready_check,
        "last_error": snapshot.last_error,
    }))
}

async fn live_handler(State(state): State<ServeState>) -> impl IntoResponse {
    let snapshot = state.health_snapshot();
    let status = if snapshot.live {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "live": snapshot.live,
            "ready": snapshot.ready,
        })),
    )
}

async fn ready_handler(State(state): State<ServeState>) -> impl IntoResponse {
    let snapshot = state.health_snapshot();
    let status = if snapshot.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "ready": snapshot.ready,
            "last_ready_check_ts": snapshot.last_ready_check,
            "last_error": snapshot.last_error,
        })),
    )
}

async fn metrics_proxy_handler() -> impl IntoResponse {
    metrics::register_metrics();
    metrics::render(metrics::global_registry())
}
