use axum::{
    body::Body,
    extract::State,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE, HOST, X_CONTENT_TYPE_OPTIONS},
        HeaderMap, HeaderValue, Method, Request, StatusCode, Uri,
    },
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use sitehost_asset_server::{Resolved, ResolvedVia, ServeErrKind};
use tracing::{debug, error};

use crate::server::state::ServeState;

const NOT_FOUND_PAGE: &str = "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>404 Not Found</title></head>\
<body><h1>404 Not Found</h1><p>No site content matches this address.</p></body></html>\n";
const FORBIDDEN_PAGE: &str = "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>403 Forbidden</title></head>\
<body><h1>403 Forbidden</h1><p>The requested path is not allowed.</p></body></html>\n";
const UNAVAILABLE_PAGE: &str = "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>500 Internal Server Error</title></head>\
<body><h1>500 Internal Server Error</h1><p>Site storage is unavailable.</p></body></html>\n";

/// Sends GET/HEAD requests addressed to a tenant subdomain straight to the asset server,
/// ahead of every API route.
pub(crate) async fn tenant_host_middleware(
    State(state): State<ServeState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !is_read(req.method()) {
        return next.run(req).await;
    }
    let resolved = request_host(req.headers(), req.uri())
        .and_then(|host| {
            state
                .resolver
                .resolve(Some(host), req.uri().path(), req.uri().query())
        })
        .filter(|resolved| resolved.via == ResolvedVia::Host);
    match resolved {
        Some(resolved) => serve_resolved(&state, resolved, req.method() == Method::HEAD).await,
        None => next.run(req).await,
    }
}

/// Fallback for requests no route claimed: path-prefix and query resolution.
pub(crate) async fn serve_fallback(
    State(state): State<ServeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if !is_read(&method) {
        return not_found_page();
    }
    let host = request_host(&headers, &uri);
    match state.resolver.resolve(host, uri.path(), uri.query()) {
        Some(resolved) => serve_resolved(&state, resolved, method == Method::HEAD).await,
        None => {
            debug!(host = host.unwrap_or("-"), path = uri.path(), "request not resolved to a site");
            not_found_page()
        }
    }
}

async fn serve_resolved(state: &ServeState, resolved: Resolved, head: bool) -> Response {
    let Resolved {
        namespace,
        relative_path,
        via,
    } = resolved;
    match state.assets.serve(&namespace, &relative_path).await {
        Ok(asset) => {
            debug!(namespace = %namespace, path = %asset.path, ?via, "serving asset");
            let status = StatusCode::from_u16(asset.status).unwrap_or(StatusCode::OK);
            let length = HeaderValue::from(asset.bytes.len());
            let body = if head {
                Body::empty()
            } else {
                Body::from(asset.bytes)
            };
            (
                status,
                [
                    (CONTENT_TYPE, HeaderValue::from_static(asset.content_type)),
                    (CONTENT_LENGTH, length),
                    (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
                ],
                body,
            )
                .into_response()
        }
        Err(err) => match err.kind() {
            ServeErrKind::NotFound(_) => not_found_page(),
            ServeErrKind::Forbidden(path) => {
                debug!(namespace = %namespace, path = %path, "refused traversal");
                (StatusCode::FORBIDDEN, Html(FORBIDDEN_PAGE)).into_response()
            }
            ServeErrKind::Store(inner) => {
                error!(namespace = %namespace, %inner, "asset lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(UNAVAILABLE_PAGE)).into_response()
            }
        },
    }
}

fn not_found_page() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
}

fn is_read(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// `Host` header, or the URI authority for HTTP/2 requests.
fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
        .filter(|host| !host.is_empty())
}
