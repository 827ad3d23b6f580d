use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use url::form_urlencoded;

use crate::errors::ApiError;

pub const TOKEN_HEADER: &str = "x-sitehost-token";

/// Shared-secret guard for the upload API.
#[derive(Clone, Debug, Default)]
pub struct AuthPolicy {
    pub allowed_tokens: Vec<String>,
}

impl AuthPolicy {
    pub fn from_tokens(tokens: impl IntoIterator<Item = String>) -> Self {
        let mut allowed_tokens: Vec<String> = tokens
            .into_iter()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .collect();
        allowed_tokens.sort();
        allowed_tokens.dedup();
        Self { allowed_tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed_tokens.is_empty()
    }

    pub fn allows(&self, token: &str) -> bool {
        self.allowed_tokens.iter().any(|allowed| allowed == token)
    }
}

pub async fn api_auth_middleware(
    State(policy): State<Arc<AuthPolicy>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    match extract_token(&req) {
        Some(token) if policy.allows(&token) => Ok(next.run(req).await),
        _ => Err(ApiError::unauthorized()),
    }
}

fn extract_token(req: &Request<Body>) -> Option<String> {
    let headers = req.headers();
    if let Some(value) = headers.get(TOKEN_HEADER) {
        if let Ok(raw) = value.to_str() {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    if let Some(value) = headers.get(AUTHORIZATION) {
        if let Ok(raw) = value.to_str() {
            if let Some(token) = raw.strip_prefix("Bearer ") {
                let trimmed = token.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }

    if let Some(query) = req.uri().query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == "token" {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(builder: axum::http::request::Builder) -> Request<Body> {
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn token_sources_in_priority_order() {
        let req = request(
            Request::builder()
                .uri("/api/sites?token=query")
                .header(TOKEN_HEADER, "header")
                .header(AUTHORIZATION, "Bearer bearer"),
        );
        assert_eq!(extract_token(&req).as_deref(), Some("header"));

        let req = request(
            Request::builder()
                .uri("/api/sites?token=query")
                .header(AUTHORIZATION, "Bearer bearer"),
        );
        assert_eq!(extract_token(&req).as_deref(), Some("bearer"));

        let req = request(Request::builder().uri("/api/sites?token=query"));
        assert_eq!(extract_token(&req).as_deref(), Some("query"));

        let req = request(Request::builder().uri("/api/sites").header(AUTHORIZATION, "Basic abc"));
        assert!(extract_token(&req).is_none());
    }

    #[test]
    fn policy_drops_blank_and_duplicate_tokens() {
        let policy = AuthPolicy::from_tokens(vec![" a ".into(), "".into(), "a".into(), "b".into()]);
        assert_eq!(policy.allowed_tokens, vec!["a", "b"]);
        assert!(policy.allows("a"));
        assert!(!policy.allows(""));
    }
}
