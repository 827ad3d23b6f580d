//! HTTP error envelope for the upload API.
//!
//! Every failure leaves the front door as
//! `{"success": false, "error": {"kind": <code>, "message": <text>}}`, plus the failed keys
//! for partial outcomes.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sitehost_archive::NormalizeErrKind;
use sitehost_ingest::{IngestErrKind, IngestError};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    status: StatusCode,
    kind: String,
    message: String,
    failed: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.into(),
            message: message.into(),
            failed: Vec::new(),
        }
    }

    pub fn bad_request(kind: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, kind, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid api token",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    fn with_failed(mut self, failed: &[String]) -> Self {
        self.failed = failed.to_vec();
        self
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        let status = match err.kind() {
            IngestErrKind::InvalidNamespace(_) => StatusCode::BAD_REQUEST,
            IngestErrKind::NamespaceTaken(_) => StatusCode::CONFLICT,
            IngestErrKind::UnknownNamespace(_) => StatusCode::NOT_FOUND,
            IngestErrKind::Normalize(inner) => match inner.kind() {
                NormalizeErrKind::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
                NormalizeErrKind::CorruptArchive(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            IngestErrKind::Store(_)
            | IngestErrKind::RenamePartial { .. }
            | IngestErrKind::RenameCleanupPartial { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.code(), err.to_string()).with_failed(err.failed_keys())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        let kind = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "payload_too_large"
        } else {
            "invalid_multipart"
        };
        ApiError::new(status, kind, err.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::new(err.status(), "invalid_body", err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(kind = %self.kind, failed = self.failed.len(), "{}", self.message);
        } else {
            debug!(status = %self.status, kind = %self.kind, "{}", self.message);
        }
        let mut body = json!({
            "success": false,
            "error": {
                "kind": self.kind,
                "message": self.message,
            },
        });
        if !self.failed.is_empty() {
            body["failed"] = json!(self.failed);
        }
        (self.status, Json(body)).into_response()
    }
}
