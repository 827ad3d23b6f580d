use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sitehost_core_types::IngestMode;
use sitehost_ingest::Upload;
use tracing::{debug, info, instrument};

use crate::errors::ApiError;
use crate::server::state::ServeState;

pub(crate) fn router() -> Router<ServeState> {
    Router::new()
        .route("/api/sites", post(create_site))
        .route("/api/sites/:namespace", put(replace_site).delete(delete_site))
        .route("/api/sites/:namespace/files", get(list_files))
        .route("/api/sites/:namespace/rename", post(rename_site))
}

#[derive(Default)]
struct UploadForm {
    namespace: Option<String>,
    mode: Option<String>,
    overwrite: bool,
    upload: Option<Upload>,
}

impl UploadForm {
    fn mode(&self) -> Result<IngestMode, ApiError> {
        if self.overwrite {
            return Ok(IngestMode::Replace);
        }
        match self.mode.as_deref() {
            None => Ok(IngestMode::Create),
            Some(raw) => raw
                .parse()
                .map_err(|err: sitehost_core_types::SiteError| {
                    ApiError::bad_request("invalid_mode", err.to_string())
                }),
        }
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "namespace" | "subdomain" | "name" => {
                form.namespace = Some(field.text().await?.trim().to_string());
            }
            "mode" => form.mode = Some(field.text().await?),
            "overwrite" => {
                let raw = field.text().await?;
                form.overwrite = matches!(raw.trim(), "1" | "true" | "yes" | "on");
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let declared_mime = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.upload = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                    declared_mime,
                });
            }
            other => debug!(field = other, "ignoring multipart field"),
        }
    }
    Ok(form)
}

#[instrument(name = "sitehost.api.create", skip_all)]
async fn create_site(
    State(state): State<ServeState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_upload_form(multipart).await?;
    let mode = form.mode()?;
    let namespace = form
        .namespace
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing_field", "namespace is required"))?;
    let upload = form
        .upload
        .ok_or_else(|| ApiError::bad_request("missing_field", "file is required"))?;

    let _guard = state.locks.acquire(&namespace).await;
    let summary = state.ingest.ingest(&namespace, upload, mode).await?;
    info!(namespace = %summary.namespace, %mode, files = summary.file_count, "site uploaded");
    let status = match mode {
        IngestMode::Create => StatusCode::CREATED,
        IngestMode::Replace => StatusCode::OK,
    };
    Ok((status, Json(json!({ "success": true, "site": summary }))))
}

#[instrument(name = "sitehost.api.replace", skip(state, multipart))]
async fn replace_site(
    State(state): State<ServeState>,
    Path(namespace): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_upload_form(multipart).await?;
    let upload = form
        .upload
        .ok_or_else(|| ApiError::bad_request("missing_field", "file is required"))?;

    let _guard = state.locks.acquire(&namespace).await;
    let summary = state
        .ingest
        .ingest(&namespace, upload, IngestMode::Replace)
        .await?;
    Ok(Json(json!({ "success": true, "site": summary })))
}

#[instrument(name = "sitehost.api.files", skip(state))]
async fn list_files(
    State(state): State<ServeState>,
    Path(namespace): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let files = state.ingest.list(&namespace).await?;
    Ok(Json(json!({
        "namespace": namespace,
        "count": files.len(),
        "files": files,
    })))
}

#[derive(Debug, Deserialize)]
struct RenameRequest {
    #[serde(alias = "newNamespace", alias = "new_subdomain")]
    new_namespace: String,
}

#[instrument(name = "sitehost.api.rename", skip(state, request))]
async fn rename_site(
    State(state): State<ServeState>,
    Path(namespace): Path<String>,
    request: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let target = request.new_namespace.trim().to_string();
    let _guard = state.locks.acquire_pair(&namespace, &target).await;
    let summary = state.ingest.rename(&namespace, &target).await?;
    Ok(Json(json!({ "success": true, "site": summary })))
}

#[instrument(name = "sitehost.api.delete", skip(state))]
async fn delete_site(
    State(state): State<ServeState>,
    Path(namespace): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let _guard = state.locks.acquire(&namespace).await;
    let deleted = state.ingest.delete(&namespace).await?;
    Ok(Json(json!({
        "success": true,
        "namespace": namespace,
        "deleted": deleted,
    })))
}
