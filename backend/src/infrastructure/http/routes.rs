use super::error::ApiError;
use super::AppState;
use crate::application::dto::{
    ImportResponse, MessageResponse, PageDocument, PageEnvelope, PageFieldsInput,
    PageListResponse, PageMessageResponse,
};
use crate::application::repositories::PageRepository;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

/// Name of the multipart field carrying the uploaded CSV
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub name: Option<String>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /page` lists every page; `GET /page?name=X` returns the first page
/// with that exact name as a bare document.
pub async fn list_pages<R>(
    State(state): State<AppState<R>>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError>
where
    R: PageRepository + Send + 'static,
{
    match query.name.filter(|name| !name.is_empty()) {
        Some(name) => {
            let page = state.pages.get_by_name(&name).await?;
            Ok(Json(PageDocument::from(page)).into_response())
        }
        None => {
            let pages = state.pages.get_all().await?;
            let pages = pages.into_iter().map(PageDocument::from).collect();
            Ok(Json(PageListResponse { pages }).into_response())
        }
    }
}

pub async fn create_page<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<PageFieldsInput>, JsonRejection>,
) -> Result<(StatusCode, Json<PageMessageResponse>), ApiError>
where
    R: PageRepository + Send + 'static,
{
    let Json(input) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let page = state.pages.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(PageMessageResponse {
            message: "Page added successfully".to_string(),
            page: page.into(),
        }),
    ))
}

pub async fn get_page<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<PageEnvelope>, ApiError>
where
    R: PageRepository + Send + 'static,
{
    let page = state.pages.get_by_id(&id).await?;
    Ok(Json(PageEnvelope { page: page.into() }))
}

pub async fn update_page<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<PageFieldsInput>, JsonRejection>,
) -> Result<Json<PageMessageResponse>, ApiError>
where
    R: PageRepository + Send + 'static,
{
    let Json(input) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let page = state.pages.update(&id, input).await?;

    Ok(Json(PageMessageResponse {
        message: "Page updated successfully".to_string(),
        page: page.into(),
    }))
}

pub async fn delete_page<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError>
where
    R: PageRepository + Send + 'static,
{
    state.pages.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Page deleted successfully".to_string(),
    }))
}

/// `POST /uploadcsv` with the CSV in the multipart field `file`.
///
/// Non-UTF-8 bytes are replaced rather than rejected.
pub async fn upload_csv<R>(
    State(state): State<AppState<R>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError>
where
    R: PageRepository + Send + 'static,
{
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("upload without multipart body: {}", e);
        ApiError::NoFile
    })?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await.map_err(upload_error)?;
            upload = Some(bytes);
            break;
        }
    }
    let bytes = upload.ok_or(ApiError::NoFile)?;
    tracing::debug!(bytes = bytes.len(), "received CSV upload");

    let text = String::from_utf8_lossy(&bytes);
    let summary = state.csv.import_csv(&text).await?;
    tracing::info!(
        imported = summary.imported_count,
        rejected = summary.rejected_rows.len(),
        duration_ms = summary.duration_ms,
        "CSV upload processed"
    );

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            message: "CSV uploaded successfully".to_string(),
            imported_count: summary.imported_count,
            pages: summary.pages.into_iter().map(PageDocument::from).collect(),
            rejected_rows: summary.rejected_rows,
        }),
    ))
}

fn upload_error(err: MultipartError) -> ApiError {
    ApiError::Upload {
        status: err.status(),
        message: err.body_text(),
    }
}

pub async fn export_csv<R>(State(state): State<AppState<R>>) -> Result<Response, ApiError>
where
    R: PageRepository + Send + 'static,
{
    let csv = state.csv.export_all().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"pages.csv\""),
        ],
        csv,
    )
        .into_response())
}
