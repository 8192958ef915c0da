use crate::application::services::{CsvExchangeError, PageServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Every failure an HTTP handler can report.
///
/// Only a short message reaches the client; details go to the log.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Page(#[from] PageServiceError),

    #[error(transparent)]
    Csv(#[from] CsvExchangeError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("No file uploaded")]
    NoFile,

    /// The multipart upload body could not be read
    #[error("Upload failed: {message}")]
    Upload { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Page(PageServiceError::Validation { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Page(PageServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Page(PageServiceError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Csv(CsvExchangeError::Parse { .. })
            | ApiError::Csv(CsvExchangeError::EmptyImport { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Csv(CsvExchangeError::NoData) => StatusCode::NOT_FOUND,
            ApiError::Csv(CsvExchangeError::Repository(_))
            | ApiError::Csv(CsvExchangeError::Write(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody(_) | ApiError::NoFile => StatusCode::BAD_REQUEST,
            ApiError::Upload { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let body = match &self {
            ApiError::Page(PageServiceError::Validation { message, .. }) => json!({ "error": message }),
            ApiError::Page(PageServiceError::NotFound(_)) => json!({ "error": "Page not found" }),
            ApiError::Page(PageServiceError::Repository(_)) => json!({ "error": "Server error" }),
            ApiError::InvalidBody(message) => json!({ "error": message }),
            ApiError::Csv(CsvExchangeError::NoData) => json!({ "error": self.to_string() }),
            ApiError::Csv(CsvExchangeError::Parse { line, message }) => json!({
                "message": "Error parsing CSV file",
                "errors": [{ "line": line, "message": message }],
            }),
            ApiError::Csv(CsvExchangeError::EmptyImport { rejected_rows }) => json!({
                "message": self.to_string(),
                "rejectedRows": rejected_rows,
            }),
            ApiError::Csv(_) => json!({ "message": "Internal Server Error" }),
            ApiError::NoFile => json!({ "message": self.to_string() }),
            ApiError::Upload { message, .. } => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}
