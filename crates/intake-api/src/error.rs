//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use intake_core::{FieldErrors, StorageError};
use serde_json::json;
use thiserror::Error;

use crate::submission::SubmissionError;

/// Shown to the visitor whenever a message could not be recorded.
pub const STORAGE_FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The body was not a JSON contact form.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  #[error("storage failure: {0}")]
  Storage(StorageError),
}

impl From<SubmissionError> for ApiError {
  fn from(err: SubmissionError) -> Self {
    match err {
      SubmissionError::Validation(fields) => Self::Validation(fields),
      SubmissionError::Storage(e) => Self::Storage(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::BadRequest(m) => (
        StatusCode::BAD_REQUEST,
        json!({ "success": false, "error": "bad_request", "message": m }),
      ),
      ApiError::Validation(fields) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "success": false, "error": "validation", "fields": fields }),
      ),
      // Storage details stay in the logs.
      ApiError::Storage(_) => (
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "success": false, "error": "storage", "message": STORAGE_FAILURE_MESSAGE }),
      ),
    };
    (status, Json(body)).into_response()
  }
}
