//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use muster_core::Error as CoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Duplicate registration. A recoverable user-facing condition with its
  /// own wire shape, not a fault.
  #[error("already registered for this event")]
  AlreadyRegistered,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Translate the core error taxonomy into a transport-level error.
  pub fn from_store<E>(err: E) -> Self
  where
    E: Into<CoreError>,
  {
    match err.into() {
      CoreError::Validation(m) => ApiError::BadRequest(m),
      CoreError::DuplicateRegistration => ApiError::AlreadyRegistered,
      CoreError::EventNotFound(id) => {
        ApiError::NotFound(format!("event {id} not found"))
      }
      other => ApiError::Store(Box::new(other)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::AlreadyRegistered => (
        StatusCode::BAD_REQUEST,
        Json(json!({
          "success":         false,
          "message":         "You have already registered for this event",
          "registeredCount": 0,
        })),
      )
        .into_response(),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
