//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use quad_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing, malformed, or unknown bearer token.
  #[error("authentication required")]
  Unauthorized,

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Core(e) => match e {
        CoreError::AccountNotFound(_)
        | CoreError::UnknownMatric(_)
        | CoreError::AppointmentNotFound(_)
        | CoreError::ReviewNotFound(_)
        | CoreError::LecturerNotFound(_)
        | CoreError::VendorNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::DuplicateMatric(_) | CoreError::AlreadyResolved { .. } => {
          StatusCode::CONFLICT
        }
        CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden { .. } => StatusCode::FORBIDDEN,
        CoreError::InvalidRating(_) | CoreError::BlankField(_) => {
          StatusCode::UNPROCESSABLE_ENTITY
        }
        CoreError::Credential(_) | CoreError::Storage(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
