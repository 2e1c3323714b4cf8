use axum::{
  extract::{rejection::JsonRejection, FromRequest},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::catalog::CatalogError;

#[derive(Debug, Clone, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Unprocessable(String),

  #[error("Internal server error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
  pub detail: String,
  pub code: u16,
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    if status.is_server_error() {
      error!(target: "topicquiz_backend", error = %self, "Request failed");
    }
    let body = ErrorResponse { detail: self.to_string(), code: status.as_u16() };
    (status, Json(body)).into_response()
  }
}

/// `Json` extractor whose rejections render as `AppError` bodies.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
      AppError::Unprocessable(rejection.body_text())
    } else {
      AppError::Validation(rejection.body_text())
    }
  }
}

impl From<CatalogError> for AppError {
  fn from(err: CatalogError) -> Self {
    AppError::Internal(err.to_string())
  }
}

impl From<regex::Error> for AppError {
  fn from(err: regex::Error) -> Self {
    AppError::Internal(format!("topic matcher: {err}"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_codes_follow_variant() {
    assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::Unprocessable("x".into()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(AppError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn client_errors_render_bare_message() {
    let err = AppError::Validation("subjects must not be empty".into());
    assert_eq!(err.to_string(), "subjects must not be empty");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
  }
}
