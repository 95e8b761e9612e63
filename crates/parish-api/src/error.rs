//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the shape `{"success": false, "message": ...}`;
//! validation failures add `"errors": {field: [messages]}`.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use parish_core::{Classify, ErrorClass, ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error(transparent)]
  Invalid(#[from] ValidationErrors),

  /// The request body, path or query string could not be parsed.
  #[error("{message}")]
  Rejected { status: StatusCode, message: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store error onto the matching HTTP error by its class.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    match e.class() {
      ErrorClass::Invalid => match e.validation() {
        Some(v) => Self::Invalid(v.clone()),
        None => Self::Rejected {
          status:  StatusCode::UNPROCESSABLE_ENTITY,
          message: e.to_string(),
        },
      },
      ErrorClass::NotFound => Self::NotFound(e.to_string()),
      ErrorClass::Conflict => Self::Conflict(e.to_string()),
      ErrorClass::Internal => Self::Store(Box::new(e)),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::Rejected { status, .. } => *status,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Rejected {
      status:  rejection.status(),
      message: rejection.body_text(),
    }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::Rejected {
      status:  rejection.status(),
      message: rejection.body_text(),
    }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::Rejected {
      status:  rejection.status(),
      message: rejection.body_text(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match &self {
      ApiError::Invalid(errors) => json!({
        "success": false,
        "message": "Validation failed",
        "errors":  errors,
      }),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        json!({ "success": false, "message": e.to_string() })
      }
      other => json!({ "success": false, "message": other.to_string() }),
    };

    let mut res = (status, Json(body)).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"parish\""),
      );
    }
    res
  }
}
