// app/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use estate::EstateError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Mail Delivery Error: {0}")]
  Mail(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<EstateError> for AppError {
  fn from(err: EstateError) -> Self {
    match err {
      EstateError::Validation(m) => AppError::Validation(m),
      EstateError::NotFound { entity, .. } => AppError::NotFound(not_found_message(entity)),
      EstateError::Forbidden { .. } => AppError::Forbidden("Unauthorized".to_string()),
      EstateError::Mail { source } => AppError::Mail(format!("{source:#}")),
      // Keep the whole chain for the log line; the client only sees a generic message.
      store @ EstateError::Store { .. } => AppError::Internal(format!("{:#}", anyhow::Error::from(store))),
      EstateError::Internal(m) => AppError::Internal(m),
    }
  }
}

fn not_found_message(entity: &str) -> String {
  match entity {
    "listing" => "Property not found".to_string(),
    "property owner" => "Property owner not found.".to_string(),
    "notification" => "Notification not found".to_string(),
    "user" => "User not found".to_string(),
    other => format!("{other} not found"),
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<EstateError>() {
      Ok(estate_err) => estate_err.into(),
      Err(err) => match err.downcast::<sqlx::Error>() {
        Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
        Err(other) => AppError::Internal(format!("{other:#}")),
      },
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Mail(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with client error");
    }
    let message = match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::Forbidden(m) | AppError::NotFound(m) => m.as_str(),
      AppError::Config(_) => "Configuration issue",
      AppError::Sqlx(_) => "Database operation failed",
      AppError::Mail(_) => "Failed to send email",
      AppError::Internal(_) => "An internal error occurred",
    };
    HttpResponse::build(status).json(json!({ "error": message }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
