// app/src/web/extractors.rs

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The caller identified by a valid `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let Some(state) = req.app_data::<web::Data<AppState>>() else {
    error!("AppState is not registered; cannot authenticate request.");
    return Err(AppError::Internal("Application state missing".to_string()));
  };

  let token = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|token| !token.is_empty())
    .ok_or_else(|| {
      debug!("Request without a bearer token.");
      AppError::Auth("Authentication required".to_string())
    })?;

  let user_id = state.auth.tokens().verify_token(token)?;
  Ok(AuthenticatedUser { user_id })
}
