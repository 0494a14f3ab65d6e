// app/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::auth_service::{LoginRequest, RegisterRequest};
use crate::state::AppState;

#[instrument(name = "handler::register", skip(app_state, payload))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
  app_state.auth.register(payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(json!({ "message": "Registered successfully" })))
}

#[instrument(name = "handler::login", skip(app_state, payload))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
  let session = app_state.auth.login(payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
    "token": session.token,
    "user": {
      "id": session.user.id,
      "name": session.user.name,
      "email": session.user.email,
    },
  })))
}
