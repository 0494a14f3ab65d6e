// app/src/web/handlers/notification_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::list_notifications", skip(app_state), fields(user_id = %auth_user.user_id))]
pub async fn list_notifications_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let notifications = app_state.notifications.list(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(notifications))
}

#[instrument(name = "handler::mark_notification_read", skip(app_state, path), fields(user_id = %auth_user.user_id))]
pub async fn mark_notification_read_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.notifications.mark_read(auth_user.user_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Notification marked as read" })))
}

#[instrument(name = "handler::mark_all_notifications_read", skip(app_state), fields(user_id = %auth_user.user_id))]
pub async fn mark_all_notifications_read_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.notifications.mark_all_read(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "All notifications marked as read" })))
}

#[instrument(name = "handler::delete_notification", skip(app_state, path), fields(user_id = %auth_user.user_id))]
pub async fn delete_notification_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.notifications.delete(auth_user.user_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Notification deleted" })))
}
