// app/src/web/handlers/outreach_handlers.rs

use actix_web::{web, HttpResponse};
use estate::{BookingRequest, ContactRequest};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::contact_owner", skip(app_state, path, payload), fields(listing_id = %path.as_ref()))]
pub async fn contact_owner_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<ContactRequest>,
) -> Result<HttpResponse, AppError> {
  app_state.outreach.contact(path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Inquiry sent to property owner." })))
}

#[instrument(name = "handler::book_viewing", skip(app_state, path, payload), fields(listing_id = %path.as_ref()))]
pub async fn book_viewing_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<BookingRequest>,
) -> Result<HttpResponse, AppError> {
  let booking = app_state.outreach.book(path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Booking request sent to property owner.",
    "booking": booking,
  })))
}
