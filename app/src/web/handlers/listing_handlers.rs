// app/src/web/handlers/listing_handlers.rs

use actix_web::{web, HttpResponse};
use estate::{
  model::{ListingPatch, NewListing},
  SearchParams,
};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

/// Set on search responses whose listings came from the nearby fallback.
pub const SUGGESTED_HEADER: &str = "X-Suggested";

#[instrument(name = "handler::search_listings", skip(app_state))]
pub async fn search_listings_handler(
  app_state: web::Data<AppState>,
  params: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.search.resolve(&params).await?;

  let mut response = HttpResponse::Ok();
  if outcome.is_suggested() {
    info!(count = outcome.listings.len(), "Serving nearby suggestions.");
    response.insert_header((SUGGESTED_HEADER, "true"));
  }
  Ok(response.json(outcome.listings))
}

#[instrument(name = "handler::create_listing", skip(app_state, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_listing_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewListing>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let listing = app_state.listings.create(auth_user.user_id, payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(listing))
}

#[instrument(name = "handler::my_listings", skip(app_state), fields(user_id = %auth_user.user_id))]
pub async fn my_listings_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let listings = app_state.listings.mine(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(listings))
}

#[instrument(name = "handler::get_listing", skip(app_state, path), fields(listing_id = %path.as_ref()))]
pub async fn get_listing_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let view = app_state.listings.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(
  name = "handler::update_listing",
  skip(app_state, path, payload),
  fields(listing_id = %path.as_ref(), user_id = %auth_user.user_id)
)]
pub async fn update_listing_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<ListingPatch>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let updated = app_state
    .listings
    .update(auth_user.user_id, path.into_inner(), payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(updated))
}

#[instrument(
  name = "handler::delete_listing",
  skip(app_state, path),
  fields(listing_id = %path.as_ref(), user_id = %auth_user.user_id)
)]
pub async fn delete_listing_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.listings.delete(auth_user.user_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Property deleted successfully" })))
}
