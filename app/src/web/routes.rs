// app/src/web/routes.rs

use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, listing_handlers, notification_handlers, outreach_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed bodies answer with the same `{"error": ...}` shape as every other failure.
fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid request body: {err}")).into()
}

/// Ids that are not UUIDs cannot name an existing record.
fn path_error_handler(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(error = %err, "Unparseable path segment.");
  AppError::NotFound("Resource not found".to_string()).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/auth")
        .route("/register", web::post().to(auth_handlers::register_handler))
        .route("/login", web::post().to(auth_handlers::login_handler))
        .route(
          "/notifications",
          web::get().to(notification_handlers::list_notifications_handler),
        )
        // Registered before "/notifications/{id}/read" so "read-all" is never taken for an id.
        .route(
          "/notifications/read-all",
          web::put().to(notification_handlers::mark_all_notifications_read_handler),
        )
        .route(
          "/notifications/{id}/read",
          web::put().to(notification_handlers::mark_notification_read_handler),
        )
        .route(
          "/notifications/{id}",
          web::delete().to(notification_handlers::delete_notification_handler),
        ),
    )
    .service(
      web::scope("/properties")
        .route("", web::get().to(listing_handlers::search_listings_handler))
        .route("", web::post().to(listing_handlers::create_listing_handler))
        // Must precede "/{id}".
        .route("/my-properties", web::get().to(listing_handlers::my_listings_handler))
        .route("/{id}", web::get().to(listing_handlers::get_listing_handler))
        .route("/{id}", web::put().to(listing_handlers::update_listing_handler))
        .route("/{id}", web::delete().to(listing_handlers::delete_listing_handler))
        .route("/{id}/contact", web::post().to(outreach_handlers::contact_owner_handler))
        .route("/{id}/book", web::post().to(outreach_handlers::book_viewing_handler)),
    );
}
