// app/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use estate_app::{build_mailer, build_stores, config::AppConfig, state::AppState, web::configure_app_routes};
use std::sync::Arc;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  let subscriber = tracing_subscriber::fmt()
    // RUST_LOG overrides the default level
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE);
  if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
    subscriber.json().init();
  } else {
    subscriber.init();
  }

  tracing::info!("Starting estate server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let (listing_store, user_store) = build_stores(&app_config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialise storage.");
    std::io::Error::other(e.to_string())
  })?;
  let mailer = build_mailer(&app_config).map_err(|e| {
    tracing::error!(error = %e, "Failed to initialise mail transport.");
    std::io::Error::other(e.to_string())
  })?;

  let (app_state, _notification_worker) = AppState::build(app_config.clone(), listing_store, user_store, mailer);

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let server_state = app_state.clone();
  let result = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(server_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await;

  // Let queued notifications land before exiting.
  app_state.queue.flush().await;
  let undelivered = app_state.queue.delivery_log().drain();
  if !undelivered.is_empty() {
    tracing::warn!(count = undelivered.len(), "Recent notifications that were never delivered.");
  }
  tracing::info!("Server stopped.");
  result
}
