// app/src/db/mod.rs

//! Postgres-backed implementations of the estate store traits.

mod listing_store;
mod user_store;

pub use listing_store::PgListingStore;
pub use user_store::PgUserStore;

use estate::EstateError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::errors::{AppError, Result};

pub async fn connect(database_url: &str, run_migrations: bool) -> Result<PgPool> {
  let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
  info!("Successfully connected to the database.");

  if run_migrations {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .map_err(|e| AppError::Internal(format!("Failed to run migrations: {e}")))?;
    info!("Migrations complete.");
  }
  Ok(pool)
}

/// Wraps a driver error as a store failure for `operation`.
fn store_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> EstateError {
  move |e| EstateError::store(operation, e)
}

/// Escapes `%`, `_` and `\` so user input matches literally inside an `ILIKE` pattern.
fn like_pattern(needle: &str) -> String {
  let mut pattern = String::with_capacity(needle.len() + 2);
  pattern.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}
