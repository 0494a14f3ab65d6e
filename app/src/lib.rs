// app/src/lib.rs

//! HTTP server for the estate listing service: configuration, Postgres stores,
//! accounts, mail transports and the actix-web routes.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

use estate::{ListingStore, Mailer, MemoryListingStore, MemoryUserStore, UserStore};
use std::sync::Arc;

use crate::config::{AppConfig, MailTransport};
use crate::errors::{AppError, Result};
use crate::services::mailer::{LogMailer, SmtpMailer};

/// Postgres stores when a database is configured, in-memory stores otherwise.
pub async fn build_stores(config: &AppConfig) -> Result<(Arc<dyn ListingStore>, Arc<dyn UserStore>)> {
  match &config.database_url {
    Some(url) => {
      let pool = db::connect(url, config.run_migrations).await?;
      Ok((
        Arc::new(db::PgListingStore::new(pool.clone())),
        Arc::new(db::PgUserStore::new(pool)),
      ))
    }
    None => {
      tracing::warn!("DATABASE_URL is not set; using in-memory stores. Data is lost on restart.");
      Ok((Arc::new(MemoryListingStore::new()), Arc::new(MemoryUserStore::new())))
    }
  }
}

pub fn build_mailer(config: &AppConfig) -> Result<Arc<dyn Mailer>> {
  match (config.mail_transport, &config.smtp) {
    (MailTransport::Log, _) => Ok(Arc::new(LogMailer)),
    (MailTransport::Smtp, Some(smtp)) => Ok(Arc::new(SmtpMailer::new(smtp)?)),
    (MailTransport::Smtp, None) => Err(AppError::Config("MAIL_TRANSPORT=smtp without SMTP settings".to_string())),
  }
}
