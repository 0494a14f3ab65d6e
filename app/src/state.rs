// app/src/state.rs

use estate::{
  ListingService, ListingStore, Mailer, NotificationQueue, NotificationService, OutreachService, SearchResolver,
  UserStore,
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::services::{auth_service::AuthService, token_service::JwtService};

/// Everything a handler needs, cloned into each worker.
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub search: SearchResolver,
  pub listings: ListingService,
  pub notifications: NotificationService,
  pub outreach: OutreachService,
  pub auth: AuthService,
  pub queue: NotificationQueue,
}

impl AppState {
  /// Wires the services over the given stores and starts the notification worker
  /// on the current runtime.
  pub fn build(
    config: Arc<AppConfig>,
    listing_store: Arc<dyn ListingStore>,
    user_store: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
  ) -> (Self, JoinHandle<()>) {
    let (queue, worker) = NotificationQueue::spawn(user_store.clone());
    let tokens = JwtService::new(
      config.jwt_secret.expose_secret(),
      config.jwt_issuer.clone(),
      config.jwt_ttl_hours,
    );

    let state = AppState {
      search: SearchResolver::new(listing_store.clone()),
      listings: ListingService::new(listing_store.clone(), user_store.clone()),
      notifications: NotificationService::new(user_store.clone()),
      outreach: OutreachService::new(listing_store, user_store.clone(), mailer, queue.clone()),
      auth: AuthService::new(user_store, tokens),
      queue,
      config,
    };
    (state, worker)
  }
}
