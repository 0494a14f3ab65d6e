// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset

use async_trait::async_trait;
use chrono::Utc;
use estate::{
  model::{Booking, Listing, NewUser, Notification, User},
  EstateError, EstateResult, GeoPoint, ListingFilter, ListingStore, Mailer, MemoryListingStore, MemoryUserStore,
  NearbyQuery, OutboundEmail, SearchParams, UserStore,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Listing fixtures ---

pub struct ListingBuilder(Listing);

impl ListingBuilder {
  pub fn new(city: &str, price: f64) -> Self {
    let now = Utc::now();
    ListingBuilder(Listing {
      id: Uuid::new_v4(),
      title: format!("Flat in {city}"),
      description: "Bright, quiet, close to transit.".to_string(),
      price,
      city: city.to_string(),
      bhk: None,
      area_name: None,
      location: None,
      image: String::new(),
      images: Vec::new(),
      available: true,
      bookings: Vec::new(),
      owner_id: Uuid::new_v4(),
      created_at: now,
      updated_at: now,
    })
  }

  pub fn bhk(mut self, bhk: u32) -> Self {
    self.0.bhk = Some(bhk);
    self
  }

  pub fn area(mut self, area: &str) -> Self {
    self.0.area_name = Some(area.to_string());
    self
  }

  /// (lat, lng) in the order people say it; stored as a [lng, lat] point.
  pub fn at(mut self, lat: f64, lng: f64) -> Self {
    self.0.location = Some(GeoPoint::new(lng, lat).expect("valid test coordinate"));
    self
  }

  pub fn owner(mut self, owner_id: Uuid) -> Self {
    self.0.owner_id = owner_id;
    self
  }

  pub fn build(self) -> Listing {
    self.0
  }
}

/// A point `km` kilometres due north of (lat, lng).
pub fn north_of(lat: f64, km: f64) -> f64 {
  lat + km / 111.195
}

pub async fn seeded_store(listings: Vec<Listing>) -> Arc<MemoryListingStore> {
  let store = Arc::new(MemoryListingStore::new());
  for listing in listings {
    store.insert(listing).await.expect("seed insert");
  }
  store
}

pub async fn register(users: &MemoryUserStore, name: &str, email: &str) -> User {
  users
    .insert(NewUser {
      name: name.to_string(),
      email: email.to_string(),
      password_hash: "not-a-real-hash".to_string(),
    })
    .await
    .expect("seed user")
}

pub fn search(pairs: &[(&str, &str)]) -> SearchParams {
  let mut map = serde_json::Map::new();
  for (k, v) in pairs {
    map.insert(k.to_string(), serde_json::Value::String(v.to_string()));
  }
  serde_json::from_value(serde_json::Value::Object(map)).expect("search params")
}

// --- Mailers ---

#[derive(Default)]
pub struct RecordingMailer {
  pub sent: Mutex<Vec<OutboundEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(&self, email: OutboundEmail) -> anyhow::Result<()> {
    self.sent.lock().push(email);
    Ok(())
  }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
  async fn send(&self, _email: OutboundEmail) -> anyhow::Result<()> {
    anyhow::bail!("connection refused by smtp relay")
  }
}

// --- Stores that fail on purpose ---

/// Every query fails, as if the database were unreachable.
pub struct BrokenListingStore;

fn unreachable_db() -> EstateError {
  EstateError::store("query", anyhow::anyhow!("connection reset"))
}

#[async_trait]
impl ListingStore for BrokenListingStore {
  async fn insert(&self, _listing: Listing) -> EstateResult<Listing> {
    Err(unreachable_db())
  }
  async fn find_by_id(&self, _id: Uuid) -> EstateResult<Option<Listing>> {
    Err(unreachable_db())
  }
  async fn find_matching(&self, _filter: &ListingFilter) -> EstateResult<Vec<Listing>> {
    Err(unreachable_db())
  }
  async fn find_near(&self, _query: &NearbyQuery) -> EstateResult<Vec<Listing>> {
    Err(unreachable_db())
  }
  async fn find_by_owner(&self, _owner_id: Uuid) -> EstateResult<Vec<Listing>> {
    Err(unreachable_db())
  }
  async fn update(&self, _listing: &Listing) -> EstateResult<Option<Listing>> {
    Err(unreachable_db())
  }
  async fn delete(&self, _id: Uuid) -> EstateResult<bool> {
    Err(unreachable_db())
  }
  async fn add_booking(&self, _listing_id: Uuid, _booking: Booking) -> EstateResult<bool> {
    Err(unreachable_db())
  }
}

/// Delegates to a memory store but refuses to append notifications.
pub struct NotificationRejectingUsers(pub Arc<MemoryUserStore>);

#[async_trait]
impl UserStore for NotificationRejectingUsers {
  async fn insert(&self, user: NewUser) -> EstateResult<User> {
    self.0.insert(user).await
  }
  async fn find_by_id(&self, id: Uuid) -> EstateResult<Option<User>> {
    self.0.find_by_id(id).await
  }
  async fn find_by_email(&self, email: &str) -> EstateResult<Option<User>> {
    self.0.find_by_email(email).await
  }
  async fn push_notification(&self, _user_id: Uuid, _notification: Notification) -> EstateResult<()> {
    Err(EstateError::store("push_notification", anyhow::anyhow!("write conflict")))
  }
  async fn notifications(&self, user_id: Uuid) -> EstateResult<Option<Vec<Notification>>> {
    self.0.notifications(user_id).await
  }
  async fn mark_notification_read(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<bool> {
    self.0.mark_notification_read(user_id, notification_id).await
  }
  async fn mark_all_notifications_read(&self, user_id: Uuid) -> EstateResult<u64> {
    self.0.mark_all_notifications_read(user_id).await
  }
  async fn delete_notification(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<bool> {
    self.0.delete_notification(user_id, notification_id).await
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
