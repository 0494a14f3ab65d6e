// core/src/memory.rs

//! In-process stores backed by `parking_lot::RwLock`. Used by tests and by the
//! server when no database is configured.
//!
//! Lock guards are never held across an `.await`.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{EstateError, EstateResult};
use crate::geo::NearbyQuery;
use crate::model::{Booking, Listing, NewUser, Notification, User};
use crate::query::ListingFilter;
use crate::store::{ListingStore, UserStore};

#[derive(Debug, Default)]
pub struct MemoryListingStore {
  listings: RwLock<Vec<Listing>>,
}

impl MemoryListingStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.listings.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.listings.read().is_empty()
  }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
  async fn insert(&self, listing: Listing) -> EstateResult<Listing> {
    let mut guard = self.listings.write();
    if guard.iter().any(|l| l.id == listing.id) {
      return Err(EstateError::Internal(format!("Duplicate listing id {}", listing.id)));
    }
    guard.push(listing.clone());
    Ok(listing)
  }

  async fn find_by_id(&self, id: Uuid) -> EstateResult<Option<Listing>> {
    Ok(self.listings.read().iter().find(|l| l.id == id).cloned())
  }

  #[instrument(name = "memory_store::find_matching", skip(self), level = "debug")]
  async fn find_matching(&self, filter: &ListingFilter) -> EstateResult<Vec<Listing>> {
    let found: Vec<Listing> = self.listings.read().iter().filter(|l| filter.matches(l)).cloned().collect();
    debug!(count = found.len(), "Literal filter evaluated in memory.");
    Ok(found)
  }

  #[instrument(name = "memory_store::find_near", skip(self), level = "debug")]
  async fn find_near(&self, query: &NearbyQuery) -> EstateResult<Vec<Listing>> {
    let bbox = query.bounding_box();
    let mut hits: Vec<(f64, Listing)> = {
      let guard = self.listings.read();
      guard
        .iter()
        .filter_map(|l| {
          let point = l.location?;
          if !bbox.contains(&point) {
            return None;
          }
          let distance = query.center.distance_m(&point);
          (distance <= query.max_distance_m).then(|| (distance, l.clone()))
        })
        .collect()
    };
    // Stable sort keeps insertion order between equidistant listings.
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(hits.into_iter().map(|(_, l)| l).collect())
  }

  async fn find_by_owner(&self, owner_id: Uuid) -> EstateResult<Vec<Listing>> {
    Ok(self.listings.read().iter().filter(|l| l.owner_id == owner_id).cloned().collect())
  }

  async fn update(&self, listing: &Listing) -> EstateResult<Option<Listing>> {
    let mut guard = self.listings.write();
    let Some(stored) = guard.iter_mut().find(|l| l.id == listing.id) else {
      return Ok(None);
    };
    let bookings = std::mem::take(&mut stored.bookings);
    let owner_id = stored.owner_id;
    let created_at = stored.created_at;
    *stored = Listing {
      bookings,
      owner_id,
      created_at,
      ..listing.clone()
    };
    Ok(Some(stored.clone()))
  }

  async fn delete(&self, id: Uuid) -> EstateResult<bool> {
    let mut guard = self.listings.write();
    let before = guard.len();
    guard.retain(|l| l.id != id);
    Ok(guard.len() != before)
  }

  async fn add_booking(&self, listing_id: Uuid, booking: Booking) -> EstateResult<bool> {
    let mut guard = self.listings.write();
    match guard.iter_mut().find(|l| l.id == listing_id) {
      Some(listing) => {
        listing.bookings.push(booking);
        listing.updated_at = Utc::now();
        Ok(true)
      }
      None => Ok(false),
    }
  }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
  users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn with_user<T>(&self, user_id: Uuid, f: impl FnOnce(&mut User) -> T) -> EstateResult<T> {
    let mut guard = self.users.write();
    let user = guard
      .iter_mut()
      .find(|u| u.id == user_id)
      .ok_or_else(|| EstateError::not_found("user", user_id))?;
    Ok(f(user))
  }
}

#[async_trait]
impl UserStore for MemoryUserStore {
  async fn insert(&self, user: NewUser) -> EstateResult<User> {
    // Existence check and write happen under one lock here.
    let mut guard = self.users.write();
    if guard.iter().any(|u| u.email == user.email) {
      return Err(EstateError::validation("User already exists"));
    }
    let created = User {
      id: Uuid::new_v4(),
      name: user.name,
      email: user.email,
      password_hash: user.password_hash,
      notifications: Vec::new(),
      created_at: Utc::now(),
    };
    guard.push(created.clone());
    Ok(created)
  }

  async fn find_by_id(&self, id: Uuid) -> EstateResult<Option<User>> {
    Ok(self.users.read().iter().find(|u| u.id == id).cloned())
  }

  async fn find_by_email(&self, email: &str) -> EstateResult<Option<User>> {
    Ok(self.users.read().iter().find(|u| u.email == email).cloned())
  }

  async fn push_notification(&self, user_id: Uuid, notification: Notification) -> EstateResult<()> {
    self.with_user(user_id, |u| u.notifications.push(notification))
  }

  async fn notifications(&self, user_id: Uuid) -> EstateResult<Option<Vec<Notification>>> {
    Ok(self.users.read().iter().find(|u| u.id == user_id).map(|u| u.notifications.clone()))
  }

  async fn mark_notification_read(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<bool> {
    self.with_user(user_id, |u| match u.notifications.iter_mut().find(|n| n.id == notification_id) {
      Some(n) => {
        n.read = true;
        true
      }
      None => false,
    })
  }

  async fn mark_all_notifications_read(&self, user_id: Uuid) -> EstateResult<u64> {
    self.with_user(user_id, |u| {
      let mut changed = 0;
      for n in u.notifications.iter_mut().filter(|n| !n.read) {
        n.read = true;
        changed += 1;
      }
      changed
    })
  }

  async fn delete_notification(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<bool> {
    self.with_user(user_id, |u| {
      let before = u.notifications.len();
      u.notifications.retain(|n| n.id != notification_id);
      u.notifications.len() != before
    })
  }
}
