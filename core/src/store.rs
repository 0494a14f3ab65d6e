// core/src/store.rs

//! Persistence seams. The crate ships in-memory implementations
//! (see [`crate::memory`]); the server provides Postgres-backed ones.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EstateResult;
use crate::geo::NearbyQuery;
use crate::model::{Booking, Listing, NewUser, Notification, User};
use crate::query::ListingFilter;

#[async_trait]
pub trait ListingStore: Send + Sync {
  async fn insert(&self, listing: Listing) -> EstateResult<Listing>;

  async fn find_by_id(&self, id: Uuid) -> EstateResult<Option<Listing>>;

  /// Listings satisfying every predicate of `filter`, in insertion order.
  async fn find_matching(&self, filter: &ListingFilter) -> EstateResult<Vec<Listing>>;

  /// Listings with a location within `query.max_distance_m` of `query.center`, nearest first.
  /// Listings without a location never match.
  async fn find_near(&self, query: &NearbyQuery) -> EstateResult<Vec<Listing>>;

  async fn find_by_owner(&self, owner_id: Uuid) -> EstateResult<Vec<Listing>>;

  /// Overwrites the editable fields of an existing listing. Bookings, owner and
  /// creation time are left as stored. Returns the stored record, or `None` if it vanished.
  async fn update(&self, listing: &Listing) -> EstateResult<Option<Listing>>;

  /// Returns whether a listing was removed.
  async fn delete(&self, id: Uuid) -> EstateResult<bool>;

  /// Appends a booking. Returns `false` if the listing does not exist.
  async fn add_booking(&self, listing_id: Uuid, booking: Booking) -> EstateResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
  /// Fails with a validation error when the email is already registered.
  async fn insert(&self, user: NewUser) -> EstateResult<User>;

  async fn find_by_id(&self, id: Uuid) -> EstateResult<Option<User>>;

  async fn find_by_email(&self, email: &str) -> EstateResult<Option<User>>;

  /// Appends to the user's notification list. Fails with not-found when the user is absent.
  async fn push_notification(&self, user_id: Uuid, notification: Notification) -> EstateResult<()>;

  /// `None` when the user does not exist.
  async fn notifications(&self, user_id: Uuid) -> EstateResult<Option<Vec<Notification>>>;

  /// Returns whether a notification with that id belonged to the user.
  async fn mark_notification_read(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<bool>;

  /// Returns how many notifications changed state.
  async fn mark_all_notifications_read(&self, user_id: Uuid) -> EstateResult<u64>;

  /// Returns whether anything was removed.
  async fn delete_notification(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<bool>;
}
