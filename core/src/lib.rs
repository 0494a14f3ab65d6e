// src/lib.rs

//! Estate: the domain core of a property listing service.
//!
//!  - Listing and user records, with GeoJSON `[lng, lat]` points.
//!  - Translation of loosely-typed search parameters into a literal filter.
//!  - A search resolver that falls back to a nearest-first radius query when the
//!    literal filter finds nothing and the caller asked for nearby suggestions.
//!  - Ownership-checked create/update/delete of listings.
//!  - Contact and booking flows that mail the owner and notify them through a
//!    best-effort background queue.
//!
//! Storage and mail transport sit behind traits ([`ListingStore`], [`UserStore`],
//! [`Mailer`]). In-memory stores are provided in [`memory`].

pub mod error;
pub mod geo;
pub mod listings;
pub mod memory;
pub mod model;
pub mod notify;
pub mod outreach;
pub mod query;
pub mod search;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{EstateError, EstateResult};
pub use crate::geo::{BoundingBox, GeoPoint, NearbyQuery, RadiusKm, DEFAULT_RADIUS_KM};
pub use crate::listings::ListingService;
pub use crate::memory::{MemoryListingStore, MemoryUserStore};
pub use crate::notify::{
  DeliveryFailure, DeliveryLog, NotificationQueue, NotificationService, DELIVERY_LOG_CAPACITY,
};
pub use crate::outreach::{BookingRequest, ContactRequest, Mailer, OutboundEmail, OutreachService};
pub use crate::query::{ListingFilter, PriceRange, SearchParams};
pub use crate::search::{ResultSource, SearchOutcome, SearchResolver};
pub use crate::store::{ListingStore, UserStore};
