// app/src/models/mod.rs

//! Row shapes as stored in Postgres, and their conversion into domain records.

pub mod booking;
pub mod listing;
pub mod notification;
pub mod user;

pub use booking::BookingRow;
pub use listing::ListingRow;
pub use notification::NotificationRow;
pub use user::UserRow;
