// core/src/model/listing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient;
use super::user::OwnerSummary;
use crate::geo::GeoPoint;

/// A property record. Serialised in camelCase; the owner reference goes out as `userId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
  pub id: Uuid,
  pub title: String,
  pub description: String,
  pub price: f64,
  pub city: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bhk: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub area_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<GeoPoint>,
  /// Primary image reference; empty when the listing has none.
  #[serde(default)]
  pub image: String,
  #[serde(default)]
  pub images: Vec<String>,
  pub available: bool,
  #[serde(default)]
  pub bookings: Vec<Booking>,
  #[serde(rename = "userId")]
  pub owner_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Listing {
  pub fn is_owned_by(&self, user_id: Uuid) -> bool {
    self.owner_id == user_id
  }
}

/// A viewing request left by a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub date: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub time: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Create payload. Every field is optional at the type level so that missing
/// required fields surface as validation errors rather than decode failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
  pub title: Option<String>,
  pub description: Option<String>,
  #[serde(default, deserialize_with = "lenient::f64_opt")]
  pub price: Option<f64>,
  pub city: Option<String>,
  #[serde(default, deserialize_with = "lenient::u32_opt")]
  pub bhk: Option<u32>,
  pub area_name: Option<String>,
  pub location: Option<GeoPoint>,
  /// Image URL supplied by the client.
  pub image: Option<String>,
  #[serde(default)]
  pub images: Vec<String>,
  pub available: Option<bool>,
  /// Path of an uploaded image file; wins over `image` when both are set.
  /// Never decoded from JSON. The bundled HTTP server only accepts JSON bodies
  /// and leaves this unset, so it is for embedders that store uploads themselves.
  #[serde(skip)]
  pub uploaded_image: Option<String>,
}

/// Partial update. Absent fields keep their stored value; the owner reference cannot be patched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
  pub title: Option<String>,
  pub description: Option<String>,
  #[serde(default, deserialize_with = "lenient::f64_opt")]
  pub price: Option<f64>,
  pub city: Option<String>,
  #[serde(default, deserialize_with = "lenient::u32_opt")]
  pub bhk: Option<u32>,
  pub area_name: Option<String>,
  pub location: Option<GeoPoint>,
  pub image: Option<String>,
  pub images: Option<Vec<String>>,
  pub available: Option<bool>,
}

/// Single-listing read model: the listing plus its owner's public details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
  #[serde(flatten)]
  pub listing: Listing,
  pub owner: Option<OwnerSummary>,
}
