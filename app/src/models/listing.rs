// app/src/models/listing.rs

use chrono::{DateTime, Utc};
use estate::{
  model::{Booking, Listing},
  EstateError, EstateResult, GeoPoint,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Column list shared by every listing query, in `ListingRow` order.
pub const LISTING_COLUMNS: &str = "id, title, description, price, city, bhk, area_name, lng, lat, image, images, \
                                   available, owner_id, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
  pub id: Uuid,
  pub title: String,
  pub description: String,
  pub price: f64,
  pub city: String,
  pub bhk: Option<i32>,
  pub area_name: Option<String>,
  pub lng: Option<f64>,
  pub lat: Option<f64>,
  pub image: String,
  pub images: Vec<String>,
  pub available: bool,
  pub owner_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl ListingRow {
  pub fn into_listing(self, bookings: Vec<Booking>) -> EstateResult<Listing> {
    let location = match (self.lng, self.lat) {
      (Some(lng), Some(lat)) => Some(GeoPoint::new(lng, lat)?),
      _ => None,
    };
    let bhk = self
      .bhk
      .map(u32::try_from)
      .transpose()
      .map_err(|_| EstateError::Internal(format!("Negative bhk stored for listing {}", self.id)))?;
    Ok(Listing {
      id: self.id,
      title: self.title,
      description: self.description,
      price: self.price,
      city: self.city,
      bhk,
      area_name: self.area_name,
      location,
      image: self.image,
      images: self.images,
      available: self.available,
      bookings,
      owner_id: self.owner_id,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}

/// Bedroom counts are stored as Postgres `integer`.
pub fn bhk_column(listing: &Listing) -> EstateResult<Option<i32>> {
  listing
    .bhk
    .map(i32::try_from)
    .transpose()
    .map_err(|_| EstateError::validation("bhk is out of range."))
}
