// core/src/listings.rs

//! Ownership-checked listing operations.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{EstateError, EstateResult};
use crate::model::{Listing, ListingPatch, ListingView, NewListing};
use crate::store::{ListingStore, UserStore};

#[derive(Clone)]
pub struct ListingService {
  listings: Arc<dyn ListingStore>,
  users: Arc<dyn UserStore>,
}

impl ListingService {
  pub fn new(listings: Arc<dyn ListingStore>, users: Arc<dyn UserStore>) -> Self {
    Self { listings, users }
  }

  /// Validates the payload and stores a new listing owned by `owner_id`.
  #[instrument(name = "listings::create", skip(self, input), fields(owner_id = %owner_id), err(Display))]
  pub async fn create(&self, owner_id: Uuid, input: NewListing) -> EstateResult<Listing> {
    let title = required_text(input.title, "title")?;
    let description = required_text(input.description, "description")?;
    let city = required_text(input.city, "city")?;
    let price = input.price.ok_or_else(|| EstateError::validation("price is required."))?;
    ensure_positive_price(price)?;

    let now = Utc::now();
    let listing = Listing {
      id: Uuid::new_v4(),
      title,
      description,
      price,
      city,
      bhk: input.bhk,
      area_name: optional_text(input.area_name),
      location: input.location,
      image: primary_image(input.uploaded_image, input.image),
      images: clean_images(input.images),
      available: input.available.unwrap_or(true),
      bookings: Vec::new(),
      owner_id,
      created_at: now,
      updated_at: now,
    };

    let stored = self.listings.insert(listing).await?;
    info!(listing_id = %stored.id, "Listing created.");
    Ok(stored)
  }

  /// Public read. The owner's public details are attached when the owner still exists.
  #[instrument(name = "listings::get", skip(self), err(Display))]
  pub async fn get(&self, id: Uuid) -> EstateResult<ListingView> {
    let listing = self
      .listings
      .find_by_id(id)
      .await?
      .ok_or_else(|| EstateError::not_found("listing", id))?;
    let owner = self.users.find_by_id(listing.owner_id).await?.map(|u| u.summary());
    if owner.is_none() {
      warn!(owner_id = %listing.owner_id, "Listing owner no longer exists.");
    }
    Ok(ListingView { listing, owner })
  }

  #[instrument(name = "listings::mine", skip(self), err(Display))]
  pub async fn mine(&self, owner_id: Uuid) -> EstateResult<Vec<Listing>> {
    self.listings.find_by_owner(owner_id).await
  }

  #[instrument(name = "listings::update", skip(self, patch), err(Display))]
  pub async fn update(&self, caller: Uuid, id: Uuid, patch: ListingPatch) -> EstateResult<Listing> {
    let current = self.load_owned(caller, id).await?;
    let next = apply_patch(current, patch)?;
    let stored = self
      .listings
      .update(&next)
      .await?
      .ok_or_else(|| EstateError::not_found("listing", id))?;
    info!(listing_id = %id, "Listing updated.");
    Ok(stored)
  }

  #[instrument(name = "listings::delete", skip(self), err(Display))]
  pub async fn delete(&self, caller: Uuid, id: Uuid) -> EstateResult<()> {
    self.load_owned(caller, id).await?;
    if !self.listings.delete(id).await? {
      return Err(EstateError::not_found("listing", id));
    }
    info!(listing_id = %id, "Listing deleted.");
    Ok(())
  }

  /// Missing listings are `NotFound`; listings owned by someone else are `Forbidden`.
  async fn load_owned(&self, caller: Uuid, id: Uuid) -> EstateResult<Listing> {
    let listing = self
      .listings
      .find_by_id(id)
      .await?
      .ok_or_else(|| EstateError::not_found("listing", id))?;
    if !listing.is_owned_by(caller) {
      warn!(listing_id = %id, caller = %caller, owner = %listing.owner_id, "Ownership check failed.");
      return Err(EstateError::Forbidden {
        entity: "listing",
        id: id.to_string(),
        caller: caller.to_string(),
      });
    }
    Ok(listing)
  }
}

/// An uploaded file wins over a supplied URL; neither gives an empty reference.
pub fn primary_image(uploaded: Option<String>, url: Option<String>) -> String {
  uploaded
    .and_then(|p| optional_text(Some(p)))
    .or_else(|| optional_text(url))
    .unwrap_or_default()
}

fn apply_patch(mut listing: Listing, patch: ListingPatch) -> EstateResult<Listing> {
  if let Some(title) = patch.title {
    listing.title = required_text(Some(title), "title")?;
  }
  if let Some(description) = patch.description {
    listing.description = required_text(Some(description), "description")?;
  }
  if let Some(city) = patch.city {
    listing.city = required_text(Some(city), "city")?;
  }
  if let Some(price) = patch.price {
    ensure_positive_price(price)?;
    listing.price = price;
  }
  if let Some(bhk) = patch.bhk {
    listing.bhk = Some(bhk);
  }
  if let Some(area) = patch.area_name {
    listing.area_name = optional_text(Some(area));
  }
  if let Some(location) = patch.location {
    listing.location = Some(location);
  }
  if let Some(image) = patch.image {
    listing.image = image.trim().to_string();
  }
  if let Some(images) = patch.images {
    listing.images = clean_images(images);
  }
  if let Some(available) = patch.available {
    listing.available = available;
  }
  listing.updated_at = Utc::now();
  Ok(listing)
}

fn ensure_positive_price(price: f64) -> EstateResult<()> {
  if price.is_finite() && price > 0.0 {
    Ok(())
  } else {
    Err(EstateError::validation("price must be a positive number."))
  }
}

fn required_text(value: Option<String>, field: &str) -> EstateResult<String> {
  optional_text(value).ok_or_else(|| EstateError::validation(format!("{field} is required.")))
}

fn optional_text(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn clean_images(images: Vec<String>) -> Vec<String> {
  images.into_iter().filter_map(|i| optional_text(Some(i))).collect()
}
