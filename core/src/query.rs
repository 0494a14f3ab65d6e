// core/src/query.rs

//! Translation of raw search parameters into a structured listing filter.
//!
//! Parameters arrive as the untyped strings a browser puts in a query string.
//! A numeric parameter that does not parse is treated as absent, never as an error.

use serde::Deserialize;

use crate::geo::{GeoPoint, RadiusKm};
use crate::model::Listing;

/// Query parameters accepted by the listing search. Names are case-sensitive on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  pub city: Option<String>,
  pub min_price: Option<String>,
  pub max_price: Option<String>,
  pub bhk: Option<String>,
  pub area: Option<String>,
  pub suggest_nearby: Option<String>,
  pub lat: Option<String>,
  pub lng: Option<String>,
  pub radius_km: Option<String>,
}

impl SearchParams {
  pub fn literal_filter(&self) -> ListingFilter {
    ListingFilter {
      city: non_blank(self.city.as_deref()),
      area: non_blank(self.area.as_deref()),
      bhk: parse_number(self.bhk.as_deref()),
      price: PriceRange {
        min: parse_number(self.min_price.as_deref()),
        max: parse_number(self.max_price.as_deref()),
      },
    }
  }

  /// Only the literal string "true" turns the fallback on.
  pub fn wants_nearby(&self) -> bool {
    self.suggest_nearby.as_deref() == Some("true")
  }

  /// The caller's position, when both coordinates parse and are in range.
  pub fn center(&self) -> Option<GeoPoint> {
    let lat = parse_number(self.lat.as_deref())?;
    let lng = parse_number(self.lng.as_deref())?;
    GeoPoint::new(lng, lat).ok()
  }

  pub fn radius(&self) -> RadiusKm {
    RadiusKm::or_default(parse_number(self.radius_km.as_deref()))
  }
}

/// Inclusive price bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
  pub min: Option<f64>,
  pub max: Option<f64>,
}

impl PriceRange {
  pub fn contains(&self, price: f64) -> bool {
    self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
  }

  pub fn is_unbounded(&self) -> bool {
    self.min.is_none() && self.max.is_none()
  }
}

/// Literal (non-geographic) predicates. All supplied predicates must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
  /// Case-insensitive substring of the listing's city.
  pub city: Option<String>,
  /// Case-insensitive substring of the listing's area name.
  pub area: Option<String>,
  /// Exact bedroom count. A fractional or negative count matches no listing.
  pub bhk: Option<f64>,
  pub price: PriceRange,
}

impl ListingFilter {
  pub fn matches(&self, listing: &Listing) -> bool {
    if let Some(city) = &self.city {
      if !contains_ignore_case(&listing.city, city) {
        return false;
      }
    }
    if let Some(area) = &self.area {
      match &listing.area_name {
        Some(name) if contains_ignore_case(name, area) => {}
        _ => return false,
      }
    }
    if let Some(bhk) = self.bhk {
      if listing.bhk.map(f64::from) != Some(bhk) {
        return false;
      }
    }
    self.price.contains(listing.price)
  }

  pub fn is_unrestricted(&self) -> bool {
    self.city.is_none() && self.area.is_none() && self.bhk.is_none() && self.price.is_unbounded()
  }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_blank(raw: Option<&str>) -> Option<String> {
  raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Parses a finite number. Blank, non-numeric, NaN and infinities are absent.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
  let trimmed = raw?.trim();
  if trimmed.is_empty() {
    return None;
  }
  trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A non-negative whole count such as a bedroom number. `2.0` is accepted, `2.5` is not.
pub fn whole_count(n: f64) -> Option<u32> {
  if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
    Some(n as u32)
  } else {
    None
  }
}
