// core/src/geo.rs

//! Geographic points, great-circle distance and the bounding box used to
//! prefilter "nearest within radius" queries.
//!
//! Points travel on the wire as GeoJSON: `{"type": "Point", "coordinates": [lng, lat]}`.
//! Longitude comes first.

use crate::error::{EstateError, EstateResult};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Radius applied when the caller asks for nearby suggestions without a usable radius.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
  lng: f64,
  lat: f64,
}

impl GeoPoint {
  /// Builds a point from (longitude, latitude), rejecting non-finite or out-of-range values.
  pub fn new(lng: f64, lat: f64) -> EstateResult<Self> {
    if !lng.is_finite() || !lat.is_finite() {
      return Err(EstateError::validation("Coordinates must be finite numbers."));
    }
    if !(-180.0..=180.0).contains(&lng) {
      return Err(EstateError::validation(format!("Longitude {lng} is outside [-180, 180].")));
    }
    if !(-90.0..=90.0).contains(&lat) {
      return Err(EstateError::validation(format!("Latitude {lat} is outside [-90, 90].")));
    }
    Ok(Self { lng, lat })
  }

  pub fn lng(&self) -> f64 {
    self.lng
  }

  pub fn lat(&self) -> f64 {
    self.lat
  }

  /// Haversine distance in metres.
  pub fn distance_m(&self, other: &GeoPoint) -> f64 {
    let lat1 = self.lat.to_radians();
    let lat2 = other.lat.to_radians();
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlng = (other.lng - self.lng).to_radians() / 2.0;

    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlng.sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
  }
}

/// GeoJSON wire shape. `type` may be omitted but must be "Point" when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeoJsonPoint {
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  kind: Option<String>,
  coordinates: Vec<f64>,
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
  type Error = EstateError;

  fn try_from(raw: GeoJsonPoint) -> Result<Self, Self::Error> {
    if let Some(kind) = raw.kind.as_deref() {
      if kind != "Point" {
        return Err(EstateError::validation(format!(
          "Unsupported geometry type '{kind}', expected 'Point'."
        )));
      }
    }
    match raw.coordinates.as_slice() {
      [lng, lat] => GeoPoint::new(*lng, *lat),
      other => Err(EstateError::validation(format!(
        "A point needs exactly two coordinates [lng, lat], got {}.",
        other.len()
      ))),
    }
  }
}

impl From<GeoPoint> for GeoJsonPoint {
  fn from(point: GeoPoint) -> Self {
    GeoJsonPoint {
      kind: Some("Point".to_string()),
      coordinates: vec![point.lng, point.lat],
    }
  }
}

/// Search radius, always expressed in kilometres by callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusKm(f64);

impl RadiusKm {
  /// Anything that is not a finite, strictly positive number falls back to [`DEFAULT_RADIUS_KM`].
  pub fn or_default(km: Option<f64>) -> Self {
    match km {
      Some(km) if km.is_finite() && km > 0.0 => RadiusKm(km),
      _ => RadiusKm(DEFAULT_RADIUS_KM),
    }
  }

  pub fn km(&self) -> f64 {
    self.0
  }

  pub fn meters(&self) -> f64 {
    self.0 * 1000.0
  }
}

/// A "nearest first within `max_distance_m`" request against a listing store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
  pub center: GeoPoint,
  pub max_distance_m: f64,
}

impl NearbyQuery {
  pub fn new(center: GeoPoint, radius: RadiusKm) -> Self {
    Self {
      center,
      max_distance_m: radius.meters(),
    }
  }

  pub fn bounding_box(&self) -> BoundingBox {
    BoundingBox::around(self.center, self.max_distance_m)
  }
}

/// Lat/lng rectangle that fully contains a circle on the sphere.
///
/// When the circle touches a pole or crosses the antimeridian the longitude
/// span widens to the full [-180, 180] range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  pub min_lat: f64,
  pub max_lat: f64,
  pub min_lng: f64,
  pub max_lng: f64,
}

impl BoundingBox {
  pub fn around(center: GeoPoint, radius_m: f64) -> Self {
    let angular = radius_m.max(0.0) / EARTH_RADIUS_M;
    let dlat = angular.to_degrees();
    let min_lat = center.lat - dlat;
    let max_lat = center.lat + dlat;

    if min_lat <= -90.0 || max_lat >= 90.0 || angular >= std::f64::consts::FRAC_PI_2 {
      return Self {
        min_lat: min_lat.max(-90.0),
        max_lat: max_lat.min(90.0),
        min_lng: -180.0,
        max_lng: 180.0,
      };
    }

    let dlng = (angular.sin() / center.lat.to_radians().cos()).min(1.0).asin().to_degrees();
    let (min_lng, max_lng) = (center.lng - dlng, center.lng + dlng);
    if min_lng < -180.0 || max_lng > 180.0 {
      return Self {
        min_lat,
        max_lat,
        min_lng: -180.0,
        max_lng: 180.0,
      };
    }

    Self {
      min_lat,
      max_lat,
      min_lng,
      max_lng,
    }
  }

  pub fn contains(&self, point: &GeoPoint) -> bool {
    (self.min_lat..=self.max_lat).contains(&point.lat) && (self.min_lng..=self.max_lng).contains(&point.lng)
  }
}
