// core/src/model/mod.rs

//! Listing and user records as the rest of the crate sees them.

pub mod listing;
pub mod user;

pub use listing::{Booking, Listing, ListingPatch, ListingView, NewListing};
pub use user::{NewNotification, NewUser, Notification, NotificationKind, OwnerSummary, User};

/// Deserializers for write payloads that accept either a JSON number or a numeric
/// string, which is what HTML form clients tend to send. Blank text is absent;
/// any other text that is not a number is rejected.
pub(crate) mod lenient {
  use serde::{de, Deserialize, Deserializer};

  use crate::query::{parse_number, whole_count};

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum NumberOrText {
    Number(f64),
    Text(String),
  }

  fn number<E: de::Error>(raw: NumberOrText) -> Result<Option<f64>, E> {
    match raw {
      NumberOrText::Number(n) => Ok(Some(n)),
      NumberOrText::Text(s) if s.trim().is_empty() => Ok(None),
      NumberOrText::Text(s) => parse_number(Some(&s))
        .map(Some)
        .ok_or_else(|| E::custom(format!("expected a number, found {s:?}"))),
    }
  }

  pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
  where
    D: Deserializer<'de>,
  {
    match Option::<NumberOrText>::deserialize(deserializer)? {
      Some(raw) => number(raw),
      None => Ok(None),
    }
  }

  pub fn u32_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
  where
    D: Deserializer<'de>,
  {
    let Some(raw) = Option::<NumberOrText>::deserialize(deserializer)? else {
      return Ok(None);
    };
    match number::<D::Error>(raw)? {
      Some(n) => whole_count(n)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("expected a whole, non-negative count, found {n}"))),
      None => Ok(None),
    }
  }
}
