// core/src/search.rs

//! Listing search with a nearby fallback.
//!
//! The literal filter runs first. Only when it finds nothing *and* the caller
//! asked for nearby suggestions with a usable position does a second, radius
//! based query run. The outcome records which path produced the listings so the
//! transport layer can flag suggested results out of band.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::EstateResult;
use crate::geo::NearbyQuery;
use crate::model::Listing;
use crate::query::SearchParams;
use crate::store::ListingStore;

/// Which query produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
  /// The literal filter (possibly with zero matches).
  Direct,
  /// The radius fallback.
  Suggested,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
  pub listings: Vec<Listing>,
  pub source: ResultSource,
}

impl SearchOutcome {
  fn direct(listings: Vec<Listing>) -> Self {
    Self {
      listings,
      source: ResultSource::Direct,
    }
  }

  pub fn is_suggested(&self) -> bool {
    self.source == ResultSource::Suggested
  }
}

#[derive(Clone)]
pub struct SearchResolver {
  store: Arc<dyn ListingStore>,
}

impl SearchResolver {
  pub fn new(store: Arc<dyn ListingStore>) -> Self {
    Self { store }
  }

  /// Any store failure is returned as-is; there is no partial result.
  #[instrument(name = "search::resolve", skip(self), err(Display))]
  pub async fn resolve(&self, params: &SearchParams) -> EstateResult<SearchOutcome> {
    let filter = params.literal_filter();
    debug!(?filter, "Running literal listing filter.");
    let direct = self.store.find_matching(&filter).await?;

    if !direct.is_empty() || !params.wants_nearby() {
      debug!(count = direct.len(), "Returning literal filter result.");
      return Ok(SearchOutcome::direct(direct));
    }

    let Some(center) = params.center() else {
      debug!("Nearby suggestions requested without usable coordinates.");
      return Ok(SearchOutcome::direct(Vec::new()));
    };

    let nearby = NearbyQuery::new(center, params.radius());
    let suggested = self.store.find_near(&nearby).await?;
    info!(
      count = suggested.len(),
      lat = center.lat(),
      lng = center.lng(),
      max_distance_m = nearby.max_distance_m,
      "Literal filter empty; returning nearby suggestions."
    );
    Ok(SearchOutcome {
      listings: suggested,
      source: ResultSource::Suggested,
    })
  }
}
