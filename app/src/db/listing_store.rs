// app/src/db/listing_store.rs

use async_trait::async_trait;
use estate::{
  geo::EARTH_RADIUS_M,
  model::{Booking, Listing},
  query::whole_count,
  EstateResult, ListingFilter, ListingStore, NearbyQuery,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{like_pattern, store_err};
use crate::models::listing::{bhk_column, ListingRow, LISTING_COLUMNS};
use crate::models::BookingRow;

#[derive(Clone)]
pub struct PgListingStore {
  pool: PgPool,
}

impl PgListingStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn bookings_for(&self, listing_ids: &[Uuid]) -> EstateResult<HashMap<Uuid, Vec<Booking>>> {
    if listing_ids.is_empty() {
      return Ok(HashMap::new());
    }
    let rows: Vec<BookingRow> = sqlx::query_as(
      "SELECT id, listing_id, name, email, date, time, message, created_at \
       FROM bookings WHERE listing_id = ANY($1) ORDER BY seq",
    )
    .bind(listing_ids)
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("load_bookings"))?;

    let mut grouped: HashMap<Uuid, Vec<Booking>> = HashMap::new();
    for row in rows {
      grouped.entry(row.listing_id).or_default().push(row.into());
    }
    Ok(grouped)
  }

  /// Attaches bookings and converts rows, keeping the row order.
  async fn hydrate(&self, rows: Vec<ListingRow>) -> EstateResult<Vec<Listing>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut bookings = self.bookings_for(&ids).await?;
    rows
      .into_iter()
      .map(|row| {
        let own = bookings.remove(&row.id).unwrap_or_default();
        row.into_listing(own)
      })
      .collect()
  }

  async fn fetch(&self, mut builder: QueryBuilder<'_, Postgres>, operation: &'static str) -> EstateResult<Vec<Listing>> {
    let rows: Vec<ListingRow> = builder
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(store_err(operation))?;
    self.hydrate(rows).await
  }
}

fn select_listings<'a>() -> QueryBuilder<'a, Postgres> {
  QueryBuilder::new(format!("SELECT {LISTING_COLUMNS} FROM listings WHERE TRUE"))
}

#[async_trait]
impl ListingStore for PgListingStore {
  #[instrument(name = "pg_listing_store::insert", skip_all, fields(listing_id = %listing.id))]
  async fn insert(&self, listing: Listing) -> EstateResult<Listing> {
    let bhk = bhk_column(&listing)?;
    let row: ListingRow = sqlx::query_as(&format!(
      "INSERT INTO listings (id, title, description, price, city, bhk, area_name, lng, lat, image, images, \
       available, owner_id, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
       RETURNING {LISTING_COLUMNS}"
    ))
    .bind(listing.id)
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price)
    .bind(&listing.city)
    .bind(bhk)
    .bind(&listing.area_name)
    .bind(listing.location.map(|p| p.lng()))
    .bind(listing.location.map(|p| p.lat()))
    .bind(&listing.image)
    .bind(&listing.images)
    .bind(listing.available)
    .bind(listing.owner_id)
    .bind(listing.created_at)
    .bind(listing.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(store_err("insert_listing"))?;
    row.into_listing(Vec::new())
  }

  async fn find_by_id(&self, id: Uuid) -> EstateResult<Option<Listing>> {
    let row: Option<ListingRow> = sqlx::query_as(&format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_err("find_listing"))?;
    match row {
      Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
      None => Ok(None),
    }
  }

  #[instrument(name = "pg_listing_store::find_matching", skip(self), level = "debug")]
  async fn find_matching(&self, filter: &ListingFilter) -> EstateResult<Vec<Listing>> {
    let mut builder = select_listings();
    if let Some(city) = &filter.city {
      builder.push(" AND city ILIKE ").push_bind(like_pattern(city));
    }
    if let Some(area) = &filter.area {
      builder.push(" AND area_name ILIKE ").push_bind(like_pattern(area));
    }
    if let Some(bhk) = filter.bhk {
      // Fractional, negative or oversized counts cannot match any stored row.
      let Some(bhk) = whole_count(bhk).and_then(|n| i32::try_from(n).ok()) else {
        debug!(bhk, "Bedroom count matches no listing.");
        return Ok(Vec::new());
      };
      builder.push(" AND bhk = ").push_bind(bhk);
    }
    if let Some(min) = filter.price.min {
      builder.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.price.max {
      builder.push(" AND price <= ").push_bind(max);
    }
    builder.push(" ORDER BY seq");
    let found = self.fetch(builder, "find_matching").await?;
    debug!(count = found.len(), "Literal filter evaluated in Postgres.");
    Ok(found)
  }

  #[instrument(name = "pg_listing_store::find_near", skip(self), level = "debug")]
  async fn find_near(&self, query: &NearbyQuery) -> EstateResult<Vec<Listing>> {
    let bbox = query.bounding_box();
    let (lat, lng) = (query.center.lat(), query.center.lng());

    let mut builder = QueryBuilder::new(format!("SELECT {LISTING_COLUMNS} FROM (SELECT *, 2 * "));
    builder
      .push_bind(EARTH_RADIUS_M)
      .push(" * asin(least(1, sqrt(power(sin(radians(lat - ")
      .push_bind(lat)
      .push(") / 2), 2) + cos(radians(")
      .push_bind(lat)
      .push(")) * cos(radians(lat)) * power(sin(radians(lng - ")
      .push_bind(lng)
      .push(") / 2), 2)))) AS distance_m FROM listings WHERE lat IS NOT NULL AND lng IS NOT NULL")
      .push(" AND lat BETWEEN ")
      .push_bind(bbox.min_lat)
      .push(" AND ")
      .push_bind(bbox.max_lat)
      .push(" AND lng BETWEEN ")
      .push_bind(bbox.min_lng)
      .push(" AND ")
      .push_bind(bbox.max_lng)
      .push(") AS candidates WHERE distance_m <= ")
      .push_bind(query.max_distance_m)
      .push(" ORDER BY distance_m, seq");

    self.fetch(builder, "find_near").await
  }

  async fn find_by_owner(&self, owner_id: Uuid) -> EstateResult<Vec<Listing>> {
    let mut builder = select_listings();
    builder.push(" AND owner_id = ").push_bind(owner_id).push(" ORDER BY seq");
    self.fetch(builder, "find_by_owner").await
  }

  #[instrument(name = "pg_listing_store::update", skip_all, fields(listing_id = %listing.id))]
  async fn update(&self, listing: &Listing) -> EstateResult<Option<Listing>> {
    let bhk = bhk_column(listing)?;
    let row: Option<ListingRow> = sqlx::query_as(&format!(
      "UPDATE listings SET title = $2, description = $3, price = $4, city = $5, bhk = $6, area_name = $7, \
       lng = $8, lat = $9, image = $10, images = $11, available = $12, updated_at = $13 \
       WHERE id = $1 RETURNING {LISTING_COLUMNS}"
    ))
    .bind(listing.id)
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price)
    .bind(&listing.city)
    .bind(bhk)
    .bind(&listing.area_name)
    .bind(listing.location.map(|p| p.lng()))
    .bind(listing.location.map(|p| p.lat()))
    .bind(&listing.image)
    .bind(&listing.images)
    .bind(listing.available)
    .bind(listing.updated_at)
    .fetch_optional(&self.pool)
    .await
    .map_err(store_err("update_listing"))?;
    match row {
      Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
      None => Ok(None),
    }
  }

  async fn delete(&self, id: Uuid) -> EstateResult<bool> {
    let result = sqlx::query("DELETE FROM listings WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(store_err("delete_listing"))?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "pg_listing_store::add_booking", skip(self, booking), fields(booking_id = %booking.id))]
  async fn add_booking(&self, listing_id: Uuid, booking: Booking) -> EstateResult<bool> {
    let mut tx = self.pool.begin().await.map_err(store_err("add_booking"))?;
    let touched = sqlx::query("UPDATE listings SET updated_at = now() WHERE id = $1")
      .bind(listing_id)
      .execute(&mut *tx)
      .await
      .map_err(store_err("add_booking"))?;
    if touched.rows_affected() == 0 {
      return Ok(false);
    }
    sqlx::query(
      "INSERT INTO bookings (id, listing_id, name, email, date, time, message, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(booking.id)
    .bind(listing_id)
    .bind(&booking.name)
    .bind(&booking.email)
    .bind(&booking.date)
    .bind(&booking.time)
    .bind(&booking.message)
    .bind(booking.created_at)
    .execute(&mut *tx)
    .await
    .map_err(store_err("add_booking"))?;
    tx.commit().await.map_err(store_err("add_booking"))?;
    Ok(true)
  }
}
