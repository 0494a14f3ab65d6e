// app/src/models/booking.rs

use chrono::{DateTime, Utc};
use estate::model::Booking;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
  pub id: Uuid,
  pub listing_id: Uuid,
  pub name: String,
  pub email: String,
  pub date: String,
  pub time: Option<String>,
  pub message: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
  fn from(row: BookingRow) -> Self {
    Booking {
      id: row.id,
      name: row.name,
      email: row.email,
      date: row.date,
      time: row.time,
      message: row.message,
      created_at: row.created_at,
    }
  }
}
