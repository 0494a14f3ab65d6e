// app/src/models/user.rs

use chrono::{DateTime, Utc};
use estate::model::{Notification, User};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

impl UserRow {
  pub fn into_user(self, notifications: Vec<Notification>) -> User {
    User {
      id: self.id,
      name: self.name,
      email: self.email,
      password_hash: self.password_hash,
      notifications,
      created_at: self.created_at,
    }
  }
}
