// app/src/models/notification.rs

use chrono::{DateTime, Utc};
use estate::{model::Notification, EstateResult};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub message: String,
  pub kind: String,
  pub link: String,
  pub read: bool,
  pub created_at: DateTime<Utc>,
}

impl NotificationRow {
  pub fn into_notification(self) -> EstateResult<Notification> {
    Ok(Notification {
      id: self.id,
      message: self.message,
      kind: self.kind.parse()?,
      link: self.link,
      read: self.read,
      created_at: self.created_at,
    })
  }
}
