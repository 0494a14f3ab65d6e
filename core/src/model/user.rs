// core/src/model/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::EstateError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing, default)] // Never send the hash to a client
  pub password_hash: String,
  #[serde(default)]
  pub notifications: Vec<Notification>,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn summary(&self) -> OwnerSummary {
    OwnerSummary {
      id: self.id,
      name: self.name.clone(),
      email: self.email.clone(),
    }
  }
}

/// Insert payload for a user store. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name: String,
  pub email: String,
  pub password_hash: String,
}

/// Public owner details attached to a listing read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
  pub id: Uuid,
  pub name: String,
  pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
  Inquiry,
  Booking,
}

impl NotificationKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      NotificationKind::Inquiry => "inquiry",
      NotificationKind::Booking => "booking",
    }
  }
}

impl fmt::Display for NotificationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for NotificationKind {
  type Err = EstateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "inquiry" => Ok(NotificationKind::Inquiry),
      "booking" => Ok(NotificationKind::Booking),
      other => Err(EstateError::Internal(format!("Unknown notification kind '{other}'"))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub id: Uuid,
  pub message: String,
  #[serde(rename = "type")]
  pub kind: NotificationKind,
  #[serde(default)]
  pub link: String,
  #[serde(default)]
  pub read: bool,
  pub created_at: DateTime<Utc>,
}

/// What a side-effecting action wants to tell a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
  pub message: String,
  pub kind: NotificationKind,
  pub link: String,
}

impl NewNotification {
  pub fn into_notification(self, at: DateTime<Utc>) -> Notification {
    Notification {
      id: Uuid::new_v4(),
      message: self.message,
      kind: self.kind,
      link: self.link,
      read: false,
      created_at: at,
    }
  }
}
