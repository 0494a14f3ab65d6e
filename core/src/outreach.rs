// core/src/outreach.rs

//! Visitor-to-owner outreach: contact requests and viewing bookings.
//!
//! Both flows mail the listing owner first. A mail failure aborts the action.
//! Once the mail is out, the owner is notified through the [`NotificationQueue`],
//! which can never fail the request.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{EstateError, EstateResult};
use crate::model::{Booking, Listing, NewNotification, NotificationKind, User};
use crate::notify::NotificationQueue;
use crate::store::{ListingStore, UserStore};

/// A plain-text message to a listing owner. The sender address is the mailer's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
  pub to: String,
  pub reply_to: String,
  pub subject: String,
  pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, email: OutboundEmail) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
  pub name: Option<String>,
  pub email: Option<String>,
  pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
  pub name: Option<String>,
  pub email: Option<String>,
  pub date: Option<String>,
  pub time: Option<String>,
  pub message: Option<String>,
}

#[derive(Clone)]
pub struct OutreachService {
  listings: Arc<dyn ListingStore>,
  users: Arc<dyn UserStore>,
  mailer: Arc<dyn Mailer>,
  notifications: NotificationQueue,
}

impl OutreachService {
  pub fn new(
    listings: Arc<dyn ListingStore>,
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    notifications: NotificationQueue,
  ) -> Self {
    Self {
      listings,
      users,
      mailer,
      notifications,
    }
  }

  #[instrument(name = "outreach::contact", skip(self, request), err(Display))]
  pub async fn contact(&self, listing_id: Uuid, request: ContactRequest) -> EstateResult<()> {
    let (Some(name), Some(email), Some(message)) = (
      filled(request.name),
      filled(request.email),
      filled(request.message),
    ) else {
      return Err(EstateError::validation("All fields are required."));
    };

    let (listing, owner) = self.listing_with_owner(listing_id).await?;

    self
      .deliver(OutboundEmail {
        to: owner.email.clone(),
        reply_to: email.clone(),
        subject: format!("New inquiry for your property: {}", listing.title),
        text: format!(
          "You have received a new inquiry for your property.\n\nFrom: {name} <{email}>\n\nMessage:\n{message}"
        ),
      })
      .await?;

    self.notifications.enqueue(
      owner.id,
      NewNotification {
        message: format!("You received a new inquiry for \"{}\" from {}.", listing.title, name),
        kind: NotificationKind::Inquiry,
        link: listing_link(&listing),
      },
    );
    info!(owner_id = %owner.id, "Inquiry sent to property owner.");
    Ok(())
  }

  #[instrument(name = "outreach::book", skip(self, request), err(Display))]
  pub async fn book(&self, listing_id: Uuid, request: BookingRequest) -> EstateResult<Booking> {
    let (Some(name), Some(email), Some(date)) = (
      filled(request.name),
      filled(request.email),
      filled(request.date),
    ) else {
      return Err(EstateError::validation("Name, email, and date are required."));
    };
    let time = filled(request.time);
    let message = filled(request.message);

    let (listing, owner) = self.listing_with_owner(listing_id).await?;

    self
      .deliver(OutboundEmail {
        to: owner.email.clone(),
        reply_to: email.clone(),
        subject: format!("New booking request for your property: {}", listing.title),
        text: format!(
          "You have received a new booking request for your property.\n\nFrom: {name} <{email}>\nDate: {date}\nTime: {}\n\nMessage:\n{}",
          time.as_deref().unwrap_or("Not specified"),
          message.as_deref().unwrap_or("No additional message"),
        ),
      })
      .await?;

    let booking = Booking {
      id: Uuid::new_v4(),
      name: name.clone(),
      email,
      date: date.clone(),
      time,
      message,
      created_at: Utc::now(),
    };
    if !self.listings.add_booking(listing.id, booking.clone()).await? {
      return Err(EstateError::not_found("listing", listing.id));
    }

    self.notifications.enqueue(
      owner.id,
      NewNotification {
        message: format!(
          "You received a new booking request for \"{}\" from {} on {}.",
          listing.title, name, date
        ),
        kind: NotificationKind::Booking,
        link: listing_link(&listing),
      },
    );
    info!(owner_id = %owner.id, booking_id = %booking.id, "Booking request sent to property owner.");
    Ok(booking)
  }

  async fn listing_with_owner(&self, listing_id: Uuid) -> EstateResult<(Listing, User)> {
    let listing = self.listings.find_by_id(listing_id).await?;
    let owner = match &listing {
      Some(l) => self.users.find_by_id(l.owner_id).await?,
      None => None,
    };
    match (listing, owner) {
      (Some(listing), Some(owner)) if !owner.email.trim().is_empty() => Ok((listing, owner)),
      _ => {
        warn!(%listing_id, "Listing or its owner could not be resolved.");
        Err(EstateError::not_found("property owner", listing_id))
      }
    }
  }

  async fn deliver(&self, email: OutboundEmail) -> EstateResult<()> {
    self.mailer.send(email).await.map_err(|source| {
      warn!(error = %source, "Owner email could not be sent.");
      EstateError::Mail { source }
    })
  }
}

fn listing_link(listing: &Listing) -> String {
  format!("/property/{}", listing.id)
}

fn filled(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
