// tests/outreach_tests.rs
mod common;
use common::*;
use estate::{
  model::{Listing, NotificationKind, User},
  BookingRequest, ContactRequest, EstateError, ListingStore, Mailer, MemoryListingStore, MemoryUserStore,
  NotificationQueue, OutreachService, UserStore,
};
use std::sync::Arc;
use uuid::Uuid;

struct Fixture {
  service: OutreachService,
  queue: NotificationQueue,
  listings: Arc<MemoryListingStore>,
  users: Arc<MemoryUserStore>,
  owner: User,
  listing: Listing,
}

async fn fixture_with(mailer: Arc<dyn Mailer>) -> Fixture {
  setup_tracing();
  let users = Arc::new(MemoryUserStore::new());
  let owner = register(&users, "Asha", "asha@example.com").await;
  let listing = ListingBuilder::new("Pune", 18000.0).owner(owner.id).build();
  let listings = seeded_store(vec![listing.clone()]).await;
  let (queue, _worker) = NotificationQueue::spawn(users.clone());
  Fixture {
    service: OutreachService::new(listings.clone(), users.clone(), mailer, queue.clone()),
    queue,
    listings,
    users,
    owner,
    listing,
  }
}

fn contact_request() -> ContactRequest {
  ContactRequest {
    name: Some("Ravi".to_string()),
    email: Some("ravi@example.com".to_string()),
    message: Some("Is parking included?".to_string()),
  }
}

fn booking_request() -> BookingRequest {
  BookingRequest {
    name: Some("Ravi".to_string()),
    email: Some("ravi@example.com".to_string()),
    date: Some("2024-07-01".to_string()),
    time: None,
    message: None,
  }
}

#[tokio::test]
async fn test_contact_mails_owner_and_notifies() {
  let mailer = Arc::new(RecordingMailer::default());
  let fx = fixture_with(mailer.clone()).await;

  fx.service.contact(fx.listing.id, contact_request()).await.unwrap();

  let sent = mailer.sent.lock().clone();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].to, "asha@example.com");
  assert_eq!(sent[0].reply_to, "ravi@example.com");
  assert_eq!(sent[0].subject, format!("New inquiry for your property: {}", fx.listing.title));
  assert!(sent[0].text.contains("From: Ravi <ravi@example.com>"));
  assert!(sent[0].text.contains("Is parking included?"));

  fx.queue.flush().await;
  let notes = fx.users.notifications(fx.owner.id).await.unwrap().unwrap();
  assert_eq!(notes.len(), 1);
  assert_eq!(notes[0].kind, NotificationKind::Inquiry);
  assert_eq!(notes[0].link, format!("/property/{}", fx.listing.id));
  assert!(notes[0].message.contains("Ravi"));
  assert!(!notes[0].read);
}

#[tokio::test]
async fn test_contact_requires_all_fields() {
  let mailer = Arc::new(RecordingMailer::default());
  let fx = fixture_with(mailer.clone()).await;

  let cases = [
    ContactRequest { name: None, ..contact_request() },
    ContactRequest { email: Some(" ".to_string()), ..contact_request() },
    ContactRequest { message: None, ..contact_request() },
  ];
  for request in cases {
    let err = fx.service.contact(fx.listing.id, request).await.unwrap_err();
    assert!(matches!(err, EstateError::Validation(ref m) if m == "All fields are required."), "{err:?}");
  }
  assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_contact_unknown_listing_is_not_found() {
  let mailer = Arc::new(RecordingMailer::default());
  let fx = fixture_with(mailer.clone()).await;

  let err = fx.service.contact(Uuid::new_v4(), contact_request()).await.unwrap_err();
  assert!(err.is_not_found());
  assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_contact_with_vanished_owner_is_not_found() {
  let mailer = Arc::new(RecordingMailer::default());
  let fx = fixture_with(mailer.clone()).await;
  let orphan = ListingBuilder::new("Pune", 1.0).build();
  fx.listings.insert(orphan.clone()).await.unwrap();

  let err = fx.service.contact(orphan.id, contact_request()).await.unwrap_err();
  assert!(err.is_not_found());
  assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_contact_mail_failure_aborts_without_notification() {
  let fx = fixture_with(Arc::new(FailingMailer)).await;

  let err = fx.service.contact(fx.listing.id, contact_request()).await.unwrap_err();
  assert!(matches!(err, EstateError::Mail { .. }));

  fx.queue.flush().await;
  assert!(fx.users.notifications(fx.owner.id).await.unwrap().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_scenario() {
  let mailer = Arc::new(RecordingMailer::default());
  let fx = fixture_with(mailer.clone()).await;

  let booking = fx.service.book(fx.listing.id, booking_request()).await.unwrap();
  assert_eq!(booking.name, "Ravi");
  assert_eq!(booking.date, "2024-07-01");

  let sent = mailer.sent.lock().clone();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].subject, format!("New booking request for your property: {}", fx.listing.title));
  assert!(sent[0].text.contains("Date: 2024-07-01"));
  assert!(sent[0].text.contains("Time: Not specified"));
  assert!(sent[0].text.contains("No additional message"));

  let stored = fx.listings.find_by_id(fx.listing.id).await.unwrap().unwrap();
  assert_eq!(stored.bookings, vec![booking]);

  fx.queue.flush().await;
  let notes = fx.users.notifications(fx.owner.id).await.unwrap().unwrap();
  assert_eq!(notes.len(), 1);
  assert_eq!(notes[0].kind, NotificationKind::Booking);
  assert!(notes[0].message.contains("2024-07-01"));
}

#[tokio::test]
async fn test_booking_requires_name_email_date() {
  let mailer = Arc::new(RecordingMailer::default());
  let fx = fixture_with(mailer.clone()).await;

  let err = fx
    .service
    .book(fx.listing.id, BookingRequest { date: None, ..booking_request() })
    .await
    .unwrap_err();
  assert!(matches!(err, EstateError::Validation(ref m) if m == "Name, email, and date are required."));
  assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_booking_mail_failure_stores_nothing() {
  let fx = fixture_with(Arc::new(FailingMailer)).await;

  let err = fx.service.book(fx.listing.id, booking_request()).await.unwrap_err();
  assert!(matches!(err, EstateError::Mail { .. }));

  let stored = fx.listings.find_by_id(fx.listing.id).await.unwrap().unwrap();
  assert!(stored.bookings.is_empty());
  fx.queue.flush().await;
  assert!(fx.users.notifications(fx.owner.id).await.unwrap().unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_booking() {
  setup_tracing();
  let inner = Arc::new(MemoryUserStore::new());
  let owner = register(&inner, "Asha", "asha@example.com").await;
  let listing = ListingBuilder::new("Pune", 18000.0).owner(owner.id).build();
  let listings = seeded_store(vec![listing.clone()]).await;
  let users = Arc::new(NotificationRejectingUsers(inner.clone()));
  let (queue, _worker) = NotificationQueue::spawn(users.clone());
  let mailer = Arc::new(RecordingMailer::default());
  let service = OutreachService::new(listings.clone(), users, mailer.clone(), queue.clone());

  service.book(listing.id, booking_request()).await.unwrap();
  queue.flush().await;

  assert_eq!(mailer.sent.lock().len(), 1);
  assert_eq!(listings.find_by_id(listing.id).await.unwrap().unwrap().bookings.len(), 1);
  assert_eq!(queue.delivery_log().len(), 1);
  assert!(inner.notifications(owner.id).await.unwrap().unwrap().is_empty());
}
