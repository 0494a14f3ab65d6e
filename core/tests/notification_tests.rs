// tests/notification_tests.rs
mod common;
use common::*;
use estate::{
  model::{NewNotification, NotificationKind},
  MemoryUserStore, NotificationQueue, NotificationService, UserStore, DELIVERY_LOG_CAPACITY,
};
use std::sync::Arc;
use uuid::Uuid;

fn inquiry(text: &str) -> NewNotification {
  NewNotification {
    message: text.to_string(),
    kind: NotificationKind::Inquiry,
    link: format!("/property/{}", Uuid::new_v4()),
  }
}

#[tokio::test]
async fn test_queue_appends_in_order() {
  setup_tracing();
  let users = Arc::new(MemoryUserStore::new());
  let owner = register(&users, "Asha", "asha@example.com").await;
  let (queue, _worker) = NotificationQueue::spawn(users.clone());

  queue.enqueue(owner.id, inquiry("first"));
  queue.enqueue(owner.id, inquiry("second"));
  queue.flush().await;

  let stored = users.notifications(owner.id).await.unwrap().unwrap();
  let messages: Vec<_> = stored.iter().map(|n| n.message.as_str()).collect();
  assert_eq!(messages, vec!["first", "second"]);
  assert!(stored.iter().all(|n| !n.read));
  assert!(queue.delivery_log().is_empty());
}

#[tokio::test]
async fn test_unknown_recipient_is_logged_not_raised() {
  setup_tracing();
  let users = Arc::new(MemoryUserStore::new());
  let (queue, _worker) = NotificationQueue::spawn(users);
  let ghost = Uuid::new_v4();

  queue.enqueue(ghost, inquiry("hello?"));
  queue.flush().await;

  let failures = queue.delivery_log().failures();
  assert_eq!(failures.len(), 1);
  assert_eq!(failures[0].user_id, ghost);
}

#[tokio::test]
async fn test_delivery_log_keeps_only_recent_failures() {
  setup_tracing();
  let users = Arc::new(MemoryUserStore::new());
  let (queue, _worker) = NotificationQueue::spawn(users);
  let ghosts: Vec<Uuid> = (0..DELIVERY_LOG_CAPACITY + 5).map(|_| Uuid::new_v4()).collect();

  for ghost in &ghosts {
    queue.enqueue(*ghost, inquiry("anyone?"));
  }
  queue.flush().await;

  let failures = queue.delivery_log().failures();
  assert_eq!(failures.len(), DELIVERY_LOG_CAPACITY);
  assert_eq!(failures[0].user_id, ghosts[5]);
  assert_eq!(failures.last().unwrap().user_id, *ghosts.last().unwrap());

  assert_eq!(queue.delivery_log().drain().len(), DELIVERY_LOG_CAPACITY);
  assert!(queue.delivery_log().is_empty());
}

#[tokio::test]
async fn test_store_rejection_is_logged() {
  setup_tracing();
  let inner = Arc::new(MemoryUserStore::new());
  let owner = register(&inner, "Asha", "asha@example.com").await;
  let (queue, _worker) = NotificationQueue::spawn(Arc::new(NotificationRejectingUsers(inner.clone())));

  queue.enqueue(owner.id, inquiry("lost"));
  queue.flush().await;

  assert_eq!(queue.delivery_log().len(), 1);
  assert!(queue.delivery_log().failures()[0].error.contains("push_notification"));
  assert!(inner.notifications(owner.id).await.unwrap().unwrap().is_empty());
}

#[tokio::test]
async fn test_worker_stops_when_queue_dropped() {
  setup_tracing();
  let users = Arc::new(MemoryUserStore::new());
  let (queue, worker) = NotificationQueue::spawn(users);
  drop(queue);
  worker.await.unwrap();
}

#[tokio::test]
async fn test_service_lists_and_marks_read() {
  setup_tracing();
  let users = Arc::new(MemoryUserStore::new());
  let owner = register(&users, "Asha", "asha@example.com").await;
  let (queue, _worker) = NotificationQueue::spawn(users.clone());
  let service = NotificationService::new(users.clone());

  for text in ["a", "b", "c"] {
    queue.enqueue(owner.id, inquiry(text));
  }
  queue.flush().await;

  let listed = service.list(owner.id).await.unwrap();
  assert_eq!(listed.len(), 3);

  service.mark_read(owner.id, listed[0].id).await.unwrap();
  // Marking an already-read notification again is fine.
  service.mark_read(owner.id, listed[0].id).await.unwrap();
  assert_eq!(service.mark_all_read(owner.id).await.unwrap(), 2);
  assert_eq!(service.mark_all_read(owner.id).await.unwrap(), 0);
  assert!(service.list(owner.id).await.unwrap().iter().all(|n| n.read));
}

#[tokio::test]
async fn test_service_mark_read_unknown_is_not_found() {
  setup_tracing();
  let users = Arc::new(MemoryUserStore::new());
  let owner = register(&users, "Asha", "asha@example.com").await;
  let service = NotificationService::new(users);

  let err = service.mark_read(owner.id, Uuid::new_v4()).await.unwrap_err();
  assert!(err.is_not_found());
  let err = service.list(Uuid::new_v4()).await.unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn test_service_delete_is_idempotent() {
  setup_tracing();
  let users = Arc::new(MemoryUserStore::new());
  let owner = register(&users, "Asha", "asha@example.com").await;
  let (queue, _worker) = NotificationQueue::spawn(users.clone());
  let service = NotificationService::new(users);

  queue.enqueue(owner.id, inquiry("keep"));
  queue.enqueue(owner.id, inquiry("drop"));
  queue.flush().await;
  let listed = service.list(owner.id).await.unwrap();

  service.delete(owner.id, listed[1].id).await.unwrap();
  service.delete(owner.id, listed[1].id).await.unwrap();
  service.delete(owner.id, Uuid::new_v4()).await.unwrap();

  let remaining = service.list(owner.id).await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].message, "keep");
}

#[test]
fn test_notification_wire_shape() {
  let n = inquiry("hi").into_notification(chrono::Utc::now());
  let json = serde_json::to_value(&n).unwrap();
  assert_eq!(json["type"], "inquiry");
  assert_eq!(json["read"], false);
  assert!(json.get("createdAt").is_some());
}
