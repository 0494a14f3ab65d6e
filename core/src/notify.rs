// core/src/notify.rs

//! Best-effort notification delivery and the user-facing notification operations.
//!
//! [`NotificationQueue::enqueue`] never fails and never blocks the caller. A single
//! worker task appends notifications to the user store in order; failures are
//! logged and kept in a [`DeliveryLog`] instead of being reported to whoever
//! triggered the notification.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{EstateError, EstateResult};
use crate::model::{NewNotification, Notification};
use crate::store::UserStore;

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFailure {
  pub user_id: Uuid,
  pub notification_id: Uuid,
  pub error: String,
  pub at: DateTime<Utc>,
}

/// Failures kept by a [`DeliveryLog`]; older entries are dropped first.
pub const DELIVERY_LOG_CAPACITY: usize = 256;

/// Shared record of the most recent notifications that could not be appended.
#[derive(Debug, Clone, Default)]
pub struct DeliveryLog(Arc<Mutex<VecDeque<DeliveryFailure>>>);

impl DeliveryLog {
  fn record(&self, failure: DeliveryFailure) {
    let mut failures = self.0.lock();
    if failures.len() == DELIVERY_LOG_CAPACITY {
      failures.pop_front();
    }
    failures.push_back(failure);
  }

  /// Oldest first.
  pub fn failures(&self) -> Vec<DeliveryFailure> {
    self.0.lock().iter().cloned().collect()
  }

  /// Takes every recorded failure, leaving the log empty.
  pub fn drain(&self) -> Vec<DeliveryFailure> {
    self.0.lock().drain(..).collect()
  }

  pub fn len(&self) -> usize {
    self.0.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.lock().is_empty()
  }
}

enum Command {
  Deliver { user_id: Uuid, notification: Notification },
  Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct NotificationQueue {
  tx: mpsc::UnboundedSender<Command>,
  log: DeliveryLog,
}

impl NotificationQueue {
  /// Starts the delivery worker on the current tokio runtime.
  /// The worker exits once every queue handle has been dropped.
  pub fn spawn(users: Arc<dyn UserStore>) -> (Self, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let log = DeliveryLog::default();
    let worker = tokio::spawn(run_worker(users, rx, log.clone()));
    (Self { tx, log }, worker)
  }

  /// Queues a notification for `user_id`.
  pub fn enqueue(&self, user_id: Uuid, notification: NewNotification) {
    let notification = notification.into_notification(Utc::now());
    let notification_id = notification.id;
    if self.tx.send(Command::Deliver { user_id, notification }).is_err() {
      warn!(%user_id, %notification_id, "Notification worker is gone; dropping notification.");
      self.log.record(DeliveryFailure {
        user_id,
        notification_id,
        error: "notification worker stopped".to_string(),
        at: Utc::now(),
      });
    }
  }

  /// Resolves once everything enqueued before this call has been processed.
  pub async fn flush(&self) {
    let (done_tx, done_rx) = oneshot::channel();
    if self.tx.send(Command::Flush(done_tx)).is_ok() {
      let _ = done_rx.await;
    }
  }

  pub fn delivery_log(&self) -> &DeliveryLog {
    &self.log
  }
}

async fn run_worker(users: Arc<dyn UserStore>, mut rx: mpsc::UnboundedReceiver<Command>, log: DeliveryLog) {
  debug!("Notification worker started.");
  while let Some(command) = rx.recv().await {
    match command {
      Command::Deliver { user_id, notification } => {
        let notification_id = notification.id;
        match users.push_notification(user_id, notification).await {
          Ok(()) => debug!(%user_id, %notification_id, "Notification appended."),
          Err(e) => {
            warn!(%user_id, %notification_id, error = %e, "Failed to add notification.");
            log.record(DeliveryFailure {
              user_id,
              notification_id,
              error: e.to_string(),
              at: Utc::now(),
            });
          }
        }
      }
      Command::Flush(done) => {
        let _ = done.send(());
      }
    }
  }
  debug!("Notification worker stopped.");
}

/// Read and housekeeping operations on the caller's own notification list.
#[derive(Clone)]
pub struct NotificationService {
  users: Arc<dyn UserStore>,
}

impl NotificationService {
  pub fn new(users: Arc<dyn UserStore>) -> Self {
    Self { users }
  }

  #[instrument(name = "notifications::list", skip(self), err(Display))]
  pub async fn list(&self, user_id: Uuid) -> EstateResult<Vec<Notification>> {
    self
      .users
      .notifications(user_id)
      .await?
      .ok_or_else(|| EstateError::not_found("user", user_id))
  }

  #[instrument(name = "notifications::mark_read", skip(self), err(Display))]
  pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<()> {
    if self.users.mark_notification_read(user_id, notification_id).await? {
      Ok(())
    } else {
      Err(EstateError::not_found("notification", notification_id))
    }
  }

  #[instrument(name = "notifications::mark_all_read", skip(self), err(Display))]
  pub async fn mark_all_read(&self, user_id: Uuid) -> EstateResult<u64> {
    let changed = self.users.mark_all_notifications_read(user_id).await?;
    info!(changed, "Marked notifications as read.");
    Ok(changed)
  }

  /// Deleting an id that is not in the list is not an error.
  #[instrument(name = "notifications::delete", skip(self), err(Display))]
  pub async fn delete(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<()> {
    let removed = self.users.delete_notification(user_id, notification_id).await?;
    debug!(removed, "Notification delete processed.");
    Ok(())
  }
}
