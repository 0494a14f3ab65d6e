// app/src/db/user_store.rs

use async_trait::async_trait;
use chrono::Utc;
use estate::{
  model::{NewUser, Notification, User},
  EstateError, EstateResult, UserStore,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::store_err;
use crate::models::{NotificationRow, UserRow};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

#[derive(Clone)]
pub struct PgUserStore {
  pool: PgPool,
}

impl PgUserStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn load_notifications(&self, user_id: Uuid) -> EstateResult<Vec<Notification>> {
    let rows: Vec<NotificationRow> = sqlx::query_as(
      "SELECT id, user_id, message, kind, link, read, created_at \
       FROM notifications WHERE user_id = $1 ORDER BY seq",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("load_notifications"))?;
    rows.into_iter().map(NotificationRow::into_notification).collect()
  }

  async fn user_exists(&self, user_id: Uuid) -> EstateResult<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
      .bind(user_id)
      .fetch_one(&self.pool)
      .await
      .map_err(store_err("user_exists"))
  }

  async fn with_notifications(&self, row: Option<UserRow>) -> EstateResult<Option<User>> {
    match row {
      Some(row) => {
        let notifications = self.load_notifications(row.id).await?;
        Ok(Some(row.into_user(notifications)))
      }
      None => Ok(None),
    }
  }

  /// Maps "no such user" to `NotFound` for operations scoped to one user.
  async fn require_user(&self, user_id: Uuid) -> EstateResult<()> {
    if self.user_exists(user_id).await? {
      Ok(())
    } else {
      Err(EstateError::not_found("user", user_id))
    }
  }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl UserStore for PgUserStore {
  #[instrument(name = "pg_user_store::insert", skip_all)]
  async fn insert(&self, user: NewUser) -> EstateResult<User> {
    let row: UserRow = sqlx::query_as(&format!(
      "INSERT INTO users (id, name, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5) \
       RETURNING {USER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(Utc::now())
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      if is_unique_violation(&e) {
        EstateError::validation("User already exists")
      } else {
        EstateError::store("insert_user", e)
      }
    })?;
    Ok(row.into_user(Vec::new()))
  }

  async fn find_by_id(&self, id: Uuid) -> EstateResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_err("find_user"))?;
    self.with_notifications(row).await
  }

  async fn find_by_email(&self, email: &str) -> EstateResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
      .bind(email)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_err("find_user_by_email"))?;
    self.with_notifications(row).await
  }

  #[instrument(name = "pg_user_store::push_notification", skip(self, notification), fields(notification_id = %notification.id))]
  async fn push_notification(&self, user_id: Uuid, notification: Notification) -> EstateResult<()> {
    let inserted = sqlx::query(
      "INSERT INTO notifications (id, user_id, message, kind, link, read, created_at) \
       SELECT $1, id, $3, $4, $5, $6, $7 FROM users WHERE id = $2",
    )
    .bind(notification.id)
    .bind(user_id)
    .bind(&notification.message)
    .bind(notification.kind.as_str())
    .bind(&notification.link)
    .bind(notification.read)
    .bind(notification.created_at)
    .execute(&self.pool)
    .await
    .map_err(store_err("push_notification"))?;
    if inserted.rows_affected() == 0 {
      return Err(EstateError::not_found("user", user_id));
    }
    Ok(())
  }

  async fn notifications(&self, user_id: Uuid) -> EstateResult<Option<Vec<Notification>>> {
    if !self.user_exists(user_id).await? {
      return Ok(None);
    }
    self.load_notifications(user_id).await.map(Some)
  }

  async fn mark_notification_read(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<bool> {
    self.require_user(user_id).await?;
    let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
      .bind(notification_id)
      .bind(user_id)
      .execute(&self.pool)
      .await
      .map_err(store_err("mark_notification_read"))?;
    Ok(result.rows_affected() > 0)
  }

  async fn mark_all_notifications_read(&self, user_id: Uuid) -> EstateResult<u64> {
    self.require_user(user_id).await?;
    let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read")
      .bind(user_id)
      .execute(&self.pool)
      .await
      .map_err(store_err("mark_all_notifications_read"))?;
    Ok(result.rows_affected())
  }

  async fn delete_notification(&self, user_id: Uuid, notification_id: Uuid) -> EstateResult<bool> {
    self.require_user(user_id).await?;
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
      .bind(notification_id)
      .bind(user_id)
      .execute(&self.pool)
      .await
      .map_err(store_err("delete_notification"))?;
    Ok(result.rows_affected() > 0)
  }
}
