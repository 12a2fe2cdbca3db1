//! PostgreSQL repositories for notifications and settings.

use crate::schema::{notifications, settings};
use crate::{DatabaseResult, NewNotificationRow, NewSettingRow, NotificationRow, SettingRow};

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_error::DatabaseError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// PostgreSQL repository for operator notifications.
pub struct NotificationRepository {
    conn: Arc<Mutex<PgConnection>>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// List notifications, newest first. `unread_only` restricts to unread.
    #[instrument(skip(self))]
    pub async fn list(&self, unread_only: bool) -> DatabaseResult<Vec<NotificationRow>> {
        let mut conn = self.conn.lock().await;

        let mut query = notifications::table.into_boxed();
        if unread_only {
            query = query.filter(notifications::read.eq(false));
        }

        query
            .order(notifications::created_at.desc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Record a notification.
    #[instrument(skip(self, new_row), fields(title = %new_row.title))]
    pub async fn create(&self, new_row: NewNotificationRow) -> DatabaseResult<NotificationRow> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(notifications::table)
            .values(&new_row)
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Mark one notification as read.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: i32) -> DatabaseResult<NotificationRow> {
        let mut conn = self.conn.lock().await;

        diesel::update(notifications::table.find(id))
            .set(notifications::read.eq(true))
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Remove one notification.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> DatabaseResult<usize> {
        let mut conn = self.conn.lock().await;

        diesel::delete(notifications::table.find(id))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)
    }
}

/// PostgreSQL repository for key/value settings.
pub struct SettingsRepository {
    conn: Arc<Mutex<PgConnection>>,
}

impl SettingsRepository {
    /// Create a new settings repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// List every setting.
    #[instrument(skip(self))]
    pub async fn list(&self) -> DatabaseResult<Vec<SettingRow>> {
        let mut conn = self.conn.lock().await;

        settings::table
            .order(settings::key.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Fetch one setting by key.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> DatabaseResult<Option<SettingRow>> {
        let mut conn = self.conn.lock().await;

        settings::table
            .find(key)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Insert or update one setting.
    #[instrument(skip(self, value))]
    pub async fn upsert(&self, key: &str, value: serde_json::Value) -> DatabaseResult<SettingRow> {
        let mut conn = self.conn.lock().await;

        let new_row = NewSettingRow {
            key: key.to_string(),
            value: value.clone(),
        };

        diesel::insert_into(settings::table)
            .values(&new_row)
            .on_conflict(settings::key)
            .do_update()
            .set((
                settings::value.eq(value),
                settings::updated_at.eq(Utc::now()),
            ))
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }
}
