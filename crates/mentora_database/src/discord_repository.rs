//! PostgreSQL repository for the Discord role ledger.
//!
//! Ledger updates only; no Discord API traffic exists in this system.

use crate::schema::discord_roles;
use crate::{DatabaseResult, DiscordRoleChangeset, DiscordRoleRow, NewDiscordRoleRow};

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_core::SyncStatus;
use mentora_error::DatabaseError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// PostgreSQL repository for Discord role ledger entries.
pub struct DiscordRoleRepository {
    conn: Arc<Mutex<PgConnection>>,
}

impl DiscordRoleRepository {
    /// Create a new Discord role repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Record a ledger entry for a student.
    #[instrument(skip(self, new_row), fields(student_id = new_row.student_id))]
    pub async fn create(&self, new_row: NewDiscordRoleRow) -> DatabaseResult<DiscordRoleRow> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(discord_roles::table)
            .values(&new_row)
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Fetch one ledger entry by id.
    #[instrument(skip(self))]
    pub async fn find(&self, id: i32) -> DatabaseResult<Option<DiscordRoleRow>> {
        let mut conn = self.conn.lock().await;

        discord_roles::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// List ledger entries, optionally restricted to one sync status.
    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<SyncStatus>) -> DatabaseResult<Vec<DiscordRoleRow>> {
        let mut conn = self.conn.lock().await;

        let mut query = discord_roles::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(discord_roles::sync_status.eq(status.as_str()));
        }

        query
            .order(discord_roles::updated_at.desc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Apply a partial update to one ledger entry.
    #[instrument(skip(self, changeset), fields(id = id))]
    pub async fn update(
        &self,
        id: i32,
        mut changeset: DiscordRoleChangeset,
    ) -> DatabaseResult<DiscordRoleRow> {
        let mut conn = self.conn.lock().await;

        changeset.updated_at = Some(Utc::now());

        diesel::update(discord_roles::table.find(id))
            .set(&changeset)
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Mark an entry as synced: status Synced, error cleared, sync time
    /// stamped.
    #[instrument(skip(self))]
    pub async fn mark_synced(&self, id: i32) -> DatabaseResult<DiscordRoleRow> {
        let now = Utc::now();
        self.update(
            id,
            DiscordRoleChangeset {
                sync_status: Some(SyncStatus::Synced.as_str().to_string()),
                error_message: Some(None),
                last_sync_at: Some(Some(now)),
                ..Default::default()
            },
        )
        .await
    }

    /// Mark an entry as failed: status Failed, error recorded, retry count
    /// bumped.
    #[instrument(skip(self, error))]
    pub async fn mark_failed(&self, id: i32, error: &str) -> DatabaseResult<DiscordRoleRow> {
        let mut conn = self.conn.lock().await;

        diesel::update(discord_roles::table.find(id))
            .set((
                discord_roles::sync_status.eq(SyncStatus::Failed.as_str()),
                discord_roles::error_message.eq(error),
                discord_roles::retry_count.eq(discord_roles::retry_count + 1),
                discord_roles::updated_at.eq(Utc::now()),
            ))
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }
}
