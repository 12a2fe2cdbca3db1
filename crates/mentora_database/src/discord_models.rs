//! Discord role ledger row models.
//!
//! A status ledger only. Nothing here performs Discord API calls.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use mentora_core::SyncStatus;
use mentora_error::{DatabaseError, DatabaseErrorKind};

/// Database row for the discord_roles table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::discord_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiscordRoleRow {
    pub id: i32,
    pub student_id: i32,
    pub role_name: String,
    pub sync_status: String,
    pub retry_count: i32,
    pub error_message: Option<String>,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiscordRoleRow {
    /// Sync status as a closed enum.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a known status.
    pub fn sync_status(&self) -> Result<SyncStatus, DatabaseError> {
        SyncStatus::parse_str(&self.sync_status).ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::UnknownStatus(
                self.sync_status.clone(),
                "discord_roles.sync_status".to_string(),
            ))
        })
    }
}

/// Insertable struct for the discord_roles table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::discord_roles)]
pub struct NewDiscordRoleRow {
    pub student_id: i32,
    pub role_name: String,
    pub sync_status: String,
    pub retry_count: i32,
    pub error_message: Option<String>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// Partial update for one role ledger entry.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::discord_roles)]
pub struct DiscordRoleChangeset {
    pub role_name: Option<String>,
    pub sync_status: Option<String>,
    pub retry_count: Option<i32>,
    pub error_message: Option<Option<String>>,
    pub last_sync_at: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}
