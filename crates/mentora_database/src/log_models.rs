//! System log row models.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use mentora_core::LogLevel;
use mentora_error::{DatabaseError, DatabaseErrorKind};

/// Database row for the append-only system_logs table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::system_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SystemLogRow {
    pub id: i32,
    pub level: String,
    pub module: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
    pub user_id: Option<i32>,
    pub student_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl SystemLogRow {
    /// Severity as a closed enum.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a known level.
    pub fn level(&self) -> Result<LogLevel, DatabaseError> {
        LogLevel::parse_str(&self.level).ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::UnknownStatus(
                self.level.clone(),
                "system_logs.level".to_string(),
            ))
        })
    }
}

/// Insertable struct for the system_logs table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::system_logs)]
pub struct NewSystemLogRow {
    pub level: String,
    pub module: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
    pub user_id: Option<i32>,
    pub student_id: Option<i32>,
}

/// Filters for the log read path.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub module: Option<String>,
    /// Free-text search over the message column
    pub search: Option<String>,
    pub student_id: Option<i32>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
