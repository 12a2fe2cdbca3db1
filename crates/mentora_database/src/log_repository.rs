//! PostgreSQL repository for the append-only system log.

use crate::schema::system_logs;
use crate::{DatabaseResult, LogFilter, NewSystemLogRow, SystemLogRow};

use chrono::{Duration, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_error::DatabaseError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// Default retention window for [`SystemLogRepository::prune`].
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// PostgreSQL repository for system log entries.
///
/// Append-only aside from the retention operations.
pub struct SystemLogRepository {
    conn: Arc<Mutex<PgConnection>>,
}

impl SystemLogRepository {
    /// Create a new system log repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Append one log entry.
    #[instrument(skip(self, new_row), fields(level = %new_row.level, module = %new_row.module))]
    pub async fn append(&self, new_row: NewSystemLogRow) -> DatabaseResult<SystemLogRow> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(system_logs::table)
            .values(&new_row)
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// List entries matching the filter, newest first.
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &LogFilter) -> DatabaseResult<Vec<SystemLogRow>> {
        let mut conn = self.conn.lock().await;

        let mut query = system_logs::table.into_boxed();

        if let Some(level) = filter.level {
            query = query.filter(system_logs::level.eq(level.as_str()));
        }
        if let Some(ref module) = filter.module {
            query = query.filter(system_logs::module.eq(module.clone()));
        }
        if let Some(ref search) = filter.search {
            query = query.filter(system_logs::message.ilike(format!("%{search}%")));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(system_logs::student_id.eq(student_id));
        }
        if let Some(since) = filter.since {
            query = query.filter(system_logs::created_at.ge(since));
        }
        if let Some(until) = filter.until {
            query = query.filter(system_logs::created_at.le(until));
        }

        query = query.order(system_logs::created_at.desc());

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        if let Some(offset) = filter.offset {
            query = query.offset(offset);
        }

        query.load(&mut *conn).map_err(DatabaseError::from)
    }

    /// Delete entries older than the given number of days. Returns the
    /// deleted-row count.
    #[instrument(skip(self))]
    pub async fn prune(&self, days: i64) -> DatabaseResult<usize> {
        let mut conn = self.conn.lock().await;

        let cutoff = Utc::now() - Duration::days(days);

        diesel::delete(system_logs::table.filter(system_logs::created_at.lt(cutoff)))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Delete every entry. Returns the deleted-row count.
    #[instrument(skip(self))]
    pub async fn truncate(&self) -> DatabaseResult<usize> {
        let mut conn = self.conn.lock().await;

        diesel::delete(system_logs::table)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)
    }
}
