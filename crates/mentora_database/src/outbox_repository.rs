//! PostgreSQL repository for the audit outbox.
//!
//! Outbox rows are appended by the lifecycle repositories inside their
//! primary-write transactions; this repository serves the dispatcher's read
//! and acknowledgement path.

use crate::schema::audit_outbox;
use crate::{DatabaseResult, NewOutboxRow, OutboxRow};

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_error::DatabaseError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// PostgreSQL repository for audit outbox rows.
pub struct OutboxRepository {
    conn: Arc<Mutex<PgConnection>>,
}

impl OutboxRepository {
    /// Create a new outbox repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Append an event outside of a lifecycle transaction.
    ///
    /// Lifecycle writes should not use this; their events ride in the same
    /// transaction as the primary statement.
    #[instrument(skip(self, event), fields(kind = %event.kind))]
    pub async fn append(&self, event: NewOutboxRow) -> DatabaseResult<OutboxRow> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(audit_outbox::table)
            .values(&event)
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Load undispatched rows in insertion order, up to `limit`.
    #[instrument(skip(self))]
    pub async fn undispatched(&self, limit: i64) -> DatabaseResult<Vec<OutboxRow>> {
        let mut conn = self.conn.lock().await;

        audit_outbox::table
            .filter(audit_outbox::dispatched_at.is_null())
            .order(audit_outbox::id.asc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Stamp a row as dispatched.
    #[instrument(skip(self))]
    pub async fn mark_dispatched(&self, id: i32) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::update(audit_outbox::table.find(id))
            .set(audit_outbox::dispatched_at.eq(Utc::now()))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    /// Record a dispatch failure: bump attempts, keep the row for the next
    /// pass.
    #[instrument(skip(self, error))]
    pub async fn mark_failed(&self, id: i32, error: &str) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::update(audit_outbox::table.find(id))
            .set((
                audit_outbox::attempts.eq(audit_outbox::attempts + 1),
                audit_outbox::last_error.eq(error),
            ))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    /// Count rows still awaiting dispatch.
    #[instrument(skip(self))]
    pub async fn pending_count(&self) -> DatabaseResult<i64> {
        let mut conn = self.conn.lock().await;

        audit_outbox::table
            .filter(audit_outbox::dispatched_at.is_null())
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }
}
