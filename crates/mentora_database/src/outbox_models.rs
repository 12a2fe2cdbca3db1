//! Audit outbox row models.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use mentora_core::{AuditEvent, AuditKind};

/// Database row for the audit_outbox table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::audit_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxRow {
    pub id: i32,
    pub kind: String,
    pub payload: serde_json::Value,
    pub student_id: Option<i32>,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OutboxRow {
    /// Event kind, or `None` for kinds this build does not know.
    ///
    /// Unknown kinds are not an error; the dispatcher renders them through
    /// the generic fallback template.
    pub fn kind(&self) -> Option<AuditKind> {
        AuditKind::parse_str(&self.kind)
    }
}

/// Insertable struct for the audit_outbox table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::audit_outbox)]
pub struct NewOutboxRow {
    pub kind: String,
    pub payload: serde_json::Value,
    pub student_id: Option<i32>,
}

/// An audit event whose student id is bound after the primary insert.
///
/// The lifecycle service builds these before the student row exists; the
/// repository attaches the generated id inside the same transaction.
#[derive(Debug, Clone)]
pub struct PendingAudit {
    pub kind: AuditKind,
    pub payload: serde_json::Value,
}

impl PendingAudit {
    /// Bind the generated student id, producing an insertable row.
    pub fn bind(self, student_id: i32) -> NewOutboxRow {
        NewOutboxRow {
            kind: self.kind.as_str().to_string(),
            payload: self.payload,
            student_id: Some(student_id),
        }
    }
}

impl From<AuditEvent> for NewOutboxRow {
    fn from(event: AuditEvent) -> Self {
        Self {
            kind: event.kind.as_str().to_string(),
            payload: event.payload,
            student_id: event.student_id,
        }
    }
}
