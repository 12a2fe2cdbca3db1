//! Audit event vocabulary and its static message/severity mapping.
//!
//! Lifecycle writes append [`AuditEvent`]s to the outbox; the dispatcher
//! renders them into system log rows through [`AuditEvent::render`]. The
//! mapping tables are static and data-driven; the only conditional branch
//! is the severity selection for status-change events, which depends on the
//! *new* status value.

use crate::{LogLevel, OnboardingStatus, PaymentStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Module tag recorded on student lifecycle log entries.
pub const AUDIT_MODULE_STUDENTS: &str = "students";

/// Kind of a recorded lifecycle event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// Student row created
    #[display("created")]
    Created,
    /// One or more mutable fields changed
    #[display("updated")]
    Updated,
    /// Student soft-deleted
    #[display("deleted")]
    Deleted,
    /// `payment_status` changed value
    #[display("payment_updated")]
    PaymentUpdated,
    /// `onboarding_status` changed value
    #[display("onboarding_updated")]
    OnboardingUpdated,
}

impl AuditKind {
    /// The stored outbox spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::Created => "created",
            AuditKind::Updated => "updated",
            AuditKind::Deleted => "deleted",
            AuditKind::PaymentUpdated => "payment_updated",
            AuditKind::OnboardingUpdated => "onboarding_updated",
        }
    }

    /// Parse a stored outbox spelling. Returns `None` for unknown kinds;
    /// unknown kinds render through the generic fallback template.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(AuditKind::Created),
            "updated" => Some(AuditKind::Updated),
            "deleted" => Some(AuditKind::Deleted),
            "payment_updated" => Some(AuditKind::PaymentUpdated),
            "onboarding_updated" => Some(AuditKind::OnboardingUpdated),
            _ => None,
        }
    }
}

/// A structured lifecycle event awaiting dispatch into the system log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What happened
    pub kind: AuditKind,
    /// Student the event concerns, if any
    pub student_id: Option<i32>,
    /// Contextual payload (names, old/new values, diffs)
    pub payload: Value,
}

impl AuditEvent {
    /// Build an event for a student with the given payload.
    pub fn for_student(kind: AuditKind, student_id: i32, payload: Value) -> Self {
        Self {
            kind,
            student_id: Some(student_id),
            payload,
        }
    }

    /// Render into a log message and severity.
    pub fn render(&self) -> RenderedAudit {
        render_event(Some(self.kind), &self.payload)
    }
}

/// Rendered form of an audit event, ready to append to the system log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAudit {
    /// Severity selected from the kind (and new status value, if any)
    pub level: LogLevel,
    /// Module tag for the log row
    pub module: &'static str,
    /// Human-readable message
    pub message: String,
}

/// Render a possibly-unknown event kind.
///
/// Kinds that fail to parse from the outbox fall through to a generic
/// template at INFO severity rather than being dropped.
pub fn render_event(kind: Option<AuditKind>, payload: &Value) -> RenderedAudit {
    let name = payload_str(payload, "name").unwrap_or("unknown student");
    match kind {
        Some(AuditKind::Created) => RenderedAudit {
            level: LogLevel::Success,
            module: AUDIT_MODULE_STUDENTS,
            message: format!("Student {name} enrolled"),
        },
        Some(AuditKind::Updated) => {
            let fields = payload
                .get("changed")
                .and_then(Value::as_object)
                .map(|diff| diff.keys().cloned().collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            let message = if fields.is_empty() {
                format!("Student {name} updated")
            } else {
                format!("Student {name} updated ({fields})")
            };
            RenderedAudit {
                level: LogLevel::Info,
                module: AUDIT_MODULE_STUDENTS,
                message,
            }
        }
        Some(AuditKind::Deleted) => RenderedAudit {
            level: LogLevel::Warning,
            module: AUDIT_MODULE_STUDENTS,
            message: format!("Student {name} deleted"),
        },
        Some(AuditKind::PaymentUpdated) => {
            let old = payload_str(payload, "old").unwrap_or("?");
            let new = payload_str(payload, "new").unwrap_or("?");
            let level = match PaymentStatus::parse_str(new) {
                Some(PaymentStatus::Paid) => LogLevel::Success,
                Some(PaymentStatus::Failed) => LogLevel::Error,
                Some(PaymentStatus::Pending) | None => LogLevel::Warning,
            };
            RenderedAudit {
                level,
                module: AUDIT_MODULE_STUDENTS,
                message: format!("Payment status for {name} changed from {old} to {new}"),
            }
        }
        Some(AuditKind::OnboardingUpdated) => {
            let old = payload_str(payload, "old").unwrap_or("?");
            let new = payload_str(payload, "new").unwrap_or("?");
            let level = match OnboardingStatus::parse_str(new) {
                Some(OnboardingStatus::Completed) => LogLevel::Success,
                Some(OnboardingStatus::NotStarted)
                | Some(OnboardingStatus::InProgress)
                | None => LogLevel::Info,
            };
            RenderedAudit {
                level,
                module: AUDIT_MODULE_STUDENTS,
                message: format!("Onboarding status for {name} changed from {old} to {new}"),
            }
        }
        None => RenderedAudit {
            level: LogLevel::Info,
            module: "audit",
            message: "Audit event recorded".to_string(),
        },
    }
}

fn payload_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_round_trips() {
        use strum::IntoEnumIterator;
        for kind in AuditKind::iter() {
            assert_eq!(AuditKind::parse_str(kind.as_str()), Some(kind));
        }
        assert_eq!(AuditKind::parse_str("renamed"), None);
    }

    #[test]
    fn created_renders_success() {
        let event = AuditEvent::for_student(AuditKind::Created, 1, json!({"name": "Ann"}));
        let rendered = event.render();
        assert_eq!(rendered.level, LogLevel::Success);
        assert_eq!(rendered.module, AUDIT_MODULE_STUDENTS);
        assert_eq!(rendered.message, "Student Ann enrolled");
    }

    #[test]
    fn payment_failure_renders_error() {
        let event = AuditEvent::for_student(
            AuditKind::PaymentUpdated,
            1,
            json!({"name": "Ann", "old": "Pending", "new": "Failed"}),
        );
        let rendered = event.render();
        assert_eq!(rendered.level, LogLevel::Error);
        assert_eq!(
            rendered.message,
            "Payment status for Ann changed from Pending to Failed"
        );
    }

    #[test]
    fn payment_settled_renders_success() {
        let event = AuditEvent::for_student(
            AuditKind::PaymentUpdated,
            1,
            json!({"name": "Ann", "old": "Pending", "new": "Paid"}),
        );
        assert_eq!(event.render().level, LogLevel::Success);
    }

    #[test]
    fn onboarding_completion_renders_success() {
        let event = AuditEvent::for_student(
            AuditKind::OnboardingUpdated,
            1,
            json!({"name": "Ann", "old": "In Progress", "new": "Completed"}),
        );
        assert_eq!(event.render().level, LogLevel::Success);

        let event = AuditEvent::for_student(
            AuditKind::OnboardingUpdated,
            1,
            json!({"name": "Ann", "old": "Not Started", "new": "In Progress"}),
        );
        assert_eq!(event.render().level, LogLevel::Info);
    }

    #[test]
    fn updated_lists_changed_fields() {
        let event = AuditEvent::for_student(
            AuditKind::Updated,
            1,
            json!({"name": "Ann", "changed": {"email": {"old": "a@x.com", "new": "b@x.com"}}}),
        );
        assert_eq!(event.render().message, "Student Ann updated (email)");
    }

    #[test]
    fn unknown_kind_falls_back_to_generic_info() {
        let rendered = render_event(None, &json!({}));
        assert_eq!(rendered.level, LogLevel::Info);
        assert_eq!(rendered.module, "audit");
    }
}
