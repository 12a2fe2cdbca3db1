//! Wire-format inputs for lifecycle operations.
//!
//! Required fields are modeled as `Option` so that missing values surface in
//! the per-field validation map instead of failing JSON extraction.

use chrono::{DateTime, NaiveDate, Utc};
use mentora_core::{OnboardingStatus, PaymentStatus, StepStatus};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Reference to a student: internal id or external uuid.
///
/// The legacy system resolved both through one `id = X OR uuid = X` query;
/// here the caller parses the reference and the two lookups stay explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentRef {
    /// Internal serial id
    Id(i32),
    /// Stable external uuid
    Uuid(Uuid),
}

impl StudentRef {
    /// Parse a path segment: integers resolve as internal ids, anything
    /// uuid-shaped as external uuids.
    pub fn parse(segment: &str) -> Option<Self> {
        if let Ok(id) = segment.parse::<i32>() {
            return Some(StudentRef::Id(id));
        }
        segment.parse::<Uuid>().ok().map(StudentRef::Uuid)
    }
}

/// Deserializes a present-but-null field as `Some(None)`.
///
/// Lets PUT payloads distinguish "clear this column" from "leave it alone".
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Creation payload for a student.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewStudentInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub discord_handle: Option<String>,
    pub program_id: Option<i32>,
    pub payment_status: Option<PaymentStatus>,
    pub onboarding_status: Option<OnboardingStatus>,
    pub joined_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

/// Partial update payload for a student.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStudentInput {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub discord_handle: Option<Option<String>>,
    pub program_id: Option<i32>,
    pub payment_status: Option<PaymentStatus>,
    pub onboarding_status: Option<OnboardingStatus>,
    pub discord_role_assigned: Option<bool>,
    pub joined_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_reminder_sent: Option<Option<DateTime<Utc>>>,
}

impl UpdateStudentInput {
    /// A patch carrying only an onboarding status, for the direct PATCH
    /// endpoint.
    pub fn onboarding_only(status: OnboardingStatus) -> Self {
        Self {
            onboarding_status: Some(status),
            ..Default::default()
        }
    }
}

/// Patch payload for one timeline step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepPatch {
    pub status: Option<StepStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub timestamp_label: Option<Option<String>>,
}

/// Batched status write payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkUpdateInput {
    #[serde(default)]
    pub ids: Vec<i32>,
    pub payment_status: Option<PaymentStatus>,
    pub onboarding_status: Option<OnboardingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_ref_prefers_integer_ids() {
        assert_eq!(StudentRef::parse("42"), Some(StudentRef::Id(42)));
        let uuid = "3e2f7a6c-5f93-4b0a-9d4e-8b6a1f2c3d4e";
        assert_eq!(
            StudentRef::parse(uuid),
            Some(StudentRef::Uuid(uuid.parse().unwrap()))
        );
        assert_eq!(StudentRef::parse("not-a-ref"), None);
    }

    #[test]
    fn absent_and_null_handles_differ() {
        let absent: UpdateStudentInput = serde_json::from_str(r#"{"name": "Ann"}"#).unwrap();
        assert_eq!(absent.discord_handle, None);

        let cleared: UpdateStudentInput =
            serde_json::from_str(r#"{"discord_handle": null}"#).unwrap();
        assert_eq!(cleared.discord_handle, Some(None));

        let set: UpdateStudentInput =
            serde_json::from_str(r#"{"discord_handle": "ann#1234"}"#).unwrap();
        assert_eq!(set.discord_handle, Some(Some("ann#1234".to_string())));
    }

    #[test]
    fn step_patch_accepts_wire_statuses() {
        let patch: StepPatch = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assert_eq!(patch.status, Some(StepStatus::Completed));
    }
}
