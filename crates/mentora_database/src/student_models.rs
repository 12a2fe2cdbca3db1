//! Student, program, and timeline step row models.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use mentora_core::{OnboardingStatus, PaymentStatus, StepStatus};
use mentora_error::{DatabaseError, DatabaseErrorKind};
use uuid::Uuid;

use crate::discord_models::DiscordRoleRow;
use crate::transaction_models::TransactionRow;

/// Database row for the programs table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::programs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProgramRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<bigdecimal::BigDecimal>,
    pub duration_weeks: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for the programs table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::programs)]
pub struct NewProgramRow {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<bigdecimal::BigDecimal>,
    pub duration_weeks: Option<i32>,
    pub active: bool,
}

/// Database row for the students table.
///
/// Status columns keep their legacy text spellings; use the typed accessors
/// to consume them as closed enums.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentRow {
    pub id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub discord_handle: Option<String>,
    pub program_id: i32,
    pub payment_status: String,
    pub onboarding_status: String,
    pub discord_role_assigned: bool,
    pub joined_date: NaiveDate,
    pub due_date: NaiveDate,
    pub last_reminder_sent: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentRow {
    /// Payment status as a closed enum.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a known status.
    pub fn payment_status(&self) -> Result<PaymentStatus, DatabaseError> {
        PaymentStatus::parse_str(&self.payment_status).ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::UnknownStatus(
                self.payment_status.clone(),
                "students.payment_status".to_string(),
            ))
        })
    }

    /// Onboarding status as a closed enum.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a known status.
    pub fn onboarding_status(&self) -> Result<OnboardingStatus, DatabaseError> {
        OnboardingStatus::parse_str(&self.onboarding_status).ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::UnknownStatus(
                self.onboarding_status.clone(),
                "students.onboarding_status".to_string(),
            ))
        })
    }
}

/// Insertable struct for the students table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::students)]
pub struct NewStudentRow {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub discord_handle: Option<String>,
    pub program_id: i32,
    pub payment_status: String,
    pub onboarding_status: String,
    pub discord_role_assigned: bool,
    pub joined_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Partial update for the students table.
///
/// `None` leaves a column untouched; the double-`Option` fields distinguish
/// "don't touch" from "set NULL" on nullable columns.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::students)]
pub struct StudentChangeset {
    pub name: Option<String>,
    pub email: Option<String>,
    pub discord_handle: Option<Option<String>>,
    pub program_id: Option<i32>,
    pub payment_status: Option<String>,
    pub onboarding_status: Option<String>,
    pub discord_role_assigned: Option<bool>,
    pub joined_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub last_reminder_sent: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StudentChangeset {
    /// Whether the changeset touches any column besides `updated_at`.
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.discord_handle.is_some()
            || self.program_id.is_some()
            || self.payment_status.is_some()
            || self.onboarding_status.is_some()
            || self.discord_role_assigned.is_some()
            || self.joined_date.is_some()
            || self.due_date.is_some()
            || self.last_reminder_sent.is_some()
    }
}

/// Database row for the timeline_steps table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Associations)]
#[diesel(table_name = crate::schema::timeline_steps)]
#[diesel(belongs_to(StudentRow, foreign_key = student_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TimelineStepRow {
    pub id: i32,
    pub student_id: i32,
    pub label: String,
    pub status: String,
    pub timestamp_label: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimelineStepRow {
    /// Step status as a closed enum.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a known status.
    pub fn status(&self) -> Result<StepStatus, DatabaseError> {
        StepStatus::parse_str(&self.status).ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::UnknownStatus(
                self.status.clone(),
                "timeline_steps.status".to_string(),
            ))
        })
    }
}

/// Insertable struct for the timeline_steps table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::timeline_steps)]
pub struct NewTimelineStepRow {
    pub student_id: i32,
    pub label: String,
    pub status: String,
    pub timestamp_label: Option<String>,
    pub sort_order: i32,
}

/// Partial update for one timeline step.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::timeline_steps)]
pub struct TimelineStepChangeset {
    pub status: Option<String>,
    pub timestamp_label: Option<Option<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A student with every associated record eager-loaded.
#[derive(Debug, Clone)]
pub struct StudentDetail {
    pub student: StudentRow,
    pub program: ProgramRow,
    pub timeline: Vec<TimelineStepRow>,
    pub transactions: Vec<TransactionRow>,
    pub discord_role: Option<DiscordRoleRow>,
}
