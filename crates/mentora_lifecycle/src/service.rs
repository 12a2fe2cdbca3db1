//! The student lifecycle service.
//!
//! Owns validation, old-vs-new diff computation, and the audit event
//! payloads; the transactional mechanics live in the repository layer.

use crate::input::{BulkUpdateInput, NewStudentInput, StepPatch, StudentRef, UpdateStudentInput};

use chrono::Utc;
use diesel::pg::PgConnection;
use mentora_core::{AuditEvent, AuditKind};
use mentora_database::{
    NewOutboxRow, NewStudentRow, PendingAudit, StepUpdateOutcome, StudentChangeset, StudentDetail,
    StudentFilter, StudentRepository, StudentRow, StudentStats, TimelineStepChangeset,
};
use mentora_error::{DatabaseError, DatabaseErrorKind, MentoraResult, ValidationError};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

/// Orchestrates student lifecycle operations over the repository layer.
///
/// # Example
/// ```no_run
/// use mentora_database::establish_connection;
/// use mentora_lifecycle::LifecycleService;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let conn = establish_connection()?;
///     let service = LifecycleService::new(conn);
///     // Use service.create_student(), update_student(), etc.
///     Ok(())
/// }
/// ```
pub struct LifecycleService {
    students: StudentRepository,
}

impl LifecycleService {
    /// Create a service owning its own connection.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            students: StudentRepository::new(conn),
        }
    }

    /// Create a service over a shared connection.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self {
            students: StudentRepository::from_arc(conn),
        }
    }

    // ============================================================================
    // Creation
    // ============================================================================

    /// Validate and create a student with their seeded timeline.
    ///
    /// # Errors
    ///
    /// Returns a per-field [`ValidationError`] when required fields are
    /// missing or invalid; nothing is persisted in that case.
    #[instrument(skip(self, input))]
    pub async fn create_student(&self, input: NewStudentInput) -> MentoraResult<StudentDetail> {
        let mut errors = ValidationError::empty();

        let name = input.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            errors.add("name", "name is required");
        }

        let email = input.email.as_deref().map(str::trim).unwrap_or_default();
        if email.is_empty() {
            errors.add("email", "email is required");
        } else if !email.contains('@') {
            errors.add("email", "email is invalid");
        } else if self.students.email_exists(email, None).await? {
            errors.add("email", "email is already registered");
        }

        match input.program_id {
            None => errors.add("program_id", "program_id is required"),
            Some(program_id) => match self.students.find_program(program_id).await? {
                None => errors.add("program_id", "program does not exist"),
                Some(program) if !program.active => {
                    errors.add("program_id", "program is not active");
                }
                Some(_) => {}
            },
        }

        if input.due_date.is_none() {
            errors.add("due_date", "due_date is required");
        }

        let (Some(program_id), Some(due_date)) = (input.program_id, input.due_date) else {
            return Err(errors.into());
        };
        if errors.has_errors() {
            return Err(errors.into());
        }

        let new_student = NewStudentRow {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            discord_handle: input.discord_handle.clone(),
            program_id,
            payment_status: input.payment_status.unwrap_or_default().as_str().to_string(),
            onboarding_status: input
                .onboarding_status
                .unwrap_or_default()
                .as_str()
                .to_string(),
            discord_role_assigned: false,
            joined_date: input.joined_date.unwrap_or_else(|| Utc::now().date_naive()),
            due_date,
        };

        let audit = PendingAudit {
            kind: AuditKind::Created,
            payload: json!({ "name": name, "email": email }),
        };

        let detail = self.students.create_student(new_student, audit).await?;
        Ok(detail)
    }

    // ============================================================================
    // Lookup
    // ============================================================================

    /// Resolve a reference to an active student row.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no active student matches.
    #[instrument(skip(self))]
    pub async fn resolve(&self, reference: StudentRef) -> MentoraResult<StudentRow> {
        let found = match reference {
            StudentRef::Id(id) => self.students.find_by_id(id).await?,
            StudentRef::Uuid(uuid) => self.students.find_by_uuid(uuid).await?,
        };

        found.ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound).into())
    }

    /// Fetch a student with program, timeline, transactions, and role ledger
    /// entry eager-loaded.
    #[instrument(skip(self))]
    pub async fn get_detail(&self, reference: StudentRef) -> MentoraResult<StudentDetail> {
        let student = self.resolve(reference).await?;
        Ok(self.students.load_detail(student).await?)
    }

    /// List active students matching the filter, plus the total match count.
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &StudentFilter) -> MentoraResult<(Vec<StudentRow>, i64)> {
        Ok(self.students.list(filter).await?)
    }

    /// Aggregate counts across active students.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> MentoraResult<StudentStats> {
        Ok(self.students.stats().await?)
    }

    // ============================================================================
    // Mutation
    // ============================================================================

    /// Apply a partial update, recording the old-vs-new diff in the audit
    /// outbox.
    ///
    /// Fields whose requested value equals the stored value are dropped from
    /// the diff; a patch that changes nothing writes nothing and emits no
    /// audit events.
    #[instrument(skip(self, input))]
    pub async fn update_student(
        &self,
        reference: StudentRef,
        input: UpdateStudentInput,
    ) -> MentoraResult<StudentRow> {
        let existing = self.resolve(reference).await?;

        let mut errors = ValidationError::empty();
        let mut changed = serde_json::Map::new();
        let mut changeset = StudentChangeset::default();

        if let Some(ref name) = input.name {
            let name = name.trim();
            if name.is_empty() {
                errors.add("name", "name cannot be empty");
            } else if name != existing.name {
                changed.insert(
                    "name".to_string(),
                    json!({ "old": existing.name, "new": name }),
                );
                changeset.name = Some(name.to_string());
            }
        }

        if let Some(ref email) = input.email {
            let email = email.trim();
            if !email.contains('@') {
                errors.add("email", "email is invalid");
            } else if email != existing.email {
                if self.students.email_exists(email, Some(existing.id)).await? {
                    errors.add("email", "email is already registered");
                } else {
                    changed.insert(
                        "email".to_string(),
                        json!({ "old": existing.email, "new": email }),
                    );
                    changeset.email = Some(email.to_string());
                }
            }
        }

        if let Some(ref handle) = input.discord_handle {
            if *handle != existing.discord_handle {
                changed.insert(
                    "discord_handle".to_string(),
                    json!({ "old": existing.discord_handle, "new": handle }),
                );
                changeset.discord_handle = Some(handle.clone());
            }
        }

        if let Some(program_id) = input.program_id {
            if program_id != existing.program_id {
                if self.students.find_program(program_id).await?.is_none() {
                    errors.add("program_id", "program does not exist");
                } else {
                    changed.insert(
                        "program_id".to_string(),
                        json!({ "old": existing.program_id, "new": program_id }),
                    );
                    changeset.program_id = Some(program_id);
                }
            }
        }

        let old_payment = existing.payment_status()?;
        if let Some(payment) = input.payment_status {
            if payment != old_payment {
                changed.insert(
                    "payment_status".to_string(),
                    json!({ "old": old_payment.as_str(), "new": payment.as_str() }),
                );
                changeset.payment_status = Some(payment.as_str().to_string());
            }
        }

        let old_onboarding = existing.onboarding_status()?;
        if let Some(onboarding) = input.onboarding_status {
            if onboarding != old_onboarding {
                changed.insert(
                    "onboarding_status".to_string(),
                    json!({ "old": old_onboarding.as_str(), "new": onboarding.as_str() }),
                );
                changeset.onboarding_status = Some(onboarding.as_str().to_string());
            }
        }

        if let Some(assigned) = input.discord_role_assigned {
            if assigned != existing.discord_role_assigned {
                changed.insert(
                    "discord_role_assigned".to_string(),
                    json!({ "old": existing.discord_role_assigned, "new": assigned }),
                );
                changeset.discord_role_assigned = Some(assigned);
            }
        }

        if let Some(joined) = input.joined_date {
            if joined != existing.joined_date {
                changed.insert(
                    "joined_date".to_string(),
                    json!({ "old": existing.joined_date, "new": joined }),
                );
                changeset.joined_date = Some(joined);
            }
        }

        if let Some(due) = input.due_date {
            if due != existing.due_date {
                changed.insert(
                    "due_date".to_string(),
                    json!({ "old": existing.due_date, "new": due }),
                );
                changeset.due_date = Some(due);
            }
        }

        if let Some(reminder) = input.last_reminder_sent {
            if reminder != existing.last_reminder_sent {
                changed.insert(
                    "last_reminder_sent".to_string(),
                    json!({ "old": existing.last_reminder_sent, "new": reminder }),
                );
                changeset.last_reminder_sent = Some(reminder);
            }
        }

        if errors.has_errors() {
            return Err(errors.into());
        }

        if changed.is_empty() {
            return Ok(existing);
        }

        let name = changeset
            .name
            .clone()
            .unwrap_or_else(|| existing.name.clone());

        let mut events: Vec<NewOutboxRow> = vec![AuditEvent::for_student(
            AuditKind::Updated,
            existing.id,
            json!({ "name": name, "changed": changed }),
        )
        .into()];

        if let Some(entry) = changed.get("payment_status") {
            events.push(
                AuditEvent::for_student(
                    AuditKind::PaymentUpdated,
                    existing.id,
                    json!({
                        "name": name,
                        "old": entry["old"],
                        "new": entry["new"],
                    }),
                )
                .into(),
            );
        }

        if let Some(entry) = changed.get("onboarding_status") {
            events.push(
                AuditEvent::for_student(
                    AuditKind::OnboardingUpdated,
                    existing.id,
                    json!({
                        "name": name,
                        "old": entry["old"],
                        "new": entry["new"],
                    }),
                )
                .into(),
            );
        }

        let updated = self
            .students
            .update_student(existing.id, changeset, events)
            .await?;

        Ok(updated)
    }

    /// Directly set the onboarding status.
    ///
    /// Shares the diff/audit path with [`update_student`](Self::update_student)
    /// so the direct PATCH and the timeline recompute cannot drift.
    #[instrument(skip(self))]
    pub async fn set_onboarding_status(
        &self,
        reference: StudentRef,
        status: mentora_core::OnboardingStatus,
    ) -> MentoraResult<StudentRow> {
        self.update_student(reference, UpdateStudentInput::onboarding_only(status))
            .await
    }

    /// Soft-delete a student.
    #[instrument(skip(self))]
    pub async fn delete_student(&self, reference: StudentRef) -> MentoraResult<()> {
        let existing = self.resolve(reference).await?;

        let event: NewOutboxRow = AuditEvent::for_student(
            AuditKind::Deleted,
            existing.id,
            json!({ "name": existing.name, "email": existing.email }),
        )
        .into();

        self.students.soft_delete(existing.id, event).await?;
        Ok(())
    }

    /// Update one timeline step and recompute the student's onboarding
    /// status.
    ///
    /// A step that does not belong to the student is a not-found error.
    #[instrument(skip(self, patch))]
    pub async fn update_timeline_step(
        &self,
        reference: StudentRef,
        step_id: i32,
        patch: StepPatch,
    ) -> MentoraResult<StepUpdateOutcome> {
        let student = self.resolve(reference).await?;

        let changeset = TimelineStepChangeset {
            status: patch.status.map(|s| s.as_str().to_string()),
            timestamp_label: patch.timestamp_label,
            updated_at: None,
        };

        let outcome = self
            .students
            .update_timeline_step(student.id, step_id, changeset)
            .await?;

        Ok(outcome)
    }

    /// One batched status write across the given ids.
    ///
    /// # Errors
    ///
    /// Returns a validation error when neither status field is provided.
    /// Unknown ids are silently skipped.
    #[instrument(skip(self, input), fields(count = input.ids.len()))]
    pub async fn bulk_update(&self, input: BulkUpdateInput) -> MentoraResult<usize> {
        if input.payment_status.is_none() && input.onboarding_status.is_none() {
            return Err(ValidationError::single("payload", "no update data provided").into());
        }

        let changeset = StudentChangeset {
            payment_status: input.payment_status.map(|s| s.as_str().to_string()),
            onboarding_status: input.onboarding_status.map(|s| s.as_str().to_string()),
            ..Default::default()
        };

        let affected = self.students.bulk_update(&input.ids, changeset).await?;
        Ok(affected)
    }

    /// The underlying repository, for callers that need raw row access.
    pub fn repository(&self) -> &StudentRepository {
        &self.students
    }
}
