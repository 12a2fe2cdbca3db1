//! PostgreSQL repository for students and their timeline steps.
//!
//! All status-changing writes pair the primary statement with the matching
//! audit outbox rows inside one transaction, so the audit trail cannot drift
//! from student state.

use crate::schema::{audit_outbox, programs, students, timeline_steps};
use crate::{
    DatabaseResult, NewOutboxRow, NewProgramRow, NewStudentRow, NewTimelineStepRow, PendingAudit,
    ProgramRow, StudentChangeset, StudentDetail, StudentRow, TimelineStepChangeset,
    TimelineStepRow,
};

use chrono::{Duration, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_core::{
    default_timeline, derive_onboarding_status, AuditKind, OnboardingStatus, PaymentStatus,
    StepStatus,
};
use mentora_error::{DatabaseError, DatabaseErrorKind};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

/// Columns the listing endpoint may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudentSortKey {
    Name,
    Email,
    JoinedDate,
    DueDate,
    PaymentStatus,
    OnboardingStatus,
    #[default]
    CreatedAt,
}

/// Sort direction for the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Filters for the student listing endpoint.
///
/// Soft-deleted rows are always excluded. Construct with struct-update
/// syntax: `StudentFilter { overdue: Some(true), ..Default::default() }`.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub payment_status: Option<PaymentStatus>,
    pub onboarding_status: Option<OnboardingStatus>,
    pub program_id: Option<i32>,
    /// Past due date and not Paid
    pub overdue: Option<bool>,
    /// Due date falls within the next N days
    pub due_within_days: Option<i64>,
    /// Free-text search over name and email
    pub search: Option<String>,
    pub sort_key: StudentSortKey,
    pub sort_direction: SortDirection,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Aggregate counts for the stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StudentStats {
    pub total: i64,
    pub paid: i64,
    pub pending: i64,
    pub failed: i64,
    pub not_started: i64,
    pub in_progress: i64,
    pub completed: i64,
    /// `round(paid / total * 100)`, 0 when there are no students
    pub paid_percentage: i64,
}

/// Outcome of a timeline step update, including the recompute result.
#[derive(Debug, Clone)]
pub struct StepUpdateOutcome {
    pub step: TimelineStepRow,
    pub old_status: OnboardingStatus,
    pub new_status: OnboardingStatus,
}

/// PostgreSQL repository for student lifecycle data.
///
/// # Example
/// ```no_run
/// use mentora_database::{establish_connection, StudentRepository};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let conn = establish_connection()?;
///     let repo = StudentRepository::new(conn);
///     // Use repo.create_student(), list(), etc.
///     Ok(())
/// }
/// ```
pub struct StudentRepository {
    /// Database connection wrapped in Arc<Mutex> for async safety.
    ///
    /// Note: This is a simple implementation. For production use with high
    /// concurrency, consider using a connection pool like r2d2 or deadpool.
    conn: Arc<Mutex<PgConnection>>,
}

impl StudentRepository {
    /// Create a new student repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    // ============================================================================
    // Creation
    // ============================================================================

    /// Insert a student, their four seed timeline steps, and the `created`
    /// audit event in one transaction.
    ///
    /// On any failure the whole creation rolls back; there is no partial
    /// state.
    #[instrument(skip(self, new_student, audit), fields(email = %new_student.email))]
    pub async fn create_student(
        &self,
        new_student: NewStudentRow,
        audit: PendingAudit,
    ) -> DatabaseResult<StudentDetail> {
        let mut conn = self.conn.lock().await;

        let (student, timeline) = conn.transaction::<_, DatabaseError, _>(|conn| {
            let student: StudentRow = diesel::insert_into(students::table)
                .values(&new_student)
                .get_result(conn)?;

            let seeds = default_timeline();
            let new_steps: Vec<NewTimelineStepRow> = seeds
                .iter()
                .enumerate()
                .map(|(idx, seed)| NewTimelineStepRow {
                    student_id: student.id,
                    label: seed.label.to_string(),
                    status: seed.status.as_str().to_string(),
                    timestamp_label: None,
                    sort_order: idx as i32 + 1,
                })
                .collect();

            let timeline: Vec<TimelineStepRow> = diesel::insert_into(timeline_steps::table)
                .values(&new_steps)
                .get_results(conn)?;

            diesel::insert_into(audit_outbox::table)
                .values(&audit.bind(student.id))
                .execute(conn)?;

            Ok((student, timeline))
        })?;

        let program: ProgramRow = programs::table
            .find(student.program_id)
            .first(&mut *conn)
            .map_err(DatabaseError::from)?;

        tracing::info!(
            id = student.id,
            uuid = %student.uuid,
            "Created student with seeded timeline"
        );

        Ok(StudentDetail {
            student,
            program,
            timeline,
            transactions: Vec::new(),
            discord_role: None,
        })
    }

    // ============================================================================
    // Lookup
    // ============================================================================

    /// Find an active student by internal id.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<StudentRow>> {
        let mut conn = self.conn.lock().await;

        students::table
            .find(id)
            .filter(students::deleted_at.is_null())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Find an active student by external uuid.
    #[instrument(skip(self))]
    pub async fn find_by_uuid(&self, uuid: Uuid) -> DatabaseResult<Option<StudentRow>> {
        let mut conn = self.conn.lock().await;

        students::table
            .filter(students::uuid.eq(uuid))
            .filter(students::deleted_at.is_null())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Eager-load the program, timeline, transactions, and role ledger entry
    /// for a student row.
    #[instrument(skip(self, student), fields(id = student.id))]
    pub async fn load_detail(&self, student: StudentRow) -> DatabaseResult<StudentDetail> {
        use crate::schema::{discord_roles, transactions};

        let mut conn = self.conn.lock().await;

        let program: ProgramRow = programs::table
            .find(student.program_id)
            .first(&mut *conn)
            .map_err(DatabaseError::from)?;

        let timeline: Vec<TimelineStepRow> = timeline_steps::table
            .filter(timeline_steps::student_id.eq(student.id))
            .order(timeline_steps::sort_order.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;

        let txns: Vec<crate::TransactionRow> = transactions::table
            .filter(transactions::student_id.eq(student.id))
            .order(transactions::created_at.desc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;

        let discord_role: Option<crate::DiscordRoleRow> = discord_roles::table
            .filter(discord_roles::student_id.eq(student.id))
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;

        Ok(StudentDetail {
            student,
            program,
            timeline,
            transactions: txns,
            discord_role,
        })
    }

    /// Whether an email is already registered (soft-deleted rows included;
    /// the unique constraint is global).
    #[instrument(skip(self))]
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> DatabaseResult<bool> {
        let mut conn = self.conn.lock().await;

        let mut query = students::table
            .filter(students::email.eq(email))
            .into_boxed();
        if let Some(id) = exclude_id {
            query = query.filter(students::id.ne(id));
        }

        let count: i64 = query
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(count > 0)
    }

    /// Find a program by id.
    #[instrument(skip(self))]
    pub async fn find_program(&self, id: i32) -> DatabaseResult<Option<ProgramRow>> {
        let mut conn = self.conn.lock().await;

        programs::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Create a program.
    #[instrument(skip(self, new_program), fields(name = %new_program.name))]
    pub async fn create_program(&self, new_program: NewProgramRow) -> DatabaseResult<ProgramRow> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(programs::table)
            .values(&new_program)
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// List every program.
    #[instrument(skip(self))]
    pub async fn list_programs(&self) -> DatabaseResult<Vec<ProgramRow>> {
        let mut conn = self.conn.lock().await;

        programs::table
            .order(programs::name.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Active student counts per program id.
    #[instrument(skip(self))]
    pub async fn program_distribution(&self) -> DatabaseResult<Vec<(i32, i64)>> {
        let mut conn = self.conn.lock().await;

        students::table
            .filter(students::deleted_at.is_null())
            .group_by(students::program_id)
            .select((students::program_id, diesel::dsl::count_star()))
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    // ============================================================================
    // Listing and stats
    // ============================================================================

    /// List active students matching the filter, plus the total match count.
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &StudentFilter) -> DatabaseResult<(Vec<StudentRow>, i64)> {
        let mut conn = self.conn.lock().await;

        let total: i64 = Self::filtered(filter)
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;

        let mut query = Self::filtered(filter);
        query = match (filter.sort_key, filter.sort_direction) {
            (StudentSortKey::Name, SortDirection::Asc) => query.order(students::name.asc()),
            (StudentSortKey::Name, SortDirection::Desc) => query.order(students::name.desc()),
            (StudentSortKey::Email, SortDirection::Asc) => query.order(students::email.asc()),
            (StudentSortKey::Email, SortDirection::Desc) => query.order(students::email.desc()),
            (StudentSortKey::JoinedDate, SortDirection::Asc) => {
                query.order(students::joined_date.asc())
            }
            (StudentSortKey::JoinedDate, SortDirection::Desc) => {
                query.order(students::joined_date.desc())
            }
            (StudentSortKey::DueDate, SortDirection::Asc) => query.order(students::due_date.asc()),
            (StudentSortKey::DueDate, SortDirection::Desc) => {
                query.order(students::due_date.desc())
            }
            (StudentSortKey::PaymentStatus, SortDirection::Asc) => {
                query.order(students::payment_status.asc())
            }
            (StudentSortKey::PaymentStatus, SortDirection::Desc) => {
                query.order(students::payment_status.desc())
            }
            (StudentSortKey::OnboardingStatus, SortDirection::Asc) => {
                query.order(students::onboarding_status.asc())
            }
            (StudentSortKey::OnboardingStatus, SortDirection::Desc) => {
                query.order(students::onboarding_status.desc())
            }
            (StudentSortKey::CreatedAt, SortDirection::Asc) => {
                query.order(students::created_at.asc())
            }
            (StudentSortKey::CreatedAt, SortDirection::Desc) => {
                query.order(students::created_at.desc())
            }
        };

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        if let Some(offset) = filter.offset {
            query = query.offset(offset);
        }

        let rows: Vec<StudentRow> = query.load(&mut *conn).map_err(DatabaseError::from)?;

        Ok((rows, total))
    }

    fn filtered(filter: &StudentFilter) -> students::BoxedQuery<'static, diesel::pg::Pg> {
        let mut query = students::table
            .filter(students::deleted_at.is_null())
            .into_boxed();

        if let Some(status) = filter.payment_status {
            query = query.filter(students::payment_status.eq(status.as_str()));
        }
        if let Some(status) = filter.onboarding_status {
            query = query.filter(students::onboarding_status.eq(status.as_str()));
        }
        if let Some(program_id) = filter.program_id {
            query = query.filter(students::program_id.eq(program_id));
        }
        if filter.overdue == Some(true) {
            let today = Utc::now().date_naive();
            query = query
                .filter(students::due_date.lt(today))
                .filter(students::payment_status.ne(PaymentStatus::Paid.as_str()));
        }
        if let Some(days) = filter.due_within_days {
            let today = Utc::now().date_naive();
            query = query
                .filter(students::due_date.ge(today))
                .filter(students::due_date.le(today + Duration::days(days)));
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{search}%");
            query = query.filter(
                students::name
                    .ilike(pattern.clone())
                    .or(students::email.ilike(pattern)),
            );
        }

        query
    }

    /// Aggregate counts across active students.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> DatabaseResult<StudentStats> {
        let mut conn = self.conn.lock().await;

        let active = students::table.filter(students::deleted_at.is_null());

        let total: i64 = active.count().get_result(&mut *conn).map_err(DatabaseError::from)?;

        let mut payment = [0i64; 3];
        for (slot, status) in payment.iter_mut().zip([
            PaymentStatus::Paid,
            PaymentStatus::Pending,
            PaymentStatus::Failed,
        ]) {
            *slot = active
                .filter(students::payment_status.eq(status.as_str()))
                .count()
                .get_result(&mut *conn)
                .map_err(DatabaseError::from)?;
        }

        let mut onboarding = [0i64; 3];
        for (slot, status) in onboarding.iter_mut().zip([
            OnboardingStatus::NotStarted,
            OnboardingStatus::InProgress,
            OnboardingStatus::Completed,
        ]) {
            *slot = active
                .filter(students::onboarding_status.eq(status.as_str()))
                .count()
                .get_result(&mut *conn)
                .map_err(DatabaseError::from)?;
        }

        let paid_percentage = if total > 0 {
            ((payment[0] as f64 / total as f64) * 100.0).round() as i64
        } else {
            0
        };

        Ok(StudentStats {
            total,
            paid: payment[0],
            pending: payment[1],
            failed: payment[2],
            not_started: onboarding[0],
            in_progress: onboarding[1],
            completed: onboarding[2],
            paid_percentage,
        })
    }

    // ============================================================================
    // Mutation
    // ============================================================================

    /// Apply a partial update and append the given audit events, all in one
    /// transaction.
    #[instrument(skip(self, changeset, events), fields(id = id))]
    pub async fn update_student(
        &self,
        id: i32,
        mut changeset: StudentChangeset,
        events: Vec<NewOutboxRow>,
    ) -> DatabaseResult<StudentRow> {
        let mut conn = self.conn.lock().await;

        changeset.updated_at = Some(Utc::now());

        conn.transaction::<_, DatabaseError, _>(|conn| {
            let student: StudentRow = diesel::update(
                students::table
                    .find(id)
                    .filter(students::deleted_at.is_null()),
            )
            .set(&changeset)
            .get_result(conn)?;

            if !events.is_empty() {
                diesel::insert_into(audit_outbox::table)
                    .values(&events)
                    .execute(conn)?;
            }

            Ok(student)
        })
    }

    /// Soft-delete a student and append the `deleted` audit event in one
    /// transaction. The row is retained and excluded from default queries;
    /// child rows stay readable (financial/audit retention).
    #[instrument(skip(self, event), fields(id = id))]
    pub async fn soft_delete(&self, id: i32, event: NewOutboxRow) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        let now = Utc::now();
        conn.transaction::<_, DatabaseError, _>(|conn| {
            let affected = diesel::update(
                students::table
                    .find(id)
                    .filter(students::deleted_at.is_null()),
            )
            .set((
                students::deleted_at.eq(now),
                students::updated_at.eq(now),
            ))
            .execute(conn)?;

            if affected == 0 {
                return Err(DatabaseError::new(DatabaseErrorKind::NotFound));
            }

            diesel::insert_into(audit_outbox::table)
                .values(&event)
                .execute(conn)?;

            Ok(())
        })
    }

    /// Update one timeline step and recompute the owning student's
    /// onboarding status in the same transaction.
    ///
    /// A step id that does not belong to the student is a not-found error.
    /// When the derived status differs from the stored one, the student row
    /// is updated and an `onboarding_updated` event appended.
    #[instrument(skip(self, changeset), fields(student_id = student_id, step_id = step_id))]
    pub async fn update_timeline_step(
        &self,
        student_id: i32,
        step_id: i32,
        mut changeset: TimelineStepChangeset,
    ) -> DatabaseResult<StepUpdateOutcome> {
        let mut conn = self.conn.lock().await;

        changeset.updated_at = Some(Utc::now());

        conn.transaction::<_, DatabaseError, _>(|conn| {
            let student: StudentRow = students::table
                .find(student_id)
                .filter(students::deleted_at.is_null())
                .first(conn)?;

            let step: TimelineStepRow = diesel::update(
                timeline_steps::table
                    .find(step_id)
                    .filter(timeline_steps::student_id.eq(student_id)),
            )
            .set(&changeset)
            .get_result(conn)?;

            let statuses: Vec<String> = timeline_steps::table
                .filter(timeline_steps::student_id.eq(student_id))
                .select(timeline_steps::status)
                .load(conn)?;
            let statuses = statuses
                .iter()
                .map(|s| {
                    StepStatus::parse_str(s).ok_or_else(|| {
                        DatabaseError::new(DatabaseErrorKind::UnknownStatus(
                            s.clone(),
                            "timeline_steps.status".to_string(),
                        ))
                    })
                })
                .collect::<Result<Vec<StepStatus>, DatabaseError>>()?;

            let old_status = student.onboarding_status()?;
            let new_status = derive_onboarding_status(&statuses);

            if new_status != old_status {
                diesel::update(students::table.find(student_id))
                    .set((
                        students::onboarding_status.eq(new_status.as_str()),
                        students::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)?;

                let event = NewOutboxRow {
                    kind: AuditKind::OnboardingUpdated.as_str().to_string(),
                    payload: serde_json::json!({
                        "name": student.name,
                        "old": old_status.as_str(),
                        "new": new_status.as_str(),
                    }),
                    student_id: Some(student_id),
                };
                diesel::insert_into(audit_outbox::table)
                    .values(&event)
                    .execute(conn)?;
            }

            Ok(StepUpdateOutcome {
                step,
                old_status,
                new_status,
            })
        })
    }

    /// One batched status write across the given ids.
    ///
    /// Unknown ids are silently skipped; returns the affected-row count. No
    /// per-row audit trail is produced.
    #[instrument(skip(self, changeset), fields(count = ids.len()))]
    pub async fn bulk_update(
        &self,
        ids: &[i32],
        mut changeset: StudentChangeset,
    ) -> DatabaseResult<usize> {
        let mut conn = self.conn.lock().await;

        changeset.updated_at = Some(Utc::now());

        diesel::update(
            students::table
                .filter(students::id.eq_any(ids))
                .filter(students::deleted_at.is_null()),
        )
        .set(&changeset)
        .execute(&mut *conn)
        .map_err(DatabaseError::from)
    }

    /// Fetch a student row ignoring the soft-delete filter. Used by
    /// retention tooling and tests; default read paths exclude deleted rows.
    #[instrument(skip(self))]
    pub async fn find_by_id_unfiltered(&self, id: i32) -> DatabaseResult<Option<StudentRow>> {
        let mut conn = self.conn.lock().await;

        students::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }
}
