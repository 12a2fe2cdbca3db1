//! Wire-format DTOs for API responses.
//!
//! Rows come out of the database with text status columns; conversion into
//! these DTOs parses every status into its closed enum, so an unknown stored
//! value fails loudly instead of leaking through the API.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use mentora_core::{
    LogLevel, OnboardingStatus, PaymentMethod, PaymentStatus, StepStatus, SyncStatus,
    TransactionStatus,
};
use mentora_database::{
    DiscordRoleRow, ProgramRow, StudentDetail, StudentRow, SystemLogRow, TimelineStepRow,
    TransactionRow,
};
use mentora_error::DatabaseError;
use serde::Serialize;
use uuid::Uuid;

/// A student as rendered on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiStudent {
    pub id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub discord_handle: Option<String>,
    pub program_id: i32,
    pub payment_status: PaymentStatus,
    pub onboarding_status: OnboardingStatus,
    pub discord_role_assigned: bool,
    pub joined_date: NaiveDate,
    pub due_date: NaiveDate,
    pub last_reminder_sent: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<StudentRow> for ApiStudent {
    type Error = DatabaseError;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        let payment_status = row.payment_status()?;
        let onboarding_status = row.onboarding_status()?;
        Ok(Self {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            email: row.email,
            discord_handle: row.discord_handle,
            program_id: row.program_id,
            payment_status,
            onboarding_status,
            discord_role_assigned: row.discord_role_assigned,
            joined_date: row.joined_date,
            due_date: row.due_date,
            last_reminder_sent: row.last_reminder_sent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A program as rendered on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiProgram {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub duration_weeks: Option<i32>,
    pub active: bool,
}

impl From<ProgramRow> for ApiProgram {
    fn from(row: ProgramRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            duration_weeks: row.duration_weeks,
            active: row.active,
        }
    }
}

/// A timeline step as rendered on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiTimelineStep {
    pub id: i32,
    pub student_id: i32,
    pub label: String,
    pub status: StepStatus,
    pub timestamp_label: Option<String>,
    pub sort_order: i32,
}

impl TryFrom<TimelineStepRow> for ApiTimelineStep {
    type Error = DatabaseError;

    fn try_from(row: TimelineStepRow) -> Result<Self, Self::Error> {
        let status = row.status()?;
        Ok(Self {
            id: row.id,
            student_id: row.student_id,
            label: row.label,
            status,
            timestamp_label: row.timestamp_label,
            sort_order: row.sort_order,
        })
    }
}

/// A transaction as rendered on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiTransaction {
    pub id: i32,
    pub student_id: i32,
    pub amount: BigDecimal,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: TransactionStatus,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for ApiTransaction {
    type Error = DatabaseError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let method = row.method()?;
        let status = row.status()?;
        Ok(Self {
            id: row.id,
            student_id: row.student_id,
            amount: row.amount,
            currency: row.currency,
            method,
            status,
            reference: row.reference,
            paid_at: row.paid_at,
            created_at: row.created_at,
        })
    }
}

/// A Discord role ledger entry as rendered on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDiscordRole {
    pub id: i32,
    pub student_id: i32,
    pub role_name: String,
    pub sync_status: SyncStatus,
    pub retry_count: i32,
    pub error_message: Option<String>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl TryFrom<DiscordRoleRow> for ApiDiscordRole {
    type Error = DatabaseError;

    fn try_from(row: DiscordRoleRow) -> Result<Self, Self::Error> {
        let sync_status = row.sync_status()?;
        Ok(Self {
            id: row.id,
            student_id: row.student_id,
            role_name: row.role_name,
            sync_status,
            retry_count: row.retry_count,
            error_message: row.error_message,
            last_sync_at: row.last_sync_at,
        })
    }
}

/// A system log entry as rendered on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiSystemLog {
    pub id: i32,
    pub level: LogLevel,
    pub module: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
    pub user_id: Option<i32>,
    pub student_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SystemLogRow> for ApiSystemLog {
    type Error = DatabaseError;

    fn try_from(row: SystemLogRow) -> Result<Self, Self::Error> {
        let level = row.level()?;
        Ok(Self {
            id: row.id,
            level,
            module: row.module,
            message: row.message,
            context: row.context,
            user_id: row.user_id,
            student_id: row.student_id,
            created_at: row.created_at,
        })
    }
}

/// A student with associations eager-loaded, as rendered on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiStudentDetail {
    #[serde(flatten)]
    pub student: ApiStudent,
    pub program: ApiProgram,
    pub timeline_steps: Vec<ApiTimelineStep>,
    pub transactions: Vec<ApiTransaction>,
    pub discord_role: Option<ApiDiscordRole>,
}

impl TryFrom<StudentDetail> for ApiStudentDetail {
    type Error = DatabaseError;

    fn try_from(detail: StudentDetail) -> Result<Self, Self::Error> {
        let student = ApiStudent::try_from(detail.student)?;
        let program = ApiProgram::from(detail.program);
        let timeline_steps = detail
            .timeline
            .into_iter()
            .map(ApiTimelineStep::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let transactions = detail
            .transactions
            .into_iter()
            .map(ApiTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let discord_role = detail
            .discord_role
            .map(ApiDiscordRole::try_from)
            .transpose()?;

        Ok(Self {
            student,
            program,
            timeline_steps,
            transactions,
            discord_role,
        })
    }
}
