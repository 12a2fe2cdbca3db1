//! PostgreSQL integration for the Mentora back office.
//!
//! This crate provides database models, schema definitions, and repository
//! implementations for the student lifecycle, payment ledger, Discord role
//! ledger, system log, audit outbox, and operational metrics fixtures.
//!
//! # Features
//!
//! - Diesel-based PostgreSQL integration
//! - Transactional pairing of primary writes with audit outbox rows
//! - Soft-delete semantics for students
//! - Seed-on-empty metrics fixtures
//!
//! # Example
//!
//! ```rust,ignore
//! use mentora_database::{establish_connection, StudentRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = establish_connection()?;
//! let repo = StudentRepository::new(conn);
//!
//! // Use repository...
//! # Ok(())
//! # }
//! ```

mod connection;
mod discord_models;
mod discord_repository;
mod log_models;
mod log_repository;
mod metrics_models;
mod metrics_repository;
mod ops_repository;
mod outbox_models;
mod outbox_repository;
mod student_models;
mod student_repository;
mod transaction_models;
mod transaction_repository;

// Public module for external access
pub mod schema;

// Re-export connection utilities
pub use connection::{establish_connection, run_migrations, MIGRATIONS};

// Re-export student types
pub use student_models::{
    NewProgramRow, NewStudentRow, NewTimelineStepRow, ProgramRow, StudentChangeset, StudentDetail,
    StudentRow, TimelineStepChangeset, TimelineStepRow,
};
pub use student_repository::{
    SortDirection, StepUpdateOutcome, StudentFilter, StudentRepository, StudentSortKey,
    StudentStats,
};

// Re-export transaction types
pub use transaction_models::{NewTransactionRow, TransactionChangeset, TransactionRow};
pub use transaction_repository::{TransactionFilter, TransactionRepository};

// Re-export Discord ledger types
pub use discord_models::{DiscordRoleChangeset, DiscordRoleRow, NewDiscordRoleRow};
pub use discord_repository::DiscordRoleRepository;

// Re-export system log types
pub use log_models::{LogFilter, NewSystemLogRow, SystemLogRow};
pub use log_repository::{SystemLogRepository, DEFAULT_RETENTION_DAYS};

// Re-export outbox types
pub use outbox_models::{NewOutboxRow, OutboxRow, PendingAudit};
pub use outbox_repository::OutboxRepository;

// Re-export metrics and ops types
pub use metrics_models::{
    InquiryThemeRow, InsightRow, MessageVolumeRow, NewInquiryThemeRow, NewInsightRow,
    NewMessageVolumeRow, NewNotificationRow, NewResponseMetricRow, NewSettingRow, NotificationRow,
    ResponseMetricRow, SettingRow,
};
pub use metrics_repository::MetricsRepository;
pub use ops_repository::{NotificationRepository, SettingsRepository};

use mentora_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
