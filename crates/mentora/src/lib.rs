//! Unified surface for the Mentora back office.
//!
//! Re-exports the domain types, database layer, lifecycle service, and API
//! server so consumers and integration tests can depend on one crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use mentora::{establish_connection, LifecycleService, NewStudentInput};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = establish_connection()?;
//! let service = LifecycleService::new(conn);
//! let detail = service.create_student(NewStudentInput::default()).await?;
//! # Ok(())
//! # }
//! ```

// Error types
pub use mentora_error::{
    ConfigError, DatabaseError, DatabaseErrorKind, MentoraError, MentoraErrorKind, MentoraResult,
    ValidationError,
};

// Domain types
pub use mentora_core::{
    default_timeline, derive_onboarding_status, render_event, AuditEvent, AuditKind, LogLevel,
    OnboardingStatus, PaymentMethod, PaymentStatus, RenderedAudit, StepStatus, SyncStatus,
    TimelineSeed, TransactionStatus,
};

// Database layer
pub use mentora_database::{
    establish_connection, run_migrations, DiscordRoleRepository, DiscordRoleRow, LogFilter,
    MetricsRepository, NewStudentRow, NewSystemLogRow, NotificationRepository, OutboxRepository,
    OutboxRow, ProgramRow, SettingsRepository, StudentDetail, StudentFilter, StudentRepository,
    StudentRow, StudentStats, SystemLogRepository, SystemLogRow, TimelineStepRow,
    TransactionRepository, TransactionRow, DEFAULT_RETENTION_DAYS,
};

// Lifecycle service
pub use mentora_lifecycle::{
    BulkUpdateInput, DrainReport, LifecycleService, NewStudentInput, OutboxDispatcher, StepPatch,
    StudentRef, UpdateStudentInput,
};

// API server
pub use mentora_server::{create_router, AppState, ServerConfig};
