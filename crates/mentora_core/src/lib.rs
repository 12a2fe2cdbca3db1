//! Core domain types for the Mentora back office.
//!
//! Pure data definitions shared by every other crate in the workspace: the
//! closed status vocabularies, the audit event vocabulary with its static
//! message/severity mapping, and the single authoritative rule deriving a
//! student's onboarding status from timeline completion.
//!
//! This crate performs no I/O and has no database dependency.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod log;
mod payment;
mod status;
mod sync;
mod timeline;

pub use audit::{render_event, AuditEvent, AuditKind, RenderedAudit, AUDIT_MODULE_STUDENTS};
pub use log::LogLevel;
pub use payment::{PaymentMethod, TransactionStatus};
pub use status::{OnboardingStatus, PaymentStatus, StepStatus};
pub use sync::SyncStatus;
pub use timeline::{derive_onboarding_status, default_timeline, TimelineSeed};
