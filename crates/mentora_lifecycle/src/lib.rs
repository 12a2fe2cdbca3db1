//! Student lifecycle orchestration for the Mentora back office.
//!
//! Two halves:
//!
//! - [`LifecycleService`]: validation, diff computation, and the audit event
//!   payloads for every student lifecycle operation. Primary writes and
//!   their audit events commit in one transaction via the repository layer.
//! - [`OutboxDispatcher`]: background drain of the audit outbox into the
//!   system log.

#![forbid(unsafe_code)]

mod dispatcher;
mod input;
mod service;

pub use dispatcher::{DrainReport, OutboxDispatcher};
pub use input::{BulkUpdateInput, NewStudentInput, StepPatch, StudentRef, UpdateStudentInput};
pub use service::LifecycleService;
