//! REST API server for the Mentora back office.
//!
//! Stateless axum handlers over the lifecycle service and repositories,
//! wrapped in a uniform `{success, data?, message?, errors?}` envelope.

#![forbid(unsafe_code)]

mod config;
mod dto;
mod handlers;
mod response;
mod routes;
mod state;

pub use config::ServerConfig;
pub use dto::{
    ApiDiscordRole, ApiProgram, ApiStudent, ApiStudentDetail, ApiSystemLog, ApiTimelineStep,
    ApiTransaction,
};
pub use response::{ApiError, ApiResult, Envelope};
pub use routes::create_router;
pub use state::AppState;
