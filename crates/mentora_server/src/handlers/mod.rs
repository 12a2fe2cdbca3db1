//! Request handlers, one module per API surface.

pub mod discord;
pub mod logs;
pub mod metrics;
pub mod ops;
pub mod reports;
pub mod students;
pub mod transactions;
