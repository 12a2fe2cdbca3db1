//! Route table for the REST API.

use crate::handlers::{discord, logs, metrics, ops, reports, students, transactions};
use crate::state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use serde_json::json;

/// Build the full API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Students
        .route(
            "/api/students",
            get(students::list_students).post(students::create_student),
        )
        .route("/api/students/stats", get(students::student_stats))
        .route("/api/students/bulk-update", post(students::bulk_update))
        .route(
            "/api/students/:reference",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route(
            "/api/students/:reference/onboarding-status",
            patch(students::patch_onboarding_status),
        )
        .route(
            "/api/students/:reference/timeline/:step_id",
            patch(students::patch_timeline_step),
        )
        // Transactions
        .route(
            "/api/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/api/transactions/:id",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        // Discord role ledger
        .route(
            "/api/discord-roles",
            get(discord::list_discord_roles).post(discord::create_discord_role),
        )
        .route("/api/discord-roles/:id", put(discord::update_discord_role))
        .route(
            "/api/discord-roles/:id/mark-synced",
            post(discord::mark_synced),
        )
        .route(
            "/api/discord-roles/:id/mark-failed",
            post(discord::mark_failed),
        )
        // System logs
        .route("/api/logs", get(logs::list_logs).delete(logs::truncate_logs))
        .route("/api/logs/prune", delete(logs::prune_logs))
        // Operational metrics
        .route("/api/metrics/response-times", get(metrics::response_times))
        .route("/api/metrics/message-volumes", get(metrics::message_volumes))
        .route("/api/metrics/inquiry-themes", get(metrics::inquiry_themes))
        .route("/api/metrics/insights", get(metrics::insights))
        // Notifications and settings
        .route(
            "/api/notifications",
            get(ops::list_notifications).post(ops::create_notification),
        )
        .route(
            "/api/notifications/:id/read",
            patch(ops::mark_notification_read),
        )
        .route("/api/notifications/:id", delete(ops::delete_notification))
        .route("/api/settings", get(ops::list_settings))
        .route("/api/settings/:key", put(ops::put_setting))
        // Reports and dashboard
        .route("/api/reports", get(reports::reports))
        .route("/api/dashboard", get(reports::dashboard))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
