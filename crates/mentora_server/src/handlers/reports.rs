//! Analytics aggregates and the dashboard summary.

use crate::dto::ApiSystemLog;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

use axum::extract::State;
use mentora_database::{LogFilter, StudentFilter};
use serde_json::json;
use std::collections::HashMap;

/// `GET /api/reports`
///
/// Program distribution, payment mix, and the onboarding funnel in one
/// payload.
pub async fn reports(State(state): State<AppState>) -> ApiResult {
    let stats = state.lifecycle.stats().await?;

    let programs = state.lifecycle.repository().list_programs().await?;
    let distribution = state.lifecycle.repository().program_distribution().await?;
    let counts: HashMap<i32, i64> = distribution.into_iter().collect();

    let program_breakdown = programs
        .iter()
        .map(|program| {
            json!({
                "program_id": program.id,
                "name": program.name,
                "students": counts.get(&program.id).copied().unwrap_or(0),
            })
        })
        .collect::<Vec<_>>();

    Ok(ok(json!({
        "total_students": stats.total,
        "payment": {
            "paid": stats.paid,
            "pending": stats.pending,
            "failed": stats.failed,
            "paid_percentage": stats.paid_percentage,
        },
        "onboarding": {
            "not_started": stats.not_started,
            "in_progress": stats.in_progress,
            "completed": stats.completed,
        },
        "programs": program_breakdown,
    })))
}

/// `GET /api/dashboard`
///
/// Summary card payload: student stats, overdue count, recent log entries.
pub async fn dashboard(State(state): State<AppState>) -> ApiResult {
    let stats = state.lifecycle.stats().await?;

    let overdue_filter = StudentFilter {
        overdue: Some(true),
        limit: Some(0),
        ..Default::default()
    };
    let (_, overdue_count) = state.lifecycle.list(&overdue_filter).await?;

    let recent = state
        .logs
        .list(&LogFilter {
            limit: Some(10),
            ..Default::default()
        })
        .await?;
    let recent_logs = recent
        .into_iter()
        .map(ApiSystemLog::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ok(json!({
        "stats": stats,
        "overdue_count": overdue_count,
        "recent_logs": recent_logs,
    })))
}
