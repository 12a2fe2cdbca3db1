//! System log read and retention handlers.

use crate::dto::ApiSystemLog;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use mentora_core::LogLevel;
use mentora_database::{LogFilter, DEFAULT_RETENTION_DAYS};
use serde::Deserialize;
use serde_json::json;

/// Query parameters for the log listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogListQuery {
    pub level: Option<LogLevel>,
    pub module: Option<String>,
    pub search: Option<String>,
    pub student_id: Option<i32>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for the prune endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PruneQuery {
    pub days: Option<i64>,
}

/// `GET /api/logs`
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogListQuery>,
) -> ApiResult {
    let filter = LogFilter {
        level: query.level,
        module: query.module,
        search: query.search,
        student_id: query.student_id,
        since: query.since,
        until: query.until,
        limit: Some(query.limit.unwrap_or(50).clamp(1, 500)),
        offset: query.offset,
    };

    let rows = state.logs.list(&filter).await?;
    let logs = rows
        .into_iter()
        .map(ApiSystemLog::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ok(logs))
}

/// `DELETE /api/logs/prune?days=N`
pub async fn prune_logs(
    State(state): State<AppState>,
    Query(query): Query<PruneQuery>,
) -> ApiResult {
    let days = query.days.unwrap_or(DEFAULT_RETENTION_DAYS).max(0);
    let removed = state.logs.prune(days).await?;
    Ok(ok(json!({ "removed": removed, "days": days })))
}

/// `DELETE /api/logs`
pub async fn truncate_logs(State(state): State<AppState>) -> ApiResult {
    let removed = state.logs.truncate().await?;
    Ok(ok(json!({ "removed": removed })))
}
