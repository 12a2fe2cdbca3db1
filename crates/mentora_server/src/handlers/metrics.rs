//! Operational metrics handlers.
//!
//! Thin read/seed endpoints; derived percentages are computed inline.

use crate::response::{ok, ApiResult};
use crate::state::AppState;

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::json;

/// Query parameters shared by the metrics endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsQuery {
    pub limit: Option<i64>,
}

impl MetricsQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

/// `GET /api/metrics/response-times`
pub async fn response_times(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> ApiResult {
    let rows = state.metrics.response_metrics(query.limit()).await?;
    Ok(ok(rows
        .into_iter()
        .map(|row| {
            json!({
                "id": row.id,
                "avg_response_minutes": row.avg_response_minutes,
                "measured_on": row.measured_on,
            })
        })
        .collect::<Vec<_>>()))
}

/// `GET /api/metrics/message-volumes`
pub async fn message_volumes(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> ApiResult {
    let rows = state.metrics.message_volumes(query.limit()).await?;
    Ok(ok(rows
        .into_iter()
        .map(|row| {
            json!({
                "id": row.id,
                "channel": row.channel,
                "message_count": row.message_count,
                "recorded_on": row.recorded_on,
            })
        })
        .collect::<Vec<_>>()))
}

/// `GET /api/metrics/inquiry-themes`
pub async fn inquiry_themes(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> ApiResult {
    let rows = state.metrics.inquiry_themes(query.limit()).await?;

    let total: i64 = rows.iter().map(|row| i64::from(row.inquiry_count)).sum();
    let themes = rows
        .into_iter()
        .map(|row| {
            let percentage = if total > 0 {
                ((f64::from(row.inquiry_count) / total as f64) * 100.0).round() as i64
            } else {
                0
            };
            json!({
                "id": row.id,
                "theme": row.theme,
                "inquiry_count": row.inquiry_count,
                "percentage": percentage,
            })
        })
        .collect::<Vec<_>>();

    Ok(ok(themes))
}

/// `GET /api/metrics/insights`
pub async fn insights(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> ApiResult {
    let rows = state.metrics.insights(query.limit()).await?;
    Ok(ok(rows
        .into_iter()
        .map(|row| {
            json!({
                "id": row.id,
                "title": row.title,
                "body": row.body,
                "category": row.category,
                "created_at": row.created_at,
            })
        })
        .collect::<Vec<_>>()))
}
