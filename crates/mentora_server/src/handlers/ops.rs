//! Notification and settings handlers.

use crate::response::{created, not_found, ok, ApiResult};
use crate::state::AppState;

use axum::extract::{Path, Query, State};
use axum::Json;
use mentora_database::NewNotificationRow;
use mentora_error::ValidationError;
use serde::Deserialize;
use serde_json::json;

/// Query parameters for the notification listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListQuery {
    pub unread_only: Option<bool>,
}

/// Creation payload for a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotificationInput {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// `GET /api/notifications`
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult {
    let rows = state
        .notifications
        .list(query.unread_only.unwrap_or(false))
        .await?;
    Ok(ok(rows
        .into_iter()
        .map(|row| {
            json!({
                "id": row.id,
                "title": row.title,
                "body": row.body,
                "read": row.read,
                "created_at": row.created_at,
            })
        })
        .collect::<Vec<_>>()))
}

/// `POST /api/notifications`
pub async fn create_notification(
    State(state): State<AppState>,
    Json(input): Json<NewNotificationInput>,
) -> ApiResult {
    let mut errors = ValidationError::empty();

    let title = input.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        errors.add("title", "title is required");
    }
    let body = input.body.as_deref().map(str::trim).unwrap_or_default();
    if body.is_empty() {
        errors.add("body", "body is required");
    }
    if errors.has_errors() {
        return Err(errors.into());
    }

    let row = state
        .notifications
        .create(NewNotificationRow {
            title: title.to_string(),
            body: body.to_string(),
            read: false,
        })
        .await?;

    Ok(created(json!({
        "id": row.id,
        "title": row.title,
        "body": row.body,
        "read": row.read,
        "created_at": row.created_at,
    })))
}

/// `PATCH /api/notifications/{id}/read`
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult {
    // A missing id surfaces as diesel NotFound, which maps to 404.
    let row = state.notifications.mark_read(id).await?;
    Ok(ok(json!({ "id": row.id, "read": row.read })))
}

/// `DELETE /api/notifications/{id}`
pub async fn delete_notification(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let removed = state.notifications.delete(id).await?;
    if removed == 0 {
        return Err(not_found());
    }
    Ok(crate::response::message("Notification deleted"))
}

/// `GET /api/settings`
pub async fn list_settings(State(state): State<AppState>) -> ApiResult {
    let rows = state.settings.list().await?;
    Ok(ok(rows
        .into_iter()
        .map(|row| {
            json!({
                "key": row.key,
                "value": row.value,
                "updated_at": row.updated_at,
            })
        })
        .collect::<Vec<_>>()))
}

/// `PUT /api/settings/{key}`
pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> ApiResult {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::single("key", "key is required").into());
    }

    let row = state.settings.upsert(key, value).await?;
    Ok(ok(json!({
        "key": row.key,
        "value": row.value,
        "updated_at": row.updated_at,
    })))
}
