//! Discord role ledger handlers.
//!
//! Ledger updates only; nothing here talks to Discord.

use crate::dto::ApiDiscordRole;
use crate::response::{created, not_found, ok, ApiResult};
use crate::state::AppState;

use axum::extract::{Path, Query, State};
use axum::Json;
use mentora_core::SyncStatus;
use mentora_database::{DiscordRoleChangeset, NewDiscordRoleRow};
use mentora_error::ValidationError;
use serde::Deserialize;

/// Query parameters for the ledger listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordRoleListQuery {
    pub sync_status: Option<SyncStatus>,
}

/// Creation payload for a ledger entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDiscordRoleInput {
    pub student_id: Option<i32>,
    pub role_name: Option<String>,
}

/// Partial update payload for a ledger entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDiscordRoleInput {
    pub role_name: Option<String>,
    pub sync_status: Option<SyncStatus>,
}

/// Body for the mark-failed endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkFailedInput {
    pub error_message: Option<String>,
}

/// `GET /api/discord-roles`
pub async fn list_discord_roles(
    State(state): State<AppState>,
    Query(query): Query<DiscordRoleListQuery>,
) -> ApiResult {
    let rows = state.discord_roles.list(query.sync_status).await?;
    let roles = rows
        .into_iter()
        .map(ApiDiscordRole::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ok(roles))
}

/// `POST /api/discord-roles`
pub async fn create_discord_role(
    State(state): State<AppState>,
    Json(input): Json<NewDiscordRoleInput>,
) -> ApiResult {
    let mut errors = ValidationError::empty();

    if let Some(id) = input.student_id {
        if state.lifecycle.repository().find_by_id(id).await?.is_none() {
            errors.add("student_id", "student does not exist");
        }
    } else {
        errors.add("student_id", "student_id is required");
    }

    let role_name = input.role_name.as_deref().map(str::trim).unwrap_or_default();
    if role_name.is_empty() {
        errors.add("role_name", "role_name is required");
    }

    let Some(student_id) = input.student_id else {
        return Err(errors.into());
    };
    if errors.has_errors() {
        return Err(errors.into());
    }

    let new_row = NewDiscordRoleRow {
        student_id,
        role_name: role_name.to_string(),
        sync_status: SyncStatus::Pending.as_str().to_string(),
        retry_count: 0,
        error_message: None,
        last_sync_at: None,
    };

    let row = state.discord_roles.create(new_row).await?;
    Ok(created(ApiDiscordRole::try_from(row)?))
}

/// `PUT /api/discord-roles/{id}`
pub async fn update_discord_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateDiscordRoleInput>,
) -> ApiResult {
    state
        .discord_roles
        .find(id)
        .await?
        .ok_or_else(not_found)?;

    let changeset = DiscordRoleChangeset {
        role_name: input.role_name,
        sync_status: input.sync_status.map(|s| s.as_str().to_string()),
        ..Default::default()
    };

    let row = state.discord_roles.update(id, changeset).await?;
    Ok(ok(ApiDiscordRole::try_from(row)?))
}

/// `POST /api/discord-roles/{id}/mark-synced`
pub async fn mark_synced(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    state
        .discord_roles
        .find(id)
        .await?
        .ok_or_else(not_found)?;

    let row = state.discord_roles.mark_synced(id).await?;
    Ok(ok(ApiDiscordRole::try_from(row)?))
}

/// `POST /api/discord-roles/{id}/mark-failed`
pub async fn mark_failed(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<MarkFailedInput>,
) -> ApiResult {
    state
        .discord_roles
        .find(id)
        .await?
        .ok_or_else(not_found)?;

    let error = input
        .error_message
        .unwrap_or_else(|| "sync failed".to_string());
    let row = state.discord_roles.mark_failed(id, &error).await?;
    Ok(ok(ApiDiscordRole::try_from(row)?))
}
