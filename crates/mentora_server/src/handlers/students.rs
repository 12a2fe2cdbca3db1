//! Student CRUD, timeline, stats, and bulk-update handlers.

use crate::dto::{ApiStudent, ApiStudentDetail, ApiTimelineStep};
use crate::response::{created, not_found, ok, ApiResult};
use crate::state::AppState;

use axum::extract::{Path, Query, State};
use axum::Json;
use mentora_core::OnboardingStatus;
use mentora_database::{SortDirection, StudentFilter, StudentSortKey};
use mentora_lifecycle::{BulkUpdateInput, NewStudentInput, StepPatch, StudentRef, UpdateStudentInput};
use serde::Deserialize;
use serde_json::json;

/// Query parameters for the student listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentListQuery {
    pub payment_status: Option<mentora_core::PaymentStatus>,
    pub onboarding_status: Option<OnboardingStatus>,
    pub program_id: Option<i32>,
    pub overdue: Option<bool>,
    pub due_within_days: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl StudentListQuery {
    fn into_filter(self) -> (StudentFilter, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(25).clamp(1, 100);

        let sort_key = match self.sort_by.as_deref() {
            Some("name") => StudentSortKey::Name,
            Some("email") => StudentSortKey::Email,
            Some("joined_date") => StudentSortKey::JoinedDate,
            Some("due_date") => StudentSortKey::DueDate,
            Some("payment_status") => StudentSortKey::PaymentStatus,
            Some("onboarding_status") => StudentSortKey::OnboardingStatus,
            _ => StudentSortKey::CreatedAt,
        };
        let sort_direction = match self.sort_dir.as_deref() {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };

        let filter = StudentFilter {
            payment_status: self.payment_status,
            onboarding_status: self.onboarding_status,
            program_id: self.program_id,
            overdue: self.overdue,
            due_within_days: self.due_within_days,
            search: self.search,
            sort_key,
            sort_direction,
            limit: Some(per_page),
            offset: Some((page - 1) * per_page),
        };

        (filter, page, per_page)
    }
}

/// `GET /api/students`
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> ApiResult {
    let (filter, page, per_page) = query.into_filter();
    let (rows, total) = state.lifecycle.list(&filter).await?;

    let students = rows
        .into_iter()
        .map(ApiStudent::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ok(json!({
        "students": students,
        "total": total,
        "page": page,
        "per_page": per_page,
    })))
}

/// `POST /api/students`
pub async fn create_student(
    State(state): State<AppState>,
    Json(input): Json<NewStudentInput>,
) -> ApiResult {
    let detail = state.lifecycle.create_student(input).await?;
    Ok(created(ApiStudentDetail::try_from(detail)?))
}

/// `GET /api/students/stats`
pub async fn student_stats(State(state): State<AppState>) -> ApiResult {
    let stats = state.lifecycle.stats().await?;
    Ok(ok(stats))
}

/// `POST /api/students/bulk-update`
pub async fn bulk_update(
    State(state): State<AppState>,
    Json(input): Json<BulkUpdateInput>,
) -> ApiResult {
    let affected = state.lifecycle.bulk_update(input).await?;
    Ok(ok(json!({ "updated": affected })))
}

/// `GET /api/students/{id_or_uuid}`
pub async fn get_student(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult {
    let reference = StudentRef::parse(&reference).ok_or_else(not_found)?;
    let detail = state.lifecycle.get_detail(reference).await?;
    Ok(ok(ApiStudentDetail::try_from(detail)?))
}

/// `PUT /api/students/{id_or_uuid}`
pub async fn update_student(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(input): Json<UpdateStudentInput>,
) -> ApiResult {
    let reference = StudentRef::parse(&reference).ok_or_else(not_found)?;
    let student = state.lifecycle.update_student(reference, input).await?;
    Ok(ok(ApiStudent::try_from(student)?))
}

/// `DELETE /api/students/{id_or_uuid}`
pub async fn delete_student(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult {
    let reference = StudentRef::parse(&reference).ok_or_else(not_found)?;
    state.lifecycle.delete_student(reference).await?;
    Ok(crate::response::message("Student deleted"))
}

/// Body for the direct onboarding-status PATCH.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingPatch {
    pub onboarding_status: OnboardingStatus,
}

/// `PATCH /api/students/{id_or_uuid}/onboarding-status`
pub async fn patch_onboarding_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(patch): Json<OnboardingPatch>,
) -> ApiResult {
    let reference = StudentRef::parse(&reference).ok_or_else(not_found)?;
    let student = state
        .lifecycle
        .set_onboarding_status(reference, patch.onboarding_status)
        .await?;
    Ok(ok(ApiStudent::try_from(student)?))
}

/// `PATCH /api/students/{student_ref}/timeline/{step_id}`
pub async fn patch_timeline_step(
    State(state): State<AppState>,
    Path((reference, step_id)): Path<(String, i32)>,
    Json(patch): Json<StepPatch>,
) -> ApiResult {
    let reference = StudentRef::parse(&reference).ok_or_else(not_found)?;
    let outcome = state
        .lifecycle
        .update_timeline_step(reference, step_id, patch)
        .await?;

    let step = ApiTimelineStep::try_from(outcome.step)?;
    Ok(ok(json!({
        "step": step,
        "onboarding_status": outcome.new_status,
    })))
}
