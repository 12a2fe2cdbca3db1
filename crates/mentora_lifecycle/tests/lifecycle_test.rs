//! Integration tests for the student lifecycle service.
//!
//! These tests require a running PostgreSQL database with the Mentora
//! migrations applied. Run with:
//! `cargo test -p mentora_lifecycle -- --ignored`

use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_core::{AuditKind, OnboardingStatus, PaymentStatus, StepStatus};
use mentora_database::{establish_connection, schema, NewProgramRow, StudentRepository};
use mentora_lifecycle::{
    BulkUpdateInput, LifecycleService, NewStudentInput, StepPatch, StudentRef, UpdateStudentInput,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Create a test database connection.
///
/// Note: These tests require a running PostgreSQL database with the Mentora
/// migrations applied.
fn create_test_connection() -> Arc<Mutex<PgConnection>> {
    dotenvy::dotenv().ok();
    let conn = establish_connection().expect("Failed to establish test database connection");
    Arc::new(Mutex::new(conn))
}

/// Unique email per test run to dodge the global unique constraint.
fn test_email(tag: &str) -> String {
    format!("{tag}-{}@test.mentora.app", uuid::Uuid::new_v4().simple())
}

/// Ensure a test program exists and return its id.
async fn ensure_program(conn: &Arc<Mutex<PgConnection>>) -> i32 {
    let repo = StudentRepository::from_arc(conn.clone());
    let existing = repo.list_programs().await.unwrap();
    if let Some(program) = existing.iter().find(|p| p.name == "Lifecycle Test Program") {
        return program.id;
    }
    repo.create_program(NewProgramRow {
        name: "Lifecycle Test Program".to_string(),
        description: None,
        price: None,
        duration_weeks: Some(12),
        active: true,
    })
    .await
    .unwrap()
    .id
}

fn valid_input(email: String, program_id: i32) -> NewStudentInput {
    NewStudentInput {
        name: Some("Ann".to_string()),
        email: Some(email),
        program_id: Some(program_id),
        due_date: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        ..Default::default()
    }
}

/// Remove a test student and every row hanging off it.
async fn cleanup_student(conn: &Arc<Mutex<PgConnection>>, student_id: i32) {
    let mut conn = conn.lock().await;
    diesel::delete(
        schema::timeline_steps::table.filter(schema::timeline_steps::student_id.eq(student_id)),
    )
    .execute(&mut *conn)
    .unwrap();
    diesel::delete(
        schema::transactions::table.filter(schema::transactions::student_id.eq(student_id)),
    )
    .execute(&mut *conn)
    .unwrap();
    diesel::delete(
        schema::discord_roles::table.filter(schema::discord_roles::student_id.eq(student_id)),
    )
    .execute(&mut *conn)
    .unwrap();
    diesel::delete(
        schema::audit_outbox::table.filter(schema::audit_outbox::student_id.eq(student_id)),
    )
    .execute(&mut *conn)
    .unwrap();
    diesel::delete(schema::system_logs::table.filter(schema::system_logs::student_id.eq(student_id)))
        .execute(&mut *conn)
        .unwrap();
    diesel::delete(schema::students::table.find(student_id))
        .execute(&mut *conn)
        .unwrap();
}

/// Outbox kinds recorded for a student, in insertion order.
async fn outbox_kinds(conn: &Arc<Mutex<PgConnection>>, student_id: i32) -> Vec<String> {
    let mut conn = conn.lock().await;
    schema::audit_outbox::table
        .filter(schema::audit_outbox::student_id.eq(student_id))
        .order(schema::audit_outbox::id.asc())
        .select(schema::audit_outbox::kind)
        .load(&mut *conn)
        .unwrap()
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn create_seeds_four_timeline_steps() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());

    let detail = service
        .create_student(valid_input(test_email("seed"), program_id))
        .await
        .unwrap();

    assert_eq!(detail.student.onboarding_status, "Not Started");
    assert_eq!(detail.student.payment_status, "Pending");
    assert_eq!(detail.timeline.len(), 4);
    let sort_orders: Vec<i32> = detail.timeline.iter().map(|s| s.sort_order).collect();
    assert_eq!(sort_orders, vec![1, 2, 3, 4]);
    let statuses: Vec<&str> = detail.timeline.iter().map(|s| s.status.as_str()).collect();
    assert_eq!(statuses, vec!["completed", "current", "pending", "pending"]);

    assert_eq!(
        outbox_kinds(&conn, detail.student.id).await,
        vec![AuditKind::Created.as_str()]
    );

    cleanup_student(&conn, detail.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn duplicate_email_fails_validation_and_persists_nothing() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());

    let email = test_email("dup");
    let first = service
        .create_student(valid_input(email.clone(), program_id))
        .await
        .unwrap();

    let err = service
        .create_student(valid_input(email.clone(), program_id))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Validation"));

    // Exactly one student row exists for the email.
    {
        let mut guard = conn.lock().await;
        let count: i64 = schema::students::table
            .filter(schema::students::email.eq(&email))
            .count()
            .get_result(&mut *guard)
            .unwrap();
        assert_eq!(count, 1);
    }

    // Only the first creation produced an outbox entry.
    assert_eq!(outbox_kinds(&conn, first.student.id).await.len(), 1);

    cleanup_student(&conn, first.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn missing_required_fields_produce_per_field_errors() {
    let conn = create_test_connection();
    let service = LifecycleService::from_arc(conn.clone());

    let err = service
        .create_student(NewStudentInput::default())
        .await
        .unwrap_err();

    match err.kind() {
        mentora_error::MentoraErrorKind::Validation(v) => {
            let fields = v.fields();
            assert!(fields.contains_key("name"));
            assert!(fields.contains_key("email"));
            assert!(fields.contains_key("program_id"));
            assert!(fields.contains_key("due_date"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn timeline_toggles_drive_onboarding_status() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());

    let detail = service
        .create_student(valid_input(test_email("timeline"), program_id))
        .await
        .unwrap();
    let student_ref = StudentRef::Id(detail.student.id);
    let step_ids: Vec<i32> = detail.timeline.iter().map(|s| s.id).collect();

    // Complete every step: derived status becomes Completed.
    let mut last = None;
    for step_id in &step_ids {
        last = Some(
            service
                .update_timeline_step(
                    student_ref,
                    *step_id,
                    StepPatch {
                        status: Some(StepStatus::Completed),
                        ..Default::default()
                    },
                )
                .await
                .unwrap(),
        );
    }
    assert_eq!(last.unwrap().new_status, OnboardingStatus::Completed);

    // Revert one step: In Progress.
    let outcome = service
        .update_timeline_step(
            student_ref,
            step_ids[1],
            StepPatch {
                status: Some(StepStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.new_status, OnboardingStatus::InProgress);

    // Revert all: Not Started.
    for step_id in &step_ids {
        service
            .update_timeline_step(
                student_ref,
                *step_id,
                StepPatch {
                    status: Some(StepStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }
    let student = service.resolve(student_ref).await.unwrap();
    assert_eq!(student.onboarding_status, "Not Started");

    cleanup_student(&conn, detail.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn step_ownership_mismatch_is_not_found() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());

    let first = service
        .create_student(valid_input(test_email("owner-a"), program_id))
        .await
        .unwrap();
    let second = service
        .create_student(valid_input(test_email("owner-b"), program_id))
        .await
        .unwrap();

    // A step belonging to the second student through the first student's id.
    let foreign_step = second.timeline[0].id;
    let err = service
        .update_timeline_step(
            StudentRef::Id(first.student.id),
            foreign_step,
            StepPatch {
                status: Some(StepStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    cleanup_student(&conn, first.student.id).await;
    cleanup_student(&conn, second.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn payment_status_change_emits_generic_and_specialized_events() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());

    let detail = service
        .create_student(valid_input(test_email("payment"), program_id))
        .await
        .unwrap();

    service
        .update_student(
            StudentRef::Id(detail.student.id),
            UpdateStudentInput {
                payment_status: Some(PaymentStatus::Failed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let kinds = outbox_kinds(&conn, detail.student.id).await;
    assert_eq!(kinds, vec!["created", "updated", "payment_updated"]);

    cleanup_student(&conn, detail.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn same_value_update_is_a_no_op() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());

    let detail = service
        .create_student(valid_input(test_email("noop"), program_id))
        .await
        .unwrap();

    // Pending -> Pending changes nothing and emits nothing.
    service
        .update_student(
            StudentRef::Id(detail.student.id),
            UpdateStudentInput {
                payment_status: Some(PaymentStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outbox_kinds(&conn, detail.student.id).await, vec!["created"]);

    cleanup_student(&conn, detail.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn soft_delete_hides_but_retains_the_row() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());
    let repo = StudentRepository::from_arc(conn.clone());

    let detail = service
        .create_student(valid_input(test_email("softdel"), program_id))
        .await
        .unwrap();
    let id = detail.student.id;

    service.delete_student(StudentRef::Id(id)).await.unwrap();

    // Hidden from default lookups.
    assert!(repo.find_by_id(id).await.unwrap().is_none());
    let err = service.resolve(StudentRef::Id(id)).await.unwrap_err();
    assert!(err.is_not_found());

    // Retained in underlying storage with deleted_at set.
    let raw = repo.find_by_id_unfiltered(id).await.unwrap().unwrap();
    assert!(raw.deleted_at.is_some());

    let kinds = outbox_kinds(&conn, id).await;
    assert_eq!(kinds, vec!["created", "deleted"]);

    cleanup_student(&conn, id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn bulk_update_requires_at_least_one_field() {
    let conn = create_test_connection();
    let service = LifecycleService::from_arc(conn.clone());

    let err = service
        .bulk_update(BulkUpdateInput {
            ids: vec![1, 2, 3],
            payment_status: None,
            onboarding_status: None,
        })
        .await
        .unwrap_err();

    match err.kind() {
        mentora_error::MentoraErrorKind::Validation(v) => {
            assert_eq!(
                v.fields().get("payload").map(String::as_str),
                Some("no update data provided")
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn bulk_update_skips_unknown_ids() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());

    let detail = service
        .create_student(valid_input(test_email("bulk"), program_id))
        .await
        .unwrap();

    let affected = service
        .bulk_update(BulkUpdateInput {
            ids: vec![detail.student.id, -1],
            payment_status: Some(PaymentStatus::Paid),
            onboarding_status: None,
        })
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let student = service
        .resolve(StudentRef::Id(detail.student.id))
        .await
        .unwrap();
    assert_eq!(student.payment_status, "Paid");

    // Bulk writes leave no per-row audit trail.
    assert_eq!(outbox_kinds(&conn, detail.student.id).await, vec!["created"]);

    cleanup_student(&conn, detail.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn uuid_lookup_resolves_like_id_lookup() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());

    let detail = service
        .create_student(valid_input(test_email("uuid"), program_id))
        .await
        .unwrap();

    let by_id = service
        .resolve(StudentRef::Id(detail.student.id))
        .await
        .unwrap();
    let by_uuid = service
        .resolve(StudentRef::Uuid(detail.student.uuid))
        .await
        .unwrap();
    assert_eq!(by_id.id, by_uuid.id);

    cleanup_student(&conn, detail.student.id).await;
}
