//! Integration tests for the student repository listing and retention paths.
//!
//! These tests require a running PostgreSQL database with the Mentora
//! migrations applied.

use chrono::{Duration, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_core::{AuditKind, OnboardingStatus, PaymentStatus};
use mentora_database::{
    establish_connection, schema, NewProgramRow, NewStudentRow, NewSystemLogRow, PendingAudit,
    StudentFilter, StudentRepository, SystemLogRepository,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

fn create_test_connection() -> Arc<Mutex<PgConnection>> {
    dotenvy::dotenv().ok();
    let conn = establish_connection().expect("Failed to establish test database connection");
    Arc::new(Mutex::new(conn))
}

async fn ensure_program(repo: &StudentRepository) -> i32 {
    let existing = repo.list_programs().await.unwrap();
    if let Some(program) = existing.iter().find(|p| p.name == "Repository Test Program") {
        return program.id;
    }
    repo.create_program(NewProgramRow {
        name: "Repository Test Program".to_string(),
        description: Some("fixture".to_string()),
        price: None,
        duration_weeks: Some(8),
        active: true,
    })
    .await
    .unwrap()
    .id
}

fn new_student(
    tag: &str,
    program_id: i32,
    payment: PaymentStatus,
    onboarding: OnboardingStatus,
) -> NewStudentRow {
    NewStudentRow {
        uuid: Uuid::new_v4(),
        name: format!("Filter {tag}"),
        email: format!("{tag}-{}@test.mentora.app", Uuid::new_v4().simple()),
        discord_handle: None,
        program_id,
        payment_status: payment.as_str().to_string(),
        onboarding_status: onboarding.as_str().to_string(),
        discord_role_assigned: false,
        joined_date: Utc::now().date_naive(),
        due_date: Utc::now().date_naive() + Duration::days(30),
    }
}

fn created_audit(name: &str) -> PendingAudit {
    PendingAudit {
        kind: AuditKind::Created,
        payload: serde_json::json!({ "name": name }),
    }
}

async fn cleanup_student(conn: &Arc<Mutex<PgConnection>>, student_id: i32) {
    let mut conn = conn.lock().await;
    diesel::delete(
        schema::timeline_steps::table.filter(schema::timeline_steps::student_id.eq(student_id)),
    )
    .execute(&mut *conn)
    .unwrap();
    diesel::delete(
        schema::audit_outbox::table.filter(schema::audit_outbox::student_id.eq(student_id)),
    )
    .execute(&mut *conn)
    .unwrap();
    diesel::delete(schema::students::table.find(student_id))
        .execute(&mut *conn)
        .unwrap();
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn combined_filters_intersect() {
    let conn = create_test_connection();
    let repo = StudentRepository::from_arc(conn.clone());
    let program_id = ensure_program(&repo).await;

    let a = repo
        .create_student(
            new_student("both", program_id, PaymentStatus::Paid, OnboardingStatus::Completed),
            created_audit("both"),
        )
        .await
        .unwrap();
    let b = repo
        .create_student(
            new_student("paid-only", program_id, PaymentStatus::Paid, OnboardingStatus::InProgress),
            created_audit("paid-only"),
        )
        .await
        .unwrap();
    let c = repo
        .create_student(
            new_student(
                "completed-only",
                program_id,
                PaymentStatus::Pending,
                OnboardingStatus::Completed,
            ),
            created_audit("completed-only"),
        )
        .await
        .unwrap();

    let filter = StudentFilter {
        payment_status: Some(PaymentStatus::Paid),
        onboarding_status: Some(OnboardingStatus::Completed),
        program_id: Some(program_id),
        ..Default::default()
    };
    let (rows, _) = repo.list(&filter).await.unwrap();

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    assert!(ids.contains(&a.student.id));
    assert!(!ids.contains(&b.student.id));
    assert!(!ids.contains(&c.student.id));

    cleanup_student(&conn, a.student.id).await;
    cleanup_student(&conn, b.student.id).await;
    cleanup_student(&conn, c.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn search_matches_name_and_email() {
    let conn = create_test_connection();
    let repo = StudentRepository::from_arc(conn.clone());
    let program_id = ensure_program(&repo).await;

    let mut row = new_student(
        "searchable",
        program_id,
        PaymentStatus::Pending,
        OnboardingStatus::NotStarted,
    );
    row.name = "Zebadiah Quixote".to_string();
    let created = repo
        .create_student(row, created_audit("Zebadiah Quixote"))
        .await
        .unwrap();

    let filter = StudentFilter {
        search: Some("zebadiah".to_string()),
        ..Default::default()
    };
    let (rows, total) = repo.list(&filter).await.unwrap();
    assert!(total >= 1);
    assert!(rows.iter().any(|r| r.id == created.student.id));

    cleanup_student(&conn, created.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn overdue_filter_excludes_paid_students() {
    let conn = create_test_connection();
    let repo = StudentRepository::from_arc(conn.clone());
    let program_id = ensure_program(&repo).await;

    let mut overdue_pending = new_student(
        "overdue-pending",
        program_id,
        PaymentStatus::Pending,
        OnboardingStatus::NotStarted,
    );
    overdue_pending.due_date = Utc::now().date_naive() - Duration::days(7);
    let mut overdue_paid = new_student(
        "overdue-paid",
        program_id,
        PaymentStatus::Paid,
        OnboardingStatus::NotStarted,
    );
    overdue_paid.due_date = Utc::now().date_naive() - Duration::days(7);

    let a = repo
        .create_student(overdue_pending, created_audit("overdue-pending"))
        .await
        .unwrap();
    let b = repo
        .create_student(overdue_paid, created_audit("overdue-paid"))
        .await
        .unwrap();

    let filter = StudentFilter {
        overdue: Some(true),
        ..Default::default()
    };
    let (rows, _) = repo.list(&filter).await.unwrap();
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    assert!(ids.contains(&a.student.id));
    assert!(!ids.contains(&b.student.id));

    cleanup_student(&conn, a.student.id).await;
    cleanup_student(&conn, b.student.id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn log_prune_only_removes_old_entries() {
    let conn = create_test_connection();
    let logs = SystemLogRepository::from_arc(conn.clone());

    let fresh = logs
        .append(NewSystemLogRow {
            level: "INFO".to_string(),
            module: "retention-test".to_string(),
            message: "fresh entry".to_string(),
            context: None,
            user_id: None,
            student_id: None,
        })
        .await
        .unwrap();

    // Backdate a second entry past the cutoff.
    let old_id: i32 = {
        let mut guard = conn.lock().await;
        diesel::insert_into(schema::system_logs::table)
            .values((
                schema::system_logs::level.eq("INFO"),
                schema::system_logs::module.eq("retention-test"),
                schema::system_logs::message.eq("stale entry"),
                schema::system_logs::created_at.eq(Utc::now() - Duration::days(45)),
            ))
            .returning(schema::system_logs::id)
            .get_result(&mut *guard)
            .unwrap()
    };

    let removed = logs.prune(30).await.unwrap();
    assert!(removed >= 1);

    {
        let mut guard = conn.lock().await;
        let stale: i64 = schema::system_logs::table
            .find(old_id)
            .count()
            .get_result(&mut *guard)
            .unwrap();
        assert_eq!(stale, 0);

        let fresh_count: i64 = schema::system_logs::table
            .find(fresh.id)
            .count()
            .get_result(&mut *guard)
            .unwrap();
        assert_eq!(fresh_count, 1);

        diesel::delete(
            schema::system_logs::table.filter(schema::system_logs::module.eq("retention-test")),
        )
        .execute(&mut *guard)
        .unwrap();
    }
}
