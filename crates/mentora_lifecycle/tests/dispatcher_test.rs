//! Integration tests for the audit outbox dispatcher.
//!
//! These tests require a running PostgreSQL database with the Mentora
//! migrations applied.

use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_core::LogLevel;
use mentora_database::{establish_connection, schema, NewProgramRow, StudentRepository};
use mentora_lifecycle::{
    LifecycleService, NewStudentInput, OutboxDispatcher, StudentRef, UpdateStudentInput,
};
use std::sync::Arc;
use tokio::sync::Mutex;

fn create_test_connection() -> Arc<Mutex<PgConnection>> {
    dotenvy::dotenv().ok();
    let conn = establish_connection().expect("Failed to establish test database connection");
    Arc::new(Mutex::new(conn))
}

async fn ensure_program(conn: &Arc<Mutex<PgConnection>>) -> i32 {
    let repo = StudentRepository::from_arc(conn.clone());
    let existing = repo.list_programs().await.unwrap();
    if let Some(program) = existing.iter().find(|p| p.name == "Dispatcher Test Program") {
        return program.id;
    }
    repo.create_program(NewProgramRow {
        name: "Dispatcher Test Program".to_string(),
        description: None,
        price: None,
        duration_weeks: None,
        active: true,
    })
    .await
    .unwrap()
    .id
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
    diesel::delete(schema::system_logs::table.filter(schema::system_logs::student_id.eq(student_id)))
        .execute(&mut *conn)
        .unwrap();
    diesel::delete(schema::students::table.find(student_id))
        .execute(&mut *conn)
        .unwrap();
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn drain_renders_outbox_rows_into_the_system_log() {
    let conn = create_test_connection();
    let program_id = ensure_program(&conn).await;
    let service = LifecycleService::from_arc(conn.clone());
    let dispatcher = OutboxDispatcher::from_arc(conn.clone());

    let email = format!("drain-{}@test.mentora.app", uuid::Uuid::new_v4().simple());
    let detail = service
        .create_student(NewStudentInput {
            name: Some("Drain Case".to_string()),
            email: Some(email),
            program_id: Some(program_id),
            due_date: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            ..Default::default()
        })
        .await
        .unwrap();
    let id = detail.student.id;

    service
        .update_student(
            StudentRef::Id(id),
            UpdateStudentInput {
                payment_status: Some(mentora_core::PaymentStatus::Failed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let report = dispatcher.drain_once().await.unwrap();
    assert!(report.dispatched >= 3);
    assert_eq!(report.failed, 0);

    // Every outbox row for this student is stamped.
    {
        let mut guard = conn.lock().await;
        let undispatched: i64 = schema::audit_outbox::table
            .filter(schema::audit_outbox::student_id.eq(id))
            .filter(schema::audit_outbox::dispatched_at.is_null())
            .count()
            .get_result(&mut *guard)
            .unwrap();
        assert_eq!(undispatched, 0);
    }

    // The payment failure rendered at ERROR severity with the template text.
    {
        let mut guard = conn.lock().await;
        let rows: Vec<(String, String)> = schema::system_logs::table
            .filter(schema::system_logs::student_id.eq(id))
            .order(schema::system_logs::id.asc())
            .select((schema::system_logs::level, schema::system_logs::message))
            .load(&mut *guard)
            .unwrap();
        assert!(rows
            .iter()
            .any(|(level, message)| level == LogLevel::Error.as_str()
                && message.contains("changed from Pending to Failed")));
        assert!(rows
            .iter()
            .any(|(level, _)| level == LogLevel::Success.as_str()));
    }

    // A second pass finds nothing to do.
    let report = dispatcher.drain_once().await.unwrap();
    assert_eq!(report.dispatched, 0);

    cleanup_student(&conn, id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn unknown_kinds_fall_back_to_generic_info() {
    let conn = create_test_connection();
    let dispatcher = OutboxDispatcher::from_arc(conn.clone());

    // Insert an outbox row with a kind this build does not know.
    let outbox_id: i32 = {
        let mut guard = conn.lock().await;
        diesel::insert_into(schema::audit_outbox::table)
            .values((
                schema::audit_outbox::kind.eq("exported"),
                schema::audit_outbox::payload.eq(serde_json::json!({"name": "Nobody"})),
            ))
            .returning(schema::audit_outbox::id)
            .get_result(&mut *guard)
            .unwrap()
    };

    dispatcher.drain_once().await.unwrap();

    {
        let mut guard = conn.lock().await;
        let dispatched: Option<_> = schema::audit_outbox::table
            .find(outbox_id)
            .select(schema::audit_outbox::dispatched_at)
            .get_result::<Option<chrono::DateTime<chrono::Utc>>>(&mut *guard)
            .unwrap();
        assert!(dispatched.is_some());

        diesel::delete(schema::audit_outbox::table.find(outbox_id))
            .execute(&mut *guard)
            .unwrap();
        diesel::delete(
            schema::system_logs::table.filter(schema::system_logs::module.eq("audit")),
        )
        .execute(&mut *guard)
        .unwrap();
    }
}
