//! End-to-end tests for the REST surface.
//!
//! These tests require a running PostgreSQL database with the Mentora
//! migrations applied; the router is driven in-process via tower.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use diesel::prelude::*;
use http_body_util::BodyExt;
use mentora_database::{establish_connection, schema, NewProgramRow, StudentRepository};
use mentora_server::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

async fn test_state() -> (AppState, Arc<Mutex<diesel::pg::PgConnection>>) {
    dotenvy::dotenv().ok();
    let conn = establish_connection().expect("Failed to establish test database connection");
    let conn = Arc::new(Mutex::new(conn));
    (AppState::from_arc(conn.clone()), conn)
}

async fn ensure_program(conn: &Arc<Mutex<diesel::pg::PgConnection>>) -> i32 {
    let repo = StudentRepository::from_arc(conn.clone());
    let existing = repo.list_programs().await.unwrap();
    if let Some(program) = existing.iter().find(|p| p.name == "API Test Program") {
        return program.id;
    }
    repo.create_program(NewProgramRow {
        name: "API Test Program".to_string(),
        description: None,
        price: None,
        duration_weeks: None,
        active: true,
    })
    .await
    .unwrap()
    .id
}

async fn cleanup_student(conn: &Arc<Mutex<diesel::pg::PgConnection>>, student_id: i32) {
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

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn health_check_responds() {
    let (state, _conn) = test_state().await;
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn unknown_student_is_404_with_envelope() {
    let (state, _conn) = test_state().await;
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/students/999999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Resource not found"));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn bulk_update_with_empty_payload_is_422() {
    let (state, _conn) = test_state().await;
    let router = create_router(state);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/students/bulk-update",
            json!({ "ids": [1, 2] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errors"]["payload"], json!("no update data provided"));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn create_then_complete_a_timeline_step() {
    let (state, conn) = test_state().await;
    let program_id = ensure_program(&conn).await;
    let router = create_router(state);

    let email = format!("api-{}@test.mentora.app", uuid::Uuid::new_v4().simple());
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/students",
            json!({
                "name": "Ann",
                "email": email,
                "program_id": program_id,
                "due_date": "2025-01-01",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["onboarding_status"], json!("Not Started"));
    let steps = body["data"]["timeline_steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);

    let student_id = body["data"]["id"].as_i64().unwrap();
    // "Payment Verification" is the second seeded step.
    let step = &steps[1];
    assert_eq!(step["label"], json!("Payment Verification"));
    let step_id = step["id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/students/{student_id}/timeline/{step_id}"),
            json!({ "status": "completed" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    // Two of four steps now completed: derived status is In Progress.
    assert_eq!(body["data"]["onboarding_status"], json!("In Progress"));
    assert_eq!(body["data"]["step"]["status"], json!("completed"));

    cleanup_student(&conn, student_id as i32).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn duplicate_email_create_is_422_with_field_map() {
    let (state, conn) = test_state().await;
    let program_id = ensure_program(&conn).await;
    let router = create_router(state);

    let email = format!("api-dup-{}@test.mentora.app", uuid::Uuid::new_v4().simple());
    let payload = json!({
        "name": "Ann",
        "email": email,
        "program_id": program_id,
        "due_date": "2025-01-01",
    });

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/students", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let student_id = body["data"]["id"].as_i64().unwrap() as i32;

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/students", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["errors"]["email"], json!("email is already registered"));

    cleanup_student(&conn, student_id).await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn metrics_endpoints_seed_when_empty() {
    let (state, _conn) = test_state().await;
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/inquiry-themes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let themes = body["data"].as_array().unwrap();
    assert!(!themes.is_empty());
    // Percentages are computed inline against the returned rows.
    for theme in themes {
        assert!(theme["percentage"].as_i64().unwrap() <= 100);
    }
}
