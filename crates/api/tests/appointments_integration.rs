//! Integration tests for appointment booking.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    booking, create_file_pool, create_test_app, delete_request, get_request, json_request,
    parse_response_body, save_all, seed_catalog, send, setup, test_config,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_appointments(app: &axum::Router, entries: Vec<Value>) -> (StatusCode, Value) {
    let response = send(
        app,
        json_request(
            Method::POST,
            "/api/appointments",
            json!({ "appointments": entries }),
        ),
    )
    .await;
    let status = response.status();
    (status, parse_response_body(response).await)
}

async fn list(app: &axum::Router, uri: &str) -> Vec<Value> {
    let response = send(app, get_request(uri)).await;
    assert_eq!(response.status(), StatusCode::OK);
    parse_response_body(response)
        .await
        .as_array()
        .cloned()
        .unwrap_or_default()
}

#[tokio::test]
async fn test_booking_fills_defaults_from_service() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let ids = save_all(
        &app,
        "/api/appointments",
        json!({ "appointments": [booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00")] }),
    )
    .await;

    let response = send(&app, get_request(&format!("/api/appointments/{}", ids[0]))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["scheduled_date"], "2024-05-10");
    assert_eq!(body["starts_at"], "2024-05-10T09:00:00");
    assert_eq!(body["ends_at"], "2024-05-10T09:30:00");
    assert_eq!(body["total_value"], 35.0);
    assert_eq!(body["status"], "scheduled");
}

#[tokio::test]
async fn test_overlapping_booking_rejected_with_conflict() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let (status, _) = post_appointments(
        &app,
        vec![booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_appointments(
        &app,
        vec![booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00")],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(
        body["message"],
        "Time slot conflicts with appointment from 09:00 to 09:30"
    );

    let (status, _) = post_appointments(
        &app,
        vec![booking(&catalog, catalog.combo_id, "2024-05-10T08:30:00")],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(list(&app, "/api/appointments").await.len(), 1);
}

#[tokio::test]
async fn test_back_to_back_bookings_accepted() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let ids = save_all(
        &app,
        "/api/appointments",
        json!({ "appointments": [
            booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00"),
            booking(&catalog, catalog.haircut_id, "2024-05-10T09:30:00"),
            booking(&catalog, catalog.combo_id, "2024-05-10T10:00:00")
        ] }),
    )
    .await;
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_conflict_inside_batch_rolls_back_everything() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let (status, body) = post_appointments(
        &app,
        vec![
            booking(&catalog, catalog.haircut_id, "2024-05-10T14:00:00"),
            booking(&catalog, catalog.haircut_id, "2024-05-10T14:15:00"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Time slot conflicts with appointment from 14:00 to 14:30"
    );

    assert!(list(&app, "/api/appointments").await.is_empty());
}

#[tokio::test]
async fn test_cancelled_and_completed_never_conflict() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let mut cancelled = booking(&catalog, catalog.haircut_id, "2024-05-10T11:00:00");
    cancelled["status"] = json!("cancelled");
    let mut completed = booking(&catalog, catalog.haircut_id, "2024-05-10T11:00:00");
    completed["status"] = json!("completed");
    let scheduled = booking(&catalog, catalog.haircut_id, "2024-05-10T11:00:00");

    let (status, body) = post_appointments(&app, vec![cancelled, completed, scheduled]).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ids"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_editing_booking_does_not_conflict_with_itself() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let ids = save_all(
        &app,
        "/api/appointments",
        json!({ "appointments": [booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00")] }),
    )
    .await;

    let mut edit = booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00");
    edit["id"] = json!(ids[0]);
    edit["status"] = json!("confirmed");
    edit["notes"] = json!("Asked for a fade");
    let again = save_all(&app, "/api/appointments", json!({ "appointments": [edit] })).await;
    assert_eq!(again, ids);

    let response = send(&app, get_request(&format!("/api/appointments/{}", ids[0]))).await;
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["notes"], "Asked for a fade");
}

#[tokio::test]
async fn test_booking_past_closing_rejected() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let (status, body) = post_appointments(
        &app,
        vec![booking(&catalog, catalog.combo_id, "2024-05-10T17:30:00")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_end_before_start_rejected() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let mut entry = booking(&catalog, catalog.haircut_id, "2024-05-10T10:00:00");
    entry["ends_at"] = json!("2024-05-10T09:00:00");
    let (status, _) = post_appointments(&app, vec![entry]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_new_booking_shorter_than_service_rejected() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let mut first = booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00");
    first["ends_at"] = json!("2024-05-10T09:01:00");
    let mut second = booking(&catalog, catalog.haircut_id, "2024-05-10T09:01:00");
    second["ends_at"] = json!("2024-05-10T09:02:00");

    let (status, body) = post_appointments(&app, vec![first, second]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "A new appointment must last the service duration of 30 minutes"
    );
    assert!(list(&app, "/api/appointments").await.is_empty());

    let mut exact = booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00");
    exact["ends_at"] = json!("2024-05-10T09:30:00");
    let (status, _) = post_appointments(&app, vec![exact]).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_for_same_slot() {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = create_file_pool(dir.path()).await;
    let app = create_test_app(test_config(), pool.clone());
    let catalog = seed_catalog(&app).await;

    let request = || {
        json_request(
            Method::POST,
            "/api/appointments",
            json!({ "appointments": [booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00")] }),
        )
    };
    let (a, b) = tokio::join!(
        tokio::spawn(app.clone().oneshot(request())),
        tokio::spawn(app.clone().oneshot(request())),
    );

    let mut statuses = vec![
        a.expect("task").expect("response").status(),
        b.expect("task").expect("response").status(),
    ];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(list(&app, "/api/appointments").await.len(), 1);

    pool.close().await;
}

#[tokio::test]
async fn test_missing_references() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let (status, body) = post_appointments(
        &app,
        vec![booking(&catalog, 999, "2024-05-10T10:00:00")],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Service 999 not found");

    let mut entry = booking(&catalog, catalog.haircut_id, "2024-05-10T10:00:00");
    entry["client_id"] = json!(999);
    let (status, body) = post_appointments(&app, vec![entry]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Referenced resource not found");
}

#[tokio::test]
async fn test_field_validation() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let mut entry = booking(&catalog, catalog.haircut_id, "2024-05-10T10:00:00");
    entry["client_id"] = json!(0);
    let (status, body) = post_appointments(&app, vec![entry]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "appointments[0].client_id");
}

#[tokio::test]
async fn test_list_filters() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;
    let other_employee = save_all(
        &app,
        "/api/employees",
        json!({ "employees": [{ "name": "Joao" }] }),
    )
    .await[0];

    let mut other = booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00");
    other["employee_id"] = json!(other_employee);
    let mut cancelled = booking(&catalog, catalog.haircut_id, "2024-05-11T10:00:00");
    cancelled["status"] = json!("cancelled");

    save_all(
        &app,
        "/api/appointments",
        json!({ "appointments": [
            booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00"),
            other,
            cancelled
        ] }),
    )
    .await;

    assert_eq!(list(&app, "/api/appointments").await.len(), 3);
    assert_eq!(
        list(&app, "/api/appointments?date=2024-05-10").await.len(),
        2
    );
    assert_eq!(
        list(
            &app,
            &format!("/api/appointments?employee_id={}&date=2024-05-10", other_employee)
        )
        .await
        .len(),
        1
    );
    let cancelled = list(&app, "/api/appointments?status=cancelled").await;
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0]["scheduled_date"], "2024-05-11");
    assert_eq!(
        list(
            &app,
            &format!("/api/appointments?client_id={}", catalog.client_id)
        )
        .await
        .len(),
        3
    );
}

#[tokio::test]
async fn test_delete_appointment_frees_slot() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let ids = save_all(
        &app,
        "/api/appointments",
        json!({ "appointments": [booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00")] }),
    )
    .await;
    let uri = format!("/api/appointments/{}", ids[0]);

    let response = send(&app, delete_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, delete_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (status, _) = post_appointments(
        &app,
        vec![booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
