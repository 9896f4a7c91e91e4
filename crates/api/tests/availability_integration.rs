//! Integration tests for free slot lookup.

mod common;

use axum::http::StatusCode;
use common::{
    booking, delete_request, get_request, parse_response_body, save_all, seed_catalog, send,
    setup,
};
use serde_json::{json, Value};

fn slots(body: &Value) -> Vec<String> {
    body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_empty_day_has_twenty_half_hour_slots() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let uri = format!(
        "/api/availability?employee_id={}&date=2024-05-10&service_id={}",
        catalog.employee_id, catalog.haircut_id
    );
    let response = send(&app, get_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["date"], "2024-05-10");
    assert_eq!(body["duration_minutes"], 30);
    let slots = slots(&body);
    assert_eq!(slots.len(), 20);
    assert_eq!(slots.first().unwrap(), "08:00");
    assert_eq!(slots.last().unwrap(), "17:30");
}

#[tokio::test]
async fn test_long_service_never_runs_past_closing() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let uri = format!(
        "/api/availability?employee_id={}&date=2024-05-10&service_id={}",
        catalog.employee_id, catalog.combo_id
    );
    let body = parse_response_body(send(&app, get_request(&uri)).await).await;
    let slots = slots(&body);
    assert_eq!(slots.len(), 19);
    assert_eq!(slots.last().unwrap(), "17:00");
    assert!(!slots.contains(&"17:30".to_string()));
}

#[tokio::test]
async fn test_deactivated_employee_has_no_slots() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let response = send(
        &app,
        delete_request(&format!("/api/employees/{}", catalog.employee_id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!(
        "/api/availability?employee_id={}&date=2024-05-10&service_id={}",
        catalog.employee_id, catalog.haircut_id
    );
    let response = send(&app, get_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert!(slots(&body).is_empty());
}

#[tokio::test]
async fn test_booked_slot_is_excluded() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let mut cancelled = booking(&catalog, catalog.haircut_id, "2024-05-10T10:00:00");
    cancelled["status"] = json!("cancelled");
    save_all(
        &app,
        "/api/appointments",
        json!({ "appointments": [
            booking(&catalog, catalog.haircut_id, "2024-05-10T09:00:00"),
            cancelled
        ] }),
    )
    .await;

    let uri = format!(
        "/api/availability?employee_id={}&date=2024-05-10&duration_minutes=30",
        catalog.employee_id
    );
    let body = parse_response_body(send(&app, get_request(&uri)).await).await;
    let slots = slots(&body);
    assert_eq!(slots.len(), 19);
    assert!(!slots.contains(&"09:00".to_string()));
    assert!(slots.contains(&"08:30".to_string()));
    assert!(slots.contains(&"09:30".to_string()));
    assert!(slots.contains(&"10:00".to_string()));

    // Other days are untouched
    let uri = format!(
        "/api/availability?employee_id={}&date=2024-05-11&duration_minutes=30",
        catalog.employee_id
    );
    let body = parse_response_body(send(&app, get_request(&uri)).await).await;
    assert_eq!(body["slots"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_availability_argument_errors() {
    let app = setup().await;
    let catalog = seed_catalog(&app).await;

    let uri = format!(
        "/api/availability?employee_id={}&date=2024-05-10",
        catalog.employee_id
    );
    let response = send(&app, get_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!(
        "/api/availability?employee_id={}&date=2024-05-10&duration_minutes=0",
        catalog.employee_id
    );
    let response = send(&app, get_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!(
        "/api/availability?employee_id={}&date=2024-05-10&service_id=999",
        catalog.employee_id
    );
    let response = send(&app, get_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        get_request("/api/availability?employee_id=999&date=2024-05-10&duration_minutes=30"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
