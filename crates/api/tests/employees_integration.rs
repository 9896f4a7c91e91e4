//! Integration tests for employee endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    delete_request, get_request, json_request, parse_response_body, save_all, send, setup,
};
use serde_json::json;

#[tokio::test]
async fn test_save_employee_defaults() {
    let app = setup().await;

    let ids = save_all(
        &app,
        "/api/employees",
        json!({ "employees": [{ "name": "Pedro", "role": "Barber", "salary": 1999.999 }] }),
    )
    .await;

    let response = send(&app, get_request(&format!("/api/employees/{}", ids[0]))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["name"], "Pedro");
    assert_eq!(body["role"], "Barber");
    assert_eq!(body["salary"], 2000.0);
    assert_eq!(body["active"], true);
    assert!(body["hired_at"].is_string());
}

#[tokio::test]
async fn test_update_keeps_hire_date_when_omitted() {
    let app = setup().await;

    let ids = save_all(
        &app,
        "/api/employees",
        json!({ "employees": [{ "name": "Rita", "hired_at": "2021-03-15T08:00:00" }] }),
    )
    .await;
    save_all(
        &app,
        "/api/employees",
        json!({ "employees": [{ "id": ids[0], "name": "Rita", "role": "Manager" }] }),
    )
    .await;

    let response = send(&app, get_request(&format!("/api/employees/{}", ids[0]))).await;
    let body = parse_response_body(response).await;
    assert_eq!(body["role"], "Manager");
    assert_eq!(body["hired_at"], "2021-03-15T08:00:00");
}

#[tokio::test]
async fn test_negative_salary_rejected() {
    let app = setup().await;

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/api/employees",
            json!({ "employees": [{ "name": "Ze", "salary": -1.0 }] }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["details"][0]["field"], "employees[0].salary");
}

#[tokio::test]
async fn test_soft_delete_employee() {
    let app = setup().await;

    let ids = save_all(
        &app,
        "/api/employees",
        json!({ "employees": [{ "name": "Ana" }, { "name": "Bia" }] }),
    )
    .await;

    let response = send(&app, delete_request(&format!("/api/employees/{}", ids[0]))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get_request("/api/employees")).await;
    let body = parse_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Bia");

    let response = send(&app, get_request("/api/employees?include_inactive=true")).await;
    assert_eq!(parse_response_body(response).await.as_array().unwrap().len(), 2);

    let response = send(&app, delete_request("/api/employees/404")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
