//! Common test utilities for integration tests.
//!
//! Every test gets its own migrated in-memory SQLite database, so tests can
//! run in parallel without cleanup.

// Not every integration test uses every helper.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use barbershop_api::{app::create_app, config::Config};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use persistence::db::{create_pool, run_migrations, DatabaseConfig};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::Path;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "front-desk-test-key";

/// Create a migrated in-memory database pool.
pub async fn create_test_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_secs: 5,
        idle_timeout_secs: 60,
    };
    let pool = create_pool(&config)
        .await
        .expect("Failed to create test pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Create a migrated file-backed pool inside `dir` with several
/// connections, so concurrent requests really run on separate connections.
pub async fn create_file_pool(dir: &Path) -> SqlitePool {
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.join("barbershop.db").display()),
        max_connections: 4,
        min_connections: 1,
        connect_timeout_secs: 5,
        idle_timeout_secs: 60,
    };
    let pool = create_pool(&config)
        .await
        .expect("Failed to create file pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Default configuration with no API key.
pub fn test_config() -> Config {
    Config::load_for_test(&[("database.url", "sqlite::memory:")])
        .expect("Failed to build test config")
}

/// Configuration requiring [`TEST_API_KEY`].
pub fn test_config_with_api_key() -> Config {
    Config::load_for_test(&[
        ("database.url", "sqlite::memory:"),
        ("security.api_key", TEST_API_KEY),
    ])
    .expect("Failed to build test config")
}

/// Create a test application router.
pub fn create_test_app(config: Config, pool: SqlitePool) -> Router {
    create_app(config, pool)
}

/// Fresh database plus router with the default configuration.
pub async fn setup() -> Router {
    let pool = create_test_pool().await;
    create_test_app(test_config(), pool)
}

/// Send one request through a clone of the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("Router is infallible")
}

/// Build a JSON request.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a DELETE request.
pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request carrying an API key.
pub fn get_request_with_api_key(uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("X-API-Key", api_key)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// POST a bulk save and return the stored ids.
pub async fn save_all(app: &Router, uri: &str, body: Value) -> Vec<i64> {
    let response = send(app, json_request(Method::POST, uri, body)).await;
    let status = response.status();
    let body = parse_response_body(response).await;
    assert_eq!(status, StatusCode::OK, "save to {uri} failed: {body}");
    assert_eq!(body["success"], true);
    body["ids"]
        .as_array()
        .expect("ids array")
        .iter()
        .map(|id| id.as_i64().expect("numeric id"))
        .collect()
}

/// Ids of the reference records created by [`seed_catalog`].
pub struct Catalog {
    pub client_id: i64,
    pub employee_id: i64,
    /// 30 minutes, 35.00.
    pub haircut_id: i64,
    /// 45 minutes, 50.00.
    pub combo_id: i64,
}

/// Create one client, one employee and two services through the API.
pub async fn seed_catalog(app: &Router) -> Catalog {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    let clients = save_all(
        app,
        "/api/clients",
        json!({ "clients": [{ "name": name, "phone": "(11) 98765-4321", "email": email }] }),
    )
    .await;

    let employees = save_all(
        app,
        "/api/employees",
        json!({ "employees": [{ "name": "Pedro", "role": "Barber", "salary": 2500.0 }] }),
    )
    .await;

    let services = save_all(
        app,
        "/api/services",
        json!({ "services": [
            { "name": "Corte", "price": 35.0, "duration_minutes": 30 },
            { "name": "Corte + Barba", "price": 50.0, "duration_minutes": 45 }
        ] }),
    )
    .await;

    Catalog {
        client_id: clients[0],
        employee_id: employees[0],
        haircut_id: services[0],
        combo_id: services[1],
    }
}

/// Appointment entry for `catalog`'s client and employee.
pub fn booking(catalog: &Catalog, service_id: i64, starts_at: &str) -> Value {
    json!({
        "client_id": catalog.client_id,
        "employee_id": catalog.employee_id,
        "service_id": service_id,
        "starts_at": starts_at,
    })
}
