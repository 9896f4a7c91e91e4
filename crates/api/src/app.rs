use axum::{middleware, routing::get, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_api_key, trace_id};
use crate::routes::{
    appointments, availability, clients, dashboard, employees, health, reports, services,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    /// Serializes appointment writes so the conflict check and the insert
    /// happen as one step.
    pub appointment_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            appointment_lock: Arc::new(Mutex::new(())),
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn create_app(config: Config, pool: SqlitePool) -> Router {
    let state = AppState::new(config, pool);
    let cors = cors_layer(&state.config);
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    // Guarded by the shared API key when one is configured
    let protected_routes = Router::new()
        .route(
            "/api/clients",
            get(clients::list_clients).post(clients::save_clients),
        )
        .route(
            "/api/clients/:id",
            get(clients::get_client).delete(clients::delete_client),
        )
        .route(
            "/api/employees",
            get(employees::list_employees).post(employees::save_employees),
        )
        .route(
            "/api/employees/:id",
            get(employees::get_employee).delete(employees::delete_employee),
        )
        .route(
            "/api/services",
            get(services::list_services).post(services::save_services),
        )
        .route(
            "/api/services/:id",
            get(services::get_service).delete(services::delete_service),
        )
        .route(
            "/api/appointments",
            get(appointments::list_appointments).post(appointments::save_appointments),
        )
        .route(
            "/api/appointments/:id",
            get(appointments::get_appointment).delete(appointments::delete_appointment),
        )
        .route("/api/availability", get(availability::get_availability))
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/reports/sales", get(reports::sales_report))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
