//! Home screen counters.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{Appointment, DashboardQuery, DashboardSummary};
use domain::services::reporting::{build_dashboard, month_bounds, ActiveCounts};
use persistence::repositories::{
    AppointmentFilter, AppointmentRepository, ClientRepository, EmployeeRepository,
    ServiceRepository,
};
use shared::dates::local_today;

/// Active catalog counts, appointments on the day and revenue of the month.
///
/// GET /api/dashboard?date=YYYY-MM-DD (defaults to today)
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let date = query.date.unwrap_or_else(local_today);
    let counts = active_counts(&state).await?;

    let (from, to) = month_bounds(date);
    let filter = AppointmentFilter {
        from: Some(from),
        to: Some(to),
        ..Default::default()
    };
    let appointments: Vec<Appointment> = AppointmentRepository::new(state.pool.clone())
        .list(&filter)
        .await?
        .into_iter()
        .map(Appointment::from)
        .collect();

    Ok(Json(build_dashboard(date, counts, &appointments)))
}

pub(crate) async fn active_counts(state: &AppState) -> Result<ActiveCounts, ApiError> {
    Ok(ActiveCounts {
        clients: ClientRepository::new(state.pool.clone())
            .count_active()
            .await?,
        employees: EmployeeRepository::new(state.pool.clone())
            .count_active()
            .await?,
        services: ServiceRepository::new(state.pool.clone())
            .count_active()
            .await?,
    })
}
