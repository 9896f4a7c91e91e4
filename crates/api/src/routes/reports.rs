//! Sales report endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use super::dashboard::active_counts;
use crate::app::AppState;
use crate::error::ApiError;
use domain::errors::ReportError;
use domain::models::{
    Appointment, AppointmentStatus, Employee, SalesReport, SalesReportQuery, Service,
};
use domain::services::reporting::build_sales_report;
use persistence::repositories::{
    AppointmentFilter, AppointmentRepository, EmployeeRepository, ServiceRepository,
};

/// Completed appointments between `from` and `to` (inclusive), with
/// per-service and per-employee breakdowns.
///
/// GET /api/reports/sales?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<SalesReportQuery>,
) -> Result<Json<SalesReport>, ApiError> {
    if query.from > query.to {
        return Err(ReportError::InvalidRange {
            from: query.from,
            to: query.to,
        }
        .into());
    }

    let filter = AppointmentFilter {
        from: Some(query.from),
        to: Some(query.to),
        status: Some(AppointmentStatus::Completed),
        ..Default::default()
    };
    let appointments: Vec<Appointment> = AppointmentRepository::new(state.pool.clone())
        .list(&filter)
        .await?
        .into_iter()
        .map(Appointment::from)
        .collect();

    // Inactive records too, so past lines keep their names.
    let services: Vec<Service> = ServiceRepository::new(state.pool.clone())
        .list(true, None)
        .await?
        .into_iter()
        .map(Service::from)
        .collect();
    let employees: Vec<Employee> = EmployeeRepository::new(state.pool.clone())
        .list(true, None)
        .await?
        .into_iter()
        .map(Employee::from)
        .collect();

    let counts = active_counts(&state).await?;
    let report = build_sales_report(
        query.from,
        query.to,
        &appointments,
        &services,
        &employees,
        counts,
    )?;

    tracing::info!(
        from = %query.from,
        to = %query.to,
        total = report.total_appointments,
        "Sales report generated"
    );
    Ok(Json(report))
}
