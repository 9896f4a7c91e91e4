//! Free slot lookup.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{Appointment, AvailabilityQuery, AvailabilityResponse};
use domain::services::scheduling::{available_slots, format_slots};
use persistence::repositories::{
    AppointmentFilter, AppointmentRepository, EmployeeRepository, ServiceRepository,
};

/// Start times where the employee can take a booking of the requested
/// length on the given day.
///
/// The length comes from `service_id` when given, otherwise from
/// `duration_minutes`. A deactivated employee has no free slots.
///
/// GET /api/availability?employee_id=&date=&service_id=|duration_minutes=
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let duration_minutes = match (query.service_id, query.duration_minutes) {
        (Some(service_id), _) => {
            ServiceRepository::new(state.pool.clone())
                .find_by_id(service_id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("Service {} not found", service_id)))?
                .duration_minutes
        }
        (None, Some(minutes)) => minutes,
        (None, None) => {
            return Err(ApiError::Validation(
                "Either service_id or duration_minutes is required".to_string(),
            ))
        }
    };

    let employee = EmployeeRepository::new(state.pool.clone())
        .find_by_id(query.employee_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Employee {} not found", query.employee_id))
        })?;

    // Deactivated employees keep their history but take no new bookings.
    if !employee.active {
        return Ok(Json(AvailabilityResponse {
            employee_id: query.employee_id,
            date: query.date,
            duration_minutes,
            slots: Vec::new(),
        }));
    }

    let filter = AppointmentFilter {
        employee_id: Some(query.employee_id),
        date: Some(query.date),
        ..Default::default()
    };
    let appointments: Vec<Appointment> = AppointmentRepository::new(state.pool.clone())
        .list(&filter)
        .await?
        .into_iter()
        .map(Appointment::from)
        .collect();

    let slots = available_slots(
        &state.config.business_hours(),
        query.employee_id,
        query.date,
        duration_minutes,
        &appointments,
    )?;

    Ok(Json(AvailabilityResponse {
        employee_id: query.employee_id,
        date: query.date,
        duration_minutes,
        slots: format_slots(&slots),
    }))
}
