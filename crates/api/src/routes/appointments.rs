//! Appointment endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_appointments_saved, record_booking_conflict};
use domain::errors::SchedulingError;
use domain::models::{
    Appointment, BulkSaveResponse, DeleteResponse, ListAppointmentsQuery,
    SaveAppointmentsRequest,
};
use persistence::repositories::{AppointmentFilter, AppointmentRepository, AppointmentSaveError};

/// List appointments in calendar order.
///
/// GET /api/appointments?employee_id=&client_id=&date=&status=
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let filter = AppointmentFilter {
        employee_id: query.employee_id,
        client_id: query.client_id,
        date: query.date,
        status: query.status,
        ..Default::default()
    };

    let repo = AppointmentRepository::new(state.pool.clone());
    let rows = repo.list(&filter).await?;
    Ok(Json(rows.into_iter().map(Appointment::from).collect()))
}

/// Insert or overwrite a batch of appointments.
///
/// Every entry is checked against the employee's calendar, including the
/// entries before it in the same batch. Batches are serialized by the
/// appointment write lock so two requests cannot both book the same slot.
///
/// POST /api/appointments
pub async fn save_appointments(
    State(state): State<AppState>,
    Json(request): Json<SaveAppointmentsRequest>,
) -> Result<Json<BulkSaveResponse>, ApiError> {
    request.validate()?;

    let hours = state.config.business_hours();
    let repo = AppointmentRepository::new(state.pool.clone());

    let result = {
        let _guard = state.appointment_lock.lock().await;
        repo.save_batch(&request.appointments, &hours).await
    };

    match result {
        Ok(ids) => {
            record_appointments_saved(ids.len());
            info!(count = ids.len(), "Appointments saved");
            Ok(Json(BulkSaveResponse::saved(ids)))
        }
        Err(err) => {
            if let AppointmentSaveError::Rejected { index, source } = &err {
                if matches!(source, SchedulingError::Conflict { .. }) {
                    record_booking_conflict();
                }
                warn!(entry = index, reason = %source, "Appointment batch rejected");
            }
            Err(err.into())
        }
    }
}

/// GET /api/appointments/:id
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, ApiError> {
    let repo = AppointmentRepository::new(state.pool.clone());
    let appointment = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Appointment {} not found", id)))?;
    Ok(Json(appointment.into()))
}

/// Remove an appointment for good.
///
/// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let repo = AppointmentRepository::new(state.pool.clone());

    let removed = {
        let _guard = state.appointment_lock.lock().await;
        repo.delete(id).await?
    };
    if removed == 0 {
        return Err(ApiError::NotFound(format!("Appointment {} not found", id)));
    }

    info!(appointment_id = id, "Appointment deleted");
    Ok(Json(DeleteResponse { success: true }))
}
