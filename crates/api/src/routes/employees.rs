//! Employee endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{
    BulkSaveResponse, DeleteResponse, Employee, ListQuery, SaveEmployeesRequest,
};
use persistence::repositories::EmployeeRepository;

/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let repo = EmployeeRepository::new(state.pool.clone());
    let rows = repo
        .list(query.include_inactive, query.search_term())
        .await?;
    Ok(Json(rows.into_iter().map(Employee::from).collect()))
}

/// POST /api/employees
pub async fn save_employees(
    State(state): State<AppState>,
    Json(request): Json<SaveEmployeesRequest>,
) -> Result<Json<BulkSaveResponse>, ApiError> {
    request.validate()?;

    let repo = EmployeeRepository::new(state.pool.clone());
    let ids = repo.upsert_many(&request.employees).await?;

    info!(count = ids.len(), "Employees saved");
    Ok(Json(BulkSaveResponse::saved(ids)))
}

/// GET /api/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, ApiError> {
    let repo = EmployeeRepository::new(state.pool.clone());
    let employee = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Employee {} not found", id)))?;
    Ok(Json(employee.into()))
}

/// Soft delete. Booked appointments stay on the calendar.
///
/// DELETE /api/employees/:id
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let repo = EmployeeRepository::new(state.pool.clone());
    if !repo.deactivate(id).await? {
        return Err(ApiError::NotFound(format!("Employee {} not found", id)));
    }

    info!(employee_id = id, "Employee deactivated");
    Ok(Json(DeleteResponse { success: true }))
}
