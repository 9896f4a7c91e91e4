//! Service catalog endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{BulkSaveResponse, DeleteResponse, ListQuery, SaveServicesRequest, Service};
use persistence::repositories::ServiceRepository;

pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let repo = ServiceRepository::new(state.pool.clone());
    let rows = repo
        .list(query.include_inactive, query.search_term())
        .await?;
    Ok(Json(rows.into_iter().map(Service::from).collect()))
}

/// Insert or overwrite a batch of services. Prices are stored rounded to
/// cents.
pub async fn save_services(
    State(state): State<AppState>,
    Json(request): Json<SaveServicesRequest>,
) -> Result<Json<BulkSaveResponse>, ApiError> {
    request.validate()?;

    let repo = ServiceRepository::new(state.pool.clone());
    let ids = repo.upsert_many(&request.services).await?;

    info!(count = ids.len(), "Services saved");
    Ok(Json(BulkSaveResponse::saved(ids)))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Service>, ApiError> {
    let repo = ServiceRepository::new(state.pool.clone());
    let service = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Service {} not found", id)))?;
    Ok(Json(service.into()))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let repo = ServiceRepository::new(state.pool.clone());
    if !repo.deactivate(id).await? {
        return Err(ApiError::NotFound(format!("Service {} not found", id)));
    }

    info!(service_id = id, "Service deactivated");
    Ok(Json(DeleteResponse { success: true }))
}
