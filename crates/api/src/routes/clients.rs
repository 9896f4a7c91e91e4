//! Client endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{BulkSaveResponse, Client, DeleteResponse, ListQuery, SaveClientsRequest};
use persistence::repositories::ClientRepository;

/// List clients.
///
/// GET /api/clients?include_inactive=<bool>&search=<text>
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
    let repo = ClientRepository::new(state.pool.clone());
    let rows = repo
        .list(query.include_inactive, query.search_term())
        .await?;
    Ok(Json(rows.into_iter().map(Client::from).collect()))
}

/// Insert or overwrite a batch of clients.
///
/// POST /api/clients
pub async fn save_clients(
    State(state): State<AppState>,
    Json(request): Json<SaveClientsRequest>,
) -> Result<Json<BulkSaveResponse>, ApiError> {
    request.validate()?;

    let repo = ClientRepository::new(state.pool.clone());
    let ids = repo.upsert_many(&request.clients).await?;

    info!(count = ids.len(), "Clients saved");
    Ok(Json(BulkSaveResponse::saved(ids)))
}

/// Fetch one client, active or not.
///
/// GET /api/clients/:id
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, ApiError> {
    let repo = ClientRepository::new(state.pool.clone());
    let client = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Client {} not found", id)))?;
    Ok(Json(client.into()))
}

/// Soft delete a client. Their appointments are kept.
///
/// DELETE /api/clients/:id
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let repo = ClientRepository::new(state.pool.clone());
    if !repo.deactivate(id).await? {
        return Err(ApiError::NotFound(format!("Client {} not found", id)));
    }

    info!(client_id = id, "Client deactivated");
    Ok(Json(DeleteResponse { success: true }))
}
