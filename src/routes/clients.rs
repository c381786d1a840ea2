use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::{
    middleware::session::BackendSession,
    models::client::PageQuery,
    routes::{backend_error, to_json, ApiResult},
    services::clients::ClientService,
    AppState,
};

/// GET /api/client/clients-light?page=&size=
pub async fn list_clients(
    State(state): State<AppState>,
    session: BackendSession,
    Query(params): Query<PageQuery>,
) -> ApiResult {
    let page = ClientService::list(&state.backend, &session, params.page(), params.size())
        .await
        .map_err(|e| backend_error("Failed to fetch clients", e))?;
    to_json(page)
}

pub async fn get_client(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<String>,
) -> ApiResult {
    ClientService::get(&state.backend, &session, &id)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to fetch client", e))
}

/// PUT /api/client/{id}/update
pub async fn update_client(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    ClientService::update(&state.backend, &session, &id, &body)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to update client", e))
}
