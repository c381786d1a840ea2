use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::{
    middleware::session::BackendSession,
    models::delivery::{AssignCommandesRequest, LivreurRequest},
    routes::{api_error, backend_error, to_json, ApiResult},
    services::delivery::DeliveryService,
    AppState,
};

pub async fn list_livreurs(State(state): State<AppState>, session: BackendSession) -> ApiResult {
    DeliveryService::list_livreurs(&state.backend, &session)
        .await
        .map_err(|e| backend_error("Failed to fetch livreurs", e))
        .and_then(to_json)
}

pub async fn get_livreur(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<i64>,
) -> ApiResult {
    DeliveryService::get_livreur(&state.backend, &session, id)
        .await
        .map_err(|e| backend_error("Failed to fetch livreur", e))
        .and_then(to_json)
}

pub async fn create_livreur(
    State(state): State<AppState>,
    session: BackendSession,
    Json(body): Json<LivreurRequest>,
) -> ApiResult {
    DeliveryService::create_livreur(&state.backend, &session, &body)
        .await
        .map_err(|e| backend_error("Failed to create livreur", e))
        .and_then(to_json)
}

pub async fn update_livreur(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<i64>,
    Json(body): Json<LivreurRequest>,
) -> ApiResult {
    DeliveryService::update_livreur(&state.backend, &session, id, &body)
        .await
        .map_err(|e| backend_error("Failed to update livreur", e))
        .and_then(to_json)
}

pub async fn delete_livreur(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<i64>,
) -> ApiResult {
    DeliveryService::delete_livreur(&state.backend, &session, id)
        .await
        .map_err(|e| backend_error("Failed to delete livreur", e))?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/livreurs/affecter-commandes
pub async fn assign_commandes(
    State(state): State<AppState>,
    session: BackendSession,
    Json(body): Json<AssignCommandesRequest>,
) -> ApiResult {
    set_assignment(state, session, body, true).await
}

/// POST /api/livreurs/desaffecter-commandes
pub async fn unassign_commandes(
    State(state): State<AppState>,
    session: BackendSession,
    Json(body): Json<AssignCommandesRequest>,
) -> ApiResult {
    set_assignment(state, session, body, false).await
}

async fn set_assignment(
    state: AppState,
    session: BackendSession,
    body: AssignCommandesRequest,
    assign: bool,
) -> ApiResult {
    let (livreur_id, commande_ids) = body.validated().ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            "livreurId et commandeIds sont requis",
        )
    })?;
    DeliveryService::set_assignment(&state.backend, &session, livreur_id, commande_ids, assign)
        .await
        .map_err(|e| backend_error("Failed to update commande assignment", e))?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/emballage/all
pub async fn list_emballages(State(state): State<AppState>, session: BackendSession) -> ApiResult {
    DeliveryService::list_emballages(&state.backend, &session)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to fetch emballages", e))
}

pub async fn get_emballage(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<i64>,
) -> ApiResult {
    DeliveryService::get_emballage(&state.backend, &session, id)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to fetch emballage", e))
}
