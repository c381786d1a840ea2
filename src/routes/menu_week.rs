use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    middleware::session::BackendSession,
    models::menu::{CreateMenuWeekRequest, MenuMonthQuery, MenuStatusQuery, MenuWeekQuery},
    routes::{backend_error, required, to_json, ApiResult},
    services::{menu::MenuService, week::week_start},
    AppState,
};

/// GET /api/menu-week/by-date?dateDebut=YYYY-MM-DD: `[]` when no week exists.
pub async fn by_date(
    State(state): State<AppState>,
    session: BackendSession,
    Query(params): Query<MenuWeekQuery>,
) -> ApiResult {
    let date_debut = required(params.date_debut, "dateDebut")?;
    to_json(MenuService::week_by_date(&state.backend, &session, week_start(date_debut)).await)
}

/// GET /api/menu-week/month?date=YYYY-MM-DD
pub async fn month(
    State(state): State<AppState>,
    session: BackendSession,
    Query(params): Query<MenuMonthQuery>,
) -> ApiResult {
    to_json(MenuService::weeks_for_month(&state.backend, &session, params.date).await)
}

/// POST /api/menu-week/create
pub async fn create(
    State(state): State<AppState>,
    session: BackendSession,
    Json(body): Json<CreateMenuWeekRequest>,
) -> ApiResult {
    MenuService::create_or_update(&state.backend, &session, &body)
        .await
        .map_err(|e| backend_error("Failed to create menu week", e))
        .and_then(to_json)
}

/// PUT /api/menu-week/{id}/status?newStatus=
pub async fn update_status(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<i64>,
    Query(params): Query<MenuStatusQuery>,
) -> ApiResult {
    let new_status = required(params.new_status, "newStatus")?;
    let updated = MenuService::update_status(&state.backend, &session, id, &new_status)
        .await
        .map_err(|e| backend_error("Failed to update menu status", e))?;
    tracing::info!("Menu week {} moved to {}", id, new_status);
    Ok(Json(updated))
}
