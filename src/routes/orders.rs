use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    middleware::session::BackendSession,
    models::order::{ByDateQuery, ByDateRangeQuery},
    routes::{api_error, backend_error, required, ApiResult},
    services::orders::OrderService,
    AppState,
};

/// GET /api/commandes/by-date?dateLivraison=YYYY-MM-DD
pub async fn by_date(
    State(state): State<AppState>,
    session: BackendSession,
    Query(params): Query<ByDateQuery>,
) -> ApiResult {
    let date = required(params.date_livraison, "dateLivraison")?;
    OrderService::by_date(&state.backend, &session, date)
        .await
        .map(|orders| Json(orders.into()))
        .map_err(|e| backend_error("Failed to fetch commandes", e))
}

/// GET /api/commandes/by-date-range?startDate=&endDate=
pub async fn by_date_range(
    State(state): State<AppState>,
    session: BackendSession,
    Query(params): Query<ByDateRangeQuery>,
) -> ApiResult {
    required(params.start_date, "startDate")?;
    required(params.end_date, "endDate")?;
    let (start, end) = params.range().ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            "startDate doit précéder endDate",
        )
    })?;
    OrderService::by_date_range(&state.backend, &session, start, end)
        .await
        .map(|orders| Json(orders.into()))
        .map_err(|e| backend_error("Failed to fetch commandes", e))
}

/// GET /api/commandes/client/{id}
pub async fn by_client(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<String>,
) -> ApiResult {
    OrderService::by_client(&state.backend, &session, &id)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to fetch client commandes", e))
}
