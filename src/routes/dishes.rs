use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    middleware::session::BackendSession,
    models::{
        dish::{PlatData, PlatFilter, PlatsDetailsQuery, WeekStatsQuery},
        menu::DishId,
    },
    routes::{api_error, backend_error, required, to_json, ApiResult},
    services::dishes::{DishService, PhotoUpload},
    AppState,
};

/// GET /api/plats/filter/{filter}: ALL, PLAT, ENTREE or DESSERT.
pub async fn list_plats(
    State(state): State<AppState>,
    session: BackendSession,
    Path(filter): Path<String>,
) -> ApiResult {
    let filter: PlatFilter = filter
        .parse()
        .map_err(|e: anyhow::Error| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    to_json(DishService::list(&state.backend, &session, filter).await)
}

pub async fn get_plat(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<DishId>,
) -> ApiResult {
    match DishService::get(&state.backend, &session, id).await {
        Some(plat) => to_json(plat),
        None => Err(api_error(StatusCode::NOT_FOUND, "Plat introuvable")),
    }
}

/// POST /api/plats/add
pub async fn create_plat(
    State(state): State<AppState>,
    session: BackendSession,
    Json(body): Json<PlatData>,
) -> ApiResult {
    body.validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let plat = DishService::create(&state.backend, &session, &body)
        .await
        .map_err(|e| backend_error("Failed to create plat", e))?;
    tracing::info!("Created plat {} ({})", plat.id, plat.nom_plat);
    to_json(plat)
}

/// PUT /api/plats/update/{id}
pub async fn update_plat(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<DishId>,
    Json(body): Json<PlatData>,
) -> ApiResult {
    body.validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    DishService::update(&state.backend, &session, id, &body)
        .await
        .map_err(|e| backend_error("Failed to update plat", e))
        .and_then(to_json)
}

/// DELETE /api/plats/delete/{id}
pub async fn delete_plat(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<DishId>,
) -> ApiResult {
    DishService::delete(&state.backend, &session, id)
        .await
        .map_err(|e| backend_error("Failed to delete plat", e))?;
    tracing::info!("Deleted plat {}", id);
    Ok(Json(json!({ "success": true })))
}

/// GET /api/plat-calories/{id}/{type}
pub async fn plat_calories(
    State(state): State<AppState>,
    session: BackendSession,
    Path((id, type_user)): Path<(DishId, String)>,
) -> ApiResult {
    DishService::calories(&state.backend, &session, id, &type_user)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to fetch plat calories", e))
}

/// GET /api/plats/{id}/stats-week?dateDebut=
pub async fn stats_week(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<DishId>,
    Query(params): Query<WeekStatsQuery>,
) -> ApiResult {
    let date_debut = required(params.date_debut, "dateDebut")?;
    DishService::stats_week(&state.backend, &session, id, date_debut)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to fetch plat stats", e))
}

/// GET /api/plats/{id}/allergy-stats/week?dateDebut=YYYY-MM-DD: `null` when there is no data.
pub async fn allergy_stats_week(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<DishId>,
    Query(params): Query<WeekStatsQuery>,
) -> ApiResult {
    let date_debut = required(params.date_debut, "dateDebut")?;
    DishService::allergy_stats_week(&state.backend, &session, id, date_debut)
        .await
        .map(|stats| Json(stats.unwrap_or(Value::Null)))
        .map_err(|e| backend_error("Failed to fetch allergy stats", e))
}

/// GET /api/plats/menujours/plats-details?date=&typePlat=&week=
pub async fn plats_details(
    State(state): State<AppState>,
    session: BackendSession,
    Query(params): Query<PlatsDetailsQuery>,
) -> ApiResult {
    let date = required(params.date, "date")?;
    let type_plat = required(params.type_plat, "typePlat")?;
    let details = DishService::plats_details(&state.backend, &session, date, &type_plat, params.week)
        .await
        .map_err(|e| backend_error("Failed to fetch plats details", e))?;
    to_json(details)
}

/// POST /api/plats/{id}/upload-photo: multipart with a single `file` field.
pub async fn upload_photo(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<DishId>,
    mut multipart: Multipart,
) -> ApiResult {
    let mut photo = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
        photo = Some(PhotoUpload {
            file_name,
            content_type,
            bytes,
        });
    }
    let photo = photo.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Aucun fichier fourni"))?;

    let stored = DishService::upload_photo(&state.backend, &session, id, photo)
        .await
        .map_err(|e| backend_error("Failed to update plat image", e))?;
    let image_url = stored
        .get("fileName")
        .or_else(|| stored.get("imageUrl"))
        .cloned()
        .unwrap_or(Value::Null);
    Ok(Json(json!({
        "success": true,
        "message": "Photo de plat mise à jour avec succès!",
        "imageUrl": image_url,
    })))
}
