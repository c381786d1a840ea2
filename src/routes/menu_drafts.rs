use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::session::BackendSession,
    models::menu::{DishId, MealSelection, MenuStatus, OrderField},
    routes::{api_error, backend_error, to_json, ApiError, ApiResult},
    services::{drafts::DraftError, menu_editor::SelectionTarget, week::week_start},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateDraftRequest {
    /// Any day of the week to edit; defaults to the current menu week.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SelectWeekRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub target: SelectionTarget,
    pub dish_id: DishId,
    pub quantity: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveDraftRequest {
    pub status: Option<MenuStatus>,
}

fn draft_error(e: DraftError) -> ApiError {
    match e {
        DraftError::NotFound => api_error(StatusCode::NOT_FOUND, e.to_string()),
        DraftError::Gating(_) | DraftError::EmptyWeek => {
            api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        DraftError::Backend(e) => backend_error("Failed to save menu week", e),
    }
}

/// POST /menu-drafts
pub async fn create_draft(
    State(state): State<AppState>,
    session: BackendSession,
    Json(body): Json<CreateDraftRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let date = match body.date {
        Some(date) => date,
        None => state.config.current_menu_monday().map_err(|e| {
            tracing::error!("Cannot compute current menu week: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Erreur interne du serveur")
        })?,
    };
    let (id, view) = state
        .drafts
        .create(&state.backend, &session, week_start(date))
        .await;
    Ok((StatusCode::CREATED, Json(json!({ "id": id, "draft": view }))))
}

pub async fn get_draft(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult {
    state.drafts.view(id).await.map_err(draft_error).and_then(to_json)
}

pub async fn delete_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.drafts.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(draft_error(DraftError::NotFound))
    }
}

/// PUT /menu-drafts/{id}/week: pending edits are discarded.
pub async fn select_week(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectWeekRequest>,
) -> ApiResult {
    state
        .drafts
        .select_week(&state.backend, &session, id, body.date)
        .await
        .map_err(draft_error)
        .and_then(to_json)
}

/// POST /menu-drafts/{id}/days/{date}/selections
pub async fn add_selection(
    State(state): State<AppState>,
    Path((id, date)): Path<(Uuid, NaiveDate)>,
    Json(body): Json<SelectionRequest>,
) -> ApiResult {
    let quantity = body.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "La quantité doit être supérieure à zéro",
        ));
    }
    let selection = MealSelection {
        id: body.dish_id,
        quantity,
    };
    let outcome = state
        .drafts
        .pick(id, date, body.target, selection)
        .await
        .map_err(draft_error)?;
    Ok(Json(json!({ "changed": outcome.changed, "draft": outcome.view })))
}

/// DELETE /menu-drafts/{id}/days/{date}/selections/{field}/{dishId}
pub async fn remove_selection(
    State(state): State<AppState>,
    Path((id, date, field, dish_id)): Path<(Uuid, NaiveDate, String, DishId)>,
) -> ApiResult {
    let field: OrderField = field
        .parse()
        .map_err(|e: anyhow::Error| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    state
        .drafts
        .remove_selection(id, date, field, dish_id)
        .await
        .map_err(draft_error)
        .and_then(to_json)
}

/// POST /menu-drafts/{id}/days/{date}/cancel
pub async fn cancel_day(
    State(state): State<AppState>,
    Path((id, date)): Path<(Uuid, NaiveDate)>,
) -> ApiResult {
    state
        .drafts
        .cancel_day(id, date)
        .await
        .map_err(draft_error)
        .and_then(to_json)
}

/// POST /menu-drafts/{id}/save: status defaults to BROUILLON.
pub async fn save_draft(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<Uuid>,
    Json(body): Json<SaveDraftRequest>,
) -> ApiResult {
    let status = body.status.unwrap_or_default();
    let saved = state
        .drafts
        .save(&state.backend, &session, id, status)
        .await
        .map_err(draft_error)?;
    tracing::info!("Draft {} saved as {} ({})", id, saved.date_debut, status);
    to_json(saved)
}
