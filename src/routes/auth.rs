use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Form, Json,
};
use serde_json::{json, Value};

use crate::{
    middleware::session::BackendSession,
    models::auth::LoginRequest,
    routes::{api_error, backend_error, ApiError, ApiResult},
    services::{auth::AuthService, backend::BackendError, clients::ClientService},
    AppState,
};

/// POST /api/auth/login: forwards the form and hands the backend cookies to the browser.
pub async fn login(
    State(state): State<AppState>,
    Form(body): Form<LoginRequest>,
) -> Result<(HeaderMap, Json<Value>), ApiError> {
    let outcome = AuthService::login(&state.backend, &body)
        .await
        .map_err(|e| match e {
            BackendError::Unauthorized => {
                api_error(StatusCode::UNAUTHORIZED, "Identifiants invalides")
            }
            e => backend_error("Login failed", e),
        })?;

    let mut headers = HeaderMap::new();
    for cookie in &outcome.cookies {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            headers.append(header::SET_COOKIE, value);
        }
    }
    Ok((headers, Json(json!({ "success": true }))))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, session: BackendSession) -> ApiResult {
    AuthService::me(&state.backend, &session)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to fetch current user", e))
}

/// GET /api/auth/{id}: profile of the logged-in client.
pub async fn get_user(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<String>,
) -> ApiResult {
    ClientService::get(&state.backend, &session, &id)
        .await
        .map(Json)
        .map_err(|e| backend_error("Failed to fetch client data", e))
}

/// PUT /api/auth/{id}
pub async fn update_user(
    State(state): State<AppState>,
    session: BackendSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let data = ClientService::update(&state.backend, &session, &id, &body)
        .await
        .map_err(|e| backend_error("Failed to update profile", e))?;
    Ok(Json(json!({ "success": true, "data": data })))
}
