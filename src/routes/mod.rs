pub mod auth;
pub mod clients;
pub mod delivery;
pub mod dishes;
pub mod health;
pub mod menu_drafts;
pub mod menu_week;
pub mod metrics;
pub mod orders;

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::services::backend::BackendError;

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult = Result<Json<Value>, ApiError>;

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Relay a backend failure with the status the backend chose.
pub fn backend_error(context: &str, e: BackendError) -> ApiError {
    let status = e.status_code();
    if status.is_server_error() {
        tracing::error!("{}: {}", context, e);
    } else {
        tracing::warn!("{}: {}", context, e);
    }
    let message = match &e {
        BackendError::Status { message, .. } if !message.is_empty() => message.clone(),
        _ => context.to_string(),
    };
    api_error(status, message)
}

pub fn to_json<T: Serialize>(value: T) -> ApiResult {
    serde_json::to_value(value).map(Json).map_err(|e| {
        tracing::error!("Failed to serialize response: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Erreur interne du serveur")
    })
}

/// A query parameter the dashboard must always send.
pub fn required<T>(value: Option<T>, name: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Le paramètre {name} est requis"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_kept_for_status_errors() {
        let (status, Json(body)) = backend_error(
            "Failed to create livreur",
            BackendError::Status { status: 409, message: "Téléphone déjà utilisé".into() },
        );
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Téléphone déjà utilisé");

        let (status, Json(body)) = backend_error("Failed to fetch livreurs", BackendError::NotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Failed to fetch livreurs");
    }

    #[test]
    fn missing_parameter_is_a_bad_request() {
        let (status, Json(body)) = required::<u32>(None, "dateDebut").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Le paramètre dateDebut est requis");
        assert_eq!(required(Some(3), "page").unwrap(), 3);
    }
}
