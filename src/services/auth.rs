use reqwest::header::SET_COOKIE;
use serde_json::Value;

use crate::{
    middleware::session::BackendSession,
    models::auth::{LoginOutcome, LoginRequest},
    services::backend::{BackendClient, BackendError},
};

pub struct AuthService;

impl AuthService {
    /// Log in against the backend and collect the session cookies it sets.
    pub async fn login(
        backend: &BackendClient,
        req: &LoginRequest,
    ) -> Result<LoginOutcome, BackendError> {
        let response = backend
            .post_form("auth.login", "/login", req, &BackendSession::anonymous())
            .await?;
        let cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        tracing::info!("Login succeeded for {}", req.username);
        Ok(LoginOutcome { cookies })
    }

    pub async fn me(backend: &BackendClient, session: &BackendSession) -> Result<Value, BackendError> {
        backend.get_json("auth.me", "/auth/me", &[], session).await
    }
}
