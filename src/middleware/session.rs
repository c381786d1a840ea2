use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// The dashboard's session cookie, forwarded untouched to the backend.
///
/// The gateway never inspects it: the backend owns authentication and answers
/// 401 when the cookie is missing or expired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendSession(pub Option<String>);

impl BackendSession {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn cookie(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BackendSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cookie = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .collect::<Vec<_>>()
            .join("; ");

        Ok(BackendSession(if cookie.is_empty() { None } else { Some(cookie) }))
    }
}
