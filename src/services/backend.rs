use std::time::{Duration, Instant};

use axum::http::StatusCode;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::middleware::session::BackendSession;
use crate::services::metrics;

/// Failures talking to the remote backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("resource not found")]
    NotFound,
    #[error("authentication required")]
    Unauthorized,
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    /// Status the gateway answers with when relaying this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BackendError::NotFound => StatusCode::NOT_FOUND,
            BackendError::Unauthorized => StatusCode::UNAUTHORIZED,
            BackendError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            BackendError::Transport(_) | BackendError::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            BackendError::NotFound => "not_found",
            BackendError::Unauthorized => "unauthorized",
            BackendError::Status { .. } => "error_status",
            BackendError::Transport(_) => "transport",
            BackendError::Decode(_) => "decode",
        }
    }
}

/// Query string pairs appended to a backend call.
pub type Query<'a> = &'a [(&'static str, String)];

/// HTTP client for the remote REST backend.
///
/// Every call carries the caller's session cookie and is labelled with a short
/// endpoint name for metrics and logs.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build backend HTTP client: {e}"))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        session: &BackendSession,
    ) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(cookie) = session.cookie() {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn execute(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> Result<Response, BackendError> {
        let started = Instant::now();
        let result = match builder.send().await {
            Ok(response) => check(response).await,
            Err(e) => Err(BackendError::Transport(e)),
        };
        let elapsed = started.elapsed().as_secs_f64();
        match &result {
            Ok(_) => metrics::record_backend_call(endpoint, "ok", elapsed),
            Err(e) => {
                metrics::record_backend_call(endpoint, e.outcome(), elapsed);
                tracing::debug!("Backend call {} failed: {}", endpoint, e);
            }
        }
        result
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            // Some mutations answer 200 with no body.
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: Query<'_>,
        session: &BackendSession,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::GET, path, query, session);
        let response = self.execute(endpoint, builder).await?;
        Self::decode(response).await
    }

    /// Send a JSON body (or none) with `method` and decode the JSON answer.
    pub async fn send_json<B, T>(
        &self,
        endpoint: &'static str,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
        session: &BackendSession,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, path, query, session);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.execute(endpoint, builder).await?;
        Self::decode(response).await
    }

    pub async fn delete(
        &self,
        endpoint: &'static str,
        path: &str,
        session: &BackendSession,
    ) -> Result<(), BackendError> {
        let builder = self.request(Method::DELETE, path, &[], session);
        self.execute(endpoint, builder).await?;
        Ok(())
    }

    /// POST an url-encoded form and hand back the raw response (headers included).
    pub async fn post_form<F: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        path: &str,
        form: &F,
        session: &BackendSession,
    ) -> Result<Response, BackendError> {
        let builder = self.request(Method::POST, path, &[], session).form(form);
        self.execute(endpoint, builder).await
    }

    pub async fn post_multipart(
        &self,
        endpoint: &'static str,
        path: &str,
        form: reqwest::multipart::Form,
        session: &BackendSession,
    ) -> Result<serde_json::Value, BackendError> {
        let builder = self.request(Method::POST, path, &[], session).multipart(form);
        let response = self.execute(endpoint, builder).await?;
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        if is_json {
            return Self::decode(response).await;
        }
        // Photo uploads answer with the stored file name as plain text.
        let text = response.text().await?;
        Ok(serde_json::json!({ "fileName": text }))
    }
}

/// Map a non-success status to a [`BackendError`], keeping the backend's message.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        reqwest::StatusCode::NOT_FOUND => Err(BackendError::NotFound),
        reqwest::StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
        _ => {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .or_else(|| v.get("error"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or(text);
            Err(BackendError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_gateway_statuses() {
        assert_eq!(BackendError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BackendError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            BackendError::Status { status: 409, message: "conflict".into() }.status_code(),
            StatusCode::CONFLICT
        );
        let decode = serde_json::from_str::<i32>("nope").unwrap_err();
        assert_eq!(BackendError::from(decode).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = BackendClient::new("http://backend:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://backend:8080");
    }
}
