use serde::{Deserialize, Serialize};

/// Login form posted by the dashboard, forwarded as-is to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Result of a successful backend login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Raw `Set-Cookie` values to hand back to the browser.
    pub cookies: Vec<String>,
}
