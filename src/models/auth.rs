//! Authentication-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: super::user::UserResponse,
}

/// Token refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Refresh token record (token stored hashed, never in plaintext)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub token_hash: String,
    pub user_id: i64,
    pub user_agent: Option<String>,
    pub ip_address: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Login event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoginEvent {
    pub id: i64,
    pub user_id: Option<i64>,
    pub username: String,
    pub event_type: String, // login_success, login_failure, logout
    pub failure_reason: Option<String>,
    pub source_ip: String,
    pub user_agent: Option<String>,
    pub occurred_at: DateTime<Utc>,
}
