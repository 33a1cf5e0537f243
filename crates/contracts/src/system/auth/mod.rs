use serde::{Deserialize, Serialize};

/// Login body. The backend authenticates by `username`; some deployments
/// expect `email` instead, so exactly one of the two is sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn by_username(username: &str, password: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            email: None,
            password: password.to_string(),
        }
    }

    pub fn by_email(email: &str, password: &str) -> Self {
        Self {
            username: None,
            email: Some(email.to_string()),
            password: password.to_string(),
        }
    }
}

/// Access/refresh pair as issued by `auth/login/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh may rotate the refresh token; when it does not, the old one stays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Claims read from the access token. Only `exp` is relied upon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub exp: i64, // expiration timestamp
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub username: Option<String>,
}
