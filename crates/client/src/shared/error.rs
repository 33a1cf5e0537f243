use thiserror::Error;

/// Ошибки обращения к API
///
/// Every variant carries owned strings so a single failure can be handed to
/// every caller waiting on the same refresh.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request failed with status {status}")]
    Status { status: u16, body: String },

    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("No endpoint answered for '{resource}' (tried: {})", tried.join(", "))]
    Discovery { resource: String, tried: Vec<String> },

    #[error("Token storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Text shown next to a form or list after a failed call: the response
    /// body when the backend sent one, otherwise a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    format!("La operación falló (HTTP {})", status)
                } else {
                    body.to_string()
                }
            }
            ApiError::Transport(_) => "No se pudo conectar con el servidor".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
