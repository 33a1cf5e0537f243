use std::sync::Arc;

use chrono::Utc;
use contracts::system::auth::{LoginRequest, RefreshRequest, RefreshResponse, TokenPair};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use super::jwt;
use super::storage::TokenStorage;
use crate::shared::config::AuthConfig;
use crate::shared::error::ApiError;
use crate::shared::http::{HttpRequest, HttpResponse, Method, Transport};

/// Сессия пользователя
///
/// Owns the token pair. At most one refresh is in flight: callers that hit a
/// 401 queue on `refresh_gate` and, once through, reuse whatever token the
/// first caller obtained instead of refreshing again.
pub struct Session {
    transport: Arc<dyn Transport>,
    base_url: String,
    auth: AuthConfig,
    storage: Arc<dyn TokenStorage>,
    tokens: RwLock<Option<TokenPair>>,
    refresh_gate: Mutex<()>,
}

impl Session {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: &str,
        auth: AuthConfig,
        storage: Arc<dyn TokenStorage>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
            auth,
            storage,
            tokens: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Load a previously saved token pair. Returns whether one was found.
    pub async fn restore(&self) -> Result<bool, ApiError> {
        let stored = self.storage.load().await?;
        let found = stored.is_some();
        *self.tokens.write().await = stored;
        Ok(found)
    }

    pub async fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.access.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_unauthenticated(&self, path: &str, body: Value) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest::new(Method::Post, self.url(path))
            .header(
                crate::shared::http::transport::REQUEST_ID_HEADER,
                uuid::Uuid::new_v4().to_string(),
            )
            .json(body);
        let response = self.transport.execute(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                status: response.status,
                body: response.text(),
            })
        }
    }

    async fn store(&self, tokens: TokenPair) -> Result<(), ApiError> {
        self.storage.save(&tokens).await?;
        *self.tokens.write().await = Some(tokens);
        Ok(())
    }

    async fn clear(&self) {
        *self.tokens.write().await = None;
        if let Err(e) = self.storage.clear().await {
            tracing::warn!("Failed to clear stored tokens: {}", e);
        }
    }

    // ============================================================================
    // Login / logout
    // ============================================================================

    /// Log in by username; when the backend rejects that, retry once with
    /// the same identifier sent as `email`.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<TokenPair, ApiError> {
        let by_username = serde_json::to_value(LoginRequest::by_username(identifier, password))?;
        let response = match self
            .post_unauthenticated(&self.auth.login_path, by_username)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Login by username failed ({}), retrying with email", e);
                let by_email = serde_json::to_value(LoginRequest::by_email(identifier, password))?;
                self.post_unauthenticated(&self.auth.login_path, by_email)
                    .await?
            }
        };

        let tokens: TokenPair = response.json()?;
        self.store(tokens.clone()).await?;
        tracing::info!("Logged in as {}", identifier);
        Ok(tokens)
    }

    pub async fn logout(&self) {
        self.clear().await;
        tracing::info!("Logged out");
    }

    // ============================================================================
    // Tokens for outgoing requests
    // ============================================================================

    /// Access token to attach to the next request, refreshed first when it
    /// is a JWT about to expire. `None` when nobody is logged in.
    pub async fn valid_token(&self) -> Result<Option<String>, ApiError> {
        let Some(access) = self.access_token().await else {
            return Ok(None);
        };
        if !jwt::expires_within(&access, self.auth.refresh_skew_secs, Utc::now()) {
            return Ok(Some(access));
        }

        let _gate = self.refresh_gate.lock().await;
        match self.access_token().await {
            None => Err(ApiError::Unauthorized),
            Some(current) if current != access => Ok(Some(current)),
            Some(_) => {
                tracing::debug!("Access token expires soon, refreshing");
                self.refresh_locked().await.map(Some)
            }
        }
    }

    /// Called after the backend answered 401 to a request sent with
    /// `rejected`. Returns the token to replay with.
    pub async fn refresh_after_unauthorized(&self, rejected: &str) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;
        match self.access_token().await {
            // a refresh that failed while we waited already logged us out
            None => Err(ApiError::Unauthorized),
            Some(current) if current != rejected => Ok(current),
            Some(_) => self.refresh_locked().await,
        }
    }

    /// Must be called with `refresh_gate` held.
    async fn refresh_locked(&self) -> Result<String, ApiError> {
        let stored = self
            .tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.refresh.clone())
            .filter(|r| !r.is_empty());
        let Some(refresh) = stored else {
            self.clear().await;
            return Err(ApiError::Unauthorized);
        };

        let body = serde_json::to_value(RefreshRequest {
            refresh: refresh.clone(),
        })?;
        let result = match self.post_unauthenticated(&self.auth.refresh_path, body).await {
            Ok(response) => response.json::<RefreshResponse>(),
            Err(e) => Err(e),
        };

        match result {
            Ok(renewed) => {
                let tokens = TokenPair {
                    access: renewed.access,
                    refresh: renewed.refresh.unwrap_or(refresh),
                };
                let access = tokens.access.clone();
                self.store(tokens).await?;
                tracing::info!("Access token refreshed");
                Ok(access)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, logging out: {}", e);
                self.clear().await;
                match e {
                    ApiError::Transport(_) => Err(e),
                    _ => Err(ApiError::Unauthorized),
                }
            }
        }
    }
}
