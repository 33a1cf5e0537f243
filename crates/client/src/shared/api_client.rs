use std::sync::Arc;

use serde_json::Value;

use crate::shared::error::ApiError;
use crate::shared::http::transport::REQUEST_ID_HEADER;
use crate::shared::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::system::auth::Session;

/// Authenticated access to the backend.
///
/// Every request carries the bearer token and an `X-Request-Id`. A 401
/// triggers one shared refresh and the request is replayed once; a replay
/// that is rejected again is reported as [`ApiError::Unauthorized`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str, session: Arc<Session>) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        headers: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut request = HttpRequest::new(method, self.url(path))
            .query(query)
            .header(REQUEST_ID_HEADER, request_id.clone());
        for (name, value) in headers {
            request = request.header(name, *value);
        }
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body.clone());
        }

        tracing::debug!(request_id = %request_id, "{} {}", method, path);
        let response = self.transport.execute(request).await;
        match &response {
            Ok(r) => tracing::debug!(request_id = %request_id, status = r.status, "{} {}", method, path),
            Err(e) => tracing::error!(request_id = %request_id, "{} {} failed: {}", method, path, e),
        }
        response
    }

    /// Send a request and return the 2xx response.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<HttpResponse, ApiError> {
        self.send_with_headers(method, path, query, body, &[]).await
    }

    /// [`send`](Self::send) with extra headers on top of the bearer token
    /// (terminal keys and the like). The headers are repeated on the replay.
    pub async fn send_with_headers(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let token = self.session.valid_token().await?;
        let response = self
            .dispatch(method, path, query, body, headers, token.as_deref())
            .await?;

        if response.status != 401 {
            return into_result(response);
        }
        let Some(rejected) = token else {
            return Err(ApiError::Unauthorized);
        };

        let fresh = self.session.refresh_after_unauthorized(&rejected).await?;
        let replay = self
            .dispatch(method, path, query, body, headers, Some(&fresh))
            .await?;
        if replay.status == 401 {
            tracing::warn!("{} {} rejected again after refresh", method, path);
            return Err(ApiError::Unauthorized);
        }
        into_result(replay)
    }

    pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        self.send(Method::Get, path, query, None).await?.json_value()
    }

    pub async fn post_json(&self, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        self.send(Method::Post, path, &[], body).await?.json_value()
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(Method::Put, path, &[], Some(body)).await?.json_value()
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(Method::Patch, path, &[], Some(body)).await?.json_value()
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::Delete, path, &[], None).await.map(|_| ())
    }

    /// Raw body of a GET (PDF receipts and the like)
    pub async fn get_bytes(&self, path: &str, query: &[(String, String)]) -> Result<Vec<u8>, ApiError> {
        self.send(Method::Get, path, query, None)
            .await
            .map(|r| r.body)
    }
}

fn into_result(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: response.status,
            body: response.text(),
        })
    }
}
