use contracts::domain::a026_access_event::{AccessEvent, FaceMatchRequest};
use contracts::shared::{ListQuery, Page};
use serde_json::Value;

use crate::shared::config::FacialConfig;
use crate::shared::error::ApiError;
use crate::shared::http::Method;
use crate::shared::ApiClient;

pub const TERMINAL_KEY_HEADER: &str = "X-Terminal-Key";

/// Face identification and verification through an access terminal.
///
/// Every call carries the terminal key; the backend rejects terminals it
/// does not know.
#[derive(Clone)]
pub struct FaceRecognitionService {
    api: ApiClient,
    config: FacialConfig,
}

impl FaceRecognitionService {
    pub fn new(api: ApiClient, config: FacialConfig) -> Self {
        Self { api, config }
    }

    fn path(&self, action: &str) -> String {
        let base = self.config.path.trim_start_matches('/');
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        if action.is_empty() {
            base
        } else {
            format!("{}{}/", base, action.trim_matches('/'))
        }
    }

    async fn call(&self, method: Method, action: &str, query: &[(String, String)], body: Option<&Value>) -> Result<Value, ApiError> {
        let key = self.config.terminal_key.trim();
        if key.is_empty() {
            return Err(ApiError::Validation(
                "Configure [facial] terminal_key para usar el reconocimiento facial".into(),
            ));
        }
        self.api
            .send_with_headers(method, &self.path(action), query, body, &[(TERMINAL_KEY_HEADER, key)])
            .await?
            .json_value()
    }

    pub async fn list_events(&self, query: &ListQuery) -> Result<Page<AccessEvent>, ApiError> {
        let body = self.call(Method::Get, "", &query.to_query_pairs(), None).await?;
        Ok(Page::from_response(body).map(|raw| AccessEvent::from_record(&raw)))
    }

    /// 1:N search for the closest enrolled user
    pub async fn identify(&self, request: &FaceMatchRequest) -> Result<Value, ApiError> {
        request.validate().map_err(ApiError::Validation)?;
        let body = serde_json::to_value(request)?;
        let result = self.call(Method::Post, "identify", &[], Some(&body)).await?;
        tracing::info!("Face identify: {}", result);
        Ok(result)
    }

    /// 1:1 comparison against `request.usuario`
    pub async fn verify(&self, request: &FaceMatchRequest) -> Result<Value, ApiError> {
        let Some(user) = &request.usuario else {
            return Err(ApiError::Validation("Seleccione el usuario a verificar".into()));
        };
        request.validate().map_err(ApiError::Validation)?;
        let body = serde_json::to_value(request)?;
        let result = self.call(Method::Post, "verify", &[], Some(&body)).await?;
        tracing::info!("Face verify for user {}: {}", user, result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api_client::test_support::logged_in;
    use crate::shared::http::fake::FakeTransport;
    use contracts::shared::RecordId;
    use serde_json::json;
    use std::sync::Arc;

    async fn service(fake: &Arc<FakeTransport>, key: &str) -> FaceRecognitionService {
        let config = FacialConfig {
            terminal_key: key.to_string(),
            ..Default::default()
        };
        FaceRecognitionService::new(logged_in(fake).await, config)
    }

    #[tokio::test]
    async fn test_identify_sends_terminal_key_and_threshold() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "facial/events/identify/", 200, json!({"match": true, "usuario": 14}));
        let faces = service(&fake, "term-1").await;

        let result = faces.identify(&FaceMatchRequest::from_image("aGVsbG8=")).await.unwrap();
        assert_eq!(result["usuario"], json!(14));
        let call = fake.last(Method::Post, "facial/events/identify/").unwrap();
        assert_eq!(call.header_value(TERMINAL_KEY_HEADER), Some("term-1"));
        assert_eq!(call.body, Some(json!({"image_b64": "aGVsbG8=", "threshold": 0.75})));
    }

    #[tokio::test]
    async fn test_verify_requires_user() {
        let fake = FakeTransport::new();
        let faces = service(&fake, "term-1").await;

        let err = faces
            .verify(&FaceMatchRequest::from_embedding(vec![0.2]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_verify_posts_user() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "facial/events/verify/", 200, json!({"match": false}));
        let faces = service(&fake, "term-1").await;

        let request = FaceMatchRequest::from_embedding(vec![0.2]).for_user(RecordId::Int(1));
        faces.verify(&request).await.unwrap();
        let call = fake.last(Method::Post, "facial/events/verify/").unwrap();
        assert_eq!(call.body.map(|b| b["usuario"].clone()), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_missing_terminal_key_is_rejected_locally() {
        let fake = FakeTransport::new();
        let faces = service(&fake, " ").await;

        let err = faces.list_events(&ListQuery::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_events() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "facial/events/",
            200,
            json!({"count": 1, "results": [{"id": 40, "metodo": "IDENTIFY", "exito": true}]}),
        );
        let faces = service(&fake, "term-1").await;

        let page = faces.list_events(&ListQuery::new()).await.unwrap();
        assert_eq!(page.count, 1);
        assert!(page.results[0].success);
        let call = fake.last(Method::Get, "facial/events/").unwrap();
        assert_eq!(call.header_value(TERMINAL_KEY_HEADER), Some("term-1"));
        assert_eq!(call.header_value("Authorization"), Some("Bearer a1"));
    }
}
