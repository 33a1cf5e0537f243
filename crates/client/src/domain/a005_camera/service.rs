use contracts::domain::a005_camera::Camera;
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};
use serde_json::Value;

use crate::shared::error::ApiError;
use crate::shared::resource_client::{try_next_route, ResourceClient};

#[derive(Clone)]
pub struct CameraService {
    client: ResourceClient<Camera>,
}

impl CameraService {
    pub fn new(client: ResourceClient<Camera>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Camera> {
        &self.client
    }

    pub async fn set_active(&self, id: &RecordId, active: bool) -> Result<Camera, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("activa", active))
            .await?;
        tracing::info!("Camera {} active = {}", id, active);
        Ok(Camera::from_record(&RawRecord::from_value(body)))
    }

    /// Connectivity check: `POST {id}/test/`, or `GET` when POST is refused
    pub async fn test_connection(&self, id: &RecordId) -> Result<Value, ApiError> {
        match self.client.post_action(id, "test", None).await {
            Err(e) if try_next_route(&e) => {
                tracing::debug!("POST test refused for camera {} ({}), trying GET", id, e);
                self.client.get_action(id, "test").await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::fake::FakeTransport;
    use crate::shared::http::Method;
    use crate::shared::resource_client::test_support::client;
    use serde_json::json;

    #[tokio::test]
    async fn test_deactivate() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "camaras/2/", 200, json!({"id": 2, "nombre": "Lobby", "activa": false}));
        let cameras = CameraService::new(client::<Camera>(&fake).await);

        let camera = cameras.set_active(&RecordId::Int(2), false).await.unwrap();
        assert!(!camera.active);
        assert_eq!(
            fake.last(Method::Patch, "camaras/2/").and_then(|c| c.body),
            Some(json!({"activa": false}))
        );
    }

    #[tokio::test]
    async fn test_connection_test_falls_back_to_get() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "camaras/2/test/", 405, Value::Null);
        fake.on(Method::Get, "camaras/2/test/", 200, json!({"online": true}));
        let cameras = CameraService::new(client::<Camera>(&fake).await);

        let result = cameras.test_connection(&RecordId::Int(2)).await.unwrap();
        assert_eq!(result["online"], json!(true));
        assert_eq!(fake.log(), vec!["POST camaras/2/test/", "GET camaras/2/test/"]);
    }
}
