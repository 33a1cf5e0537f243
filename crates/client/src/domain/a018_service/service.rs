use contracts::domain::a018_service::Service;
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

/// Contracted services (cleaning, security, upkeep)
#[derive(Clone)]
pub struct ServiceCatalog {
    client: ResourceClient<Service>,
}

impl ServiceCatalog {
    pub fn new(client: ResourceClient<Service>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Service> {
        &self.client
    }

    pub async fn set_active(&self, id: &RecordId, active: bool) -> Result<Service, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("is_active", active))
            .await?;
        tracing::info!("Service {} active = {}", id, active);
        Ok(Service::from_record(&RawRecord::from_value(body)))
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
    async fn test_activate() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "servicios/7/", 200, json!({"id": 7, "nombre": "Jardinería", "is_active": true}));
        let services = ServiceCatalog::new(client::<Service>(&fake).await);

        let service = services.set_active(&RecordId::Int(7), true).await.unwrap();
        assert!(service.active);
        assert_eq!(
            fake.last(Method::Patch, "servicios/7/").and_then(|c| c.body),
            Some(json!({"is_active": true}))
        );
    }
}
