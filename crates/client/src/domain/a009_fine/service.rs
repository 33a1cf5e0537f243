use contracts::domain::a009_fine::{Fine, FineStatus};
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};
use serde_json::Value;

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct FineService {
    client: ResourceClient<Fine>,
}

impl FineService {
    pub fn new(client: ResourceClient<Fine>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Fine> {
        &self.client
    }

    pub async fn set_status(&self, id: &RecordId, status: FineStatus) -> Result<Fine, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("estado", status.as_str()))
            .await?;
        tracing::info!("Fine {} -> {}", id, status.as_str());
        Ok(Fine::from_record(&RawRecord::from_value(body)))
    }

    /// Ask the backend to bill the fine. Returns the created invoice as sent.
    pub async fn generate_invoice(&self, id: &RecordId) -> Result<Value, ApiError> {
        let body = self.client.post_action(id, "generar-factura", None).await?;
        tracing::info!("Fine {}: invoice generated", id);
        Ok(body)
    }
}
