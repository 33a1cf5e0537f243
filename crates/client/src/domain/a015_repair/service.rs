use contracts::domain::a015_repair::{Repair, RepairStatus};
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct RepairService {
    client: ResourceClient<Repair>,
}

impl RepairService {
    pub fn new(client: ResourceClient<Repair>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Repair> {
        &self.client
    }

    pub async fn set_status(&self, id: &RecordId, status: RepairStatus) -> Result<Repair, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("estado", status.as_str()))
            .await?;
        tracing::info!("Repair {} -> {}", id, status.as_str());
        Ok(Repair::from_record(&RawRecord::from_value(body)))
    }

    /// Save with `total` recomputed from the cost lines
    pub async fn save_with_total(&self, repair: &Repair) -> Result<Repair, ApiError> {
        let mut repair = repair.clone();
        repair.total = repair.cost_sum();
        self.client.save(&repair).await
    }
}
