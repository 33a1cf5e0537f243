use contracts::domain::a008_payment::{Payment, PaymentStatus};
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct PaymentService {
    client: ResourceClient<Payment>,
}

impl PaymentService {
    pub fn new(client: ResourceClient<Payment>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Payment> {
        &self.client
    }

    pub async fn set_status(&self, id: &RecordId, status: PaymentStatus) -> Result<Payment, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("estado", status.as_str()))
            .await?;
        tracing::info!("Payment {} -> {}", id, status.as_str());
        Ok(Payment::from_record(&RawRecord::from_value(body)))
    }

    /// Квитанция в PDF
    pub async fn receipt(&self, id: &RecordId) -> Result<Vec<u8>, ApiError> {
        self.client.download(id, &["pdf"]).await
    }
}
