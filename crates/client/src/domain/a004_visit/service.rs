use chrono::{DateTime, Utc};
use contracts::domain::a004_visit::Visit;
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::domain::iso_timestamp;
use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct VisitService {
    client: ResourceClient<Visit>,
}

impl VisitService {
    pub fn new(client: ResourceClient<Visit>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Visit> {
        &self.client
    }

    async fn stamp(&self, id: &RecordId, field: &str, at: DateTime<Utc>) -> Result<Visit, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set(field, iso_timestamp(at)))
            .await?;
        tracing::info!("Visit {}: {} at {}", id, field, at);
        Ok(Visit::from_record(&RawRecord::from_value(body)))
    }

    /// Регистрация входа
    pub async fn check_in(&self, id: &RecordId, at: DateTime<Utc>) -> Result<Visit, ApiError> {
        self.stamp(id, "hora_entrada", at).await
    }

    /// Регистрация выхода
    pub async fn check_out(&self, id: &RecordId, at: DateTime<Utc>) -> Result<Visit, ApiError> {
        self.stamp(id, "hora_salida", at).await
    }
}
