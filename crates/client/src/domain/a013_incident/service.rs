use chrono::{DateTime, Utc};
use contracts::domain::a013_incident::{Incident, IncidentStatus};
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::domain::iso_timestamp;
use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct IncidentService {
    client: ResourceClient<Incident>,
}

impl IncidentService {
    pub fn new(client: ResourceClient<Incident>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Incident> {
        &self.client
    }

    async fn patch(&self, id: &RecordId, fields: Payload) -> Result<Incident, ApiError> {
        let body = self.client.patch_fields(id, fields).await?;
        Ok(Incident::from_record(&RawRecord::from_value(body)))
    }

    pub async fn set_status(&self, id: &RecordId, status: IncidentStatus) -> Result<Incident, ApiError> {
        let incident = self
            .patch(id, Payload::new().set("estado", status.as_str()))
            .await?;
        tracing::info!("Incident {} -> {}", id, status.as_str());
        Ok(incident)
    }

    /// Mark resolved and stamp the resolution time in the same PATCH
    pub async fn resolve(&self, id: &RecordId, at: DateTime<Utc>) -> Result<Incident, ApiError> {
        let fields = Payload::new()
            .set("estado", IncidentStatus::Resolved.as_str())
            .set("fecha_resolucion", iso_timestamp(at));
        let incident = self.patch(id, fields).await?;
        tracing::info!("Incident {} resolved", id);
        Ok(incident)
    }
}
