use contracts::domain::a019_tag::Tag;
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct TagService {
    client: ResourceClient<Tag>,
}

impl TagService {
    pub fn new(client: ResourceClient<Tag>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Tag> {
        &self.client
    }

    /// Tags use `activo`, unlike staff and services.
    pub async fn set_active(&self, id: &RecordId, active: bool) -> Result<Tag, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("activo", active))
            .await?;
        tracing::info!("Tag {} active = {}", id, active);
        Ok(Tag::from_record(&RawRecord::from_value(body)))
    }
}
