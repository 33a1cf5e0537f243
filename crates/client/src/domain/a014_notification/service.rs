use contracts::domain::a014_notification::aggregate::read_status;
use contracts::domain::a014_notification::Notification;
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};
use serde_json::Value;

use crate::shared::error::ApiError;
use crate::shared::resource_client::{try_next_route, ResourceClient};

#[derive(Clone)]
pub struct NotificationService {
    client: ResourceClient<Notification>,
}

impl NotificationService {
    pub fn new(client: ResourceClient<Notification>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Notification> {
        &self.client
    }

    /// `leida` and `estado` always move together.
    pub async fn mark_read(&self, id: &RecordId, read: bool) -> Result<Notification, ApiError> {
        let fields = Payload::new()
            .set("leida", read)
            .set("estado", read_status(read));
        let body = self.client.patch_fields(id, fields).await?;
        tracing::info!("Notification {} read = {}", id, read);
        Ok(Notification::from_record(&RawRecord::from_value(body)))
    }

    /// `POST {id}/reenviar/`, then the English `resend/` route
    pub async fn resend(&self, id: &RecordId) -> Result<Value, ApiError> {
        match self.client.post_action(id, "reenviar", None).await {
            Err(e) if try_next_route(&e) => {
                tracing::debug!("No 'reenviar' route for notification {} ({}), trying 'resend'", id, e);
                self.client.post_action(id, "resend", None).await
            }
            other => other,
        }
    }

    /// Dispatch a scheduled notification immediately
    pub async fn send_now(&self, id: &RecordId) -> Result<Value, ApiError> {
        let result = self.client.post_action(id, "enviar", None).await?;
        tracing::info!("Notification {} sent", id);
        Ok(result)
    }
}
