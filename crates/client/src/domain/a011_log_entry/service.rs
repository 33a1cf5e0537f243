use contracts::domain::a011_log_entry::{LogEntry, LogStatus};
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct LogService {
    client: ResourceClient<LogEntry>,
}

impl LogService {
    pub fn new(client: ResourceClient<LogEntry>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<LogEntry> {
        &self.client
    }

    /// Открыть/закрыть запись журнала
    pub async fn set_status(&self, id: &RecordId, status: LogStatus) -> Result<LogEntry, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("status", status.as_str()))
            .await?;
        tracing::info!("Log entry {} -> {}", id, status.as_str());
        Ok(LogEntry::from_record(&RawRecord::from_value(body)))
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
    async fn test_close_entry() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "bitacora/12/", 200, json!({"id": 12, "status": "CERRADO"}));
        let logs = LogService::new(client::<LogEntry>(&fake).await);

        let entry = logs.set_status(&RecordId::Int(12), LogStatus::Closed).await.unwrap();
        assert!(entry.is_closed());
        assert_eq!(
            fake.last(Method::Patch, "bitacora/12/").and_then(|c| c.body),
            Some(json!({"status": "CERRADO"}))
        );
    }
}
