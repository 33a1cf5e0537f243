use chrono::{DateTime, Utc};
use contracts::domain::a010_maintenance_task::{MaintenanceTask, TaskStatus};
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};
use serde_json::Value;

use crate::domain::iso_timestamp;
use crate::shared::error::ApiError;
use crate::shared::resource_client::{try_next_route, ResourceClient};

#[derive(Clone)]
pub struct TaskService {
    client: ResourceClient<MaintenanceTask>,
}

impl TaskService {
    pub fn new(client: ResourceClient<MaintenanceTask>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<MaintenanceTask> {
        &self.client
    }

    pub async fn set_status(&self, id: &RecordId, status: TaskStatus) -> Result<MaintenanceTask, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("status", status.as_str()))
            .await?;
        Ok(MaintenanceTask::from_record(&RawRecord::from_value(body)))
    }

    /// POST the workflow action; when the backend has no such route, PATCH
    /// the status (and timestamp) instead.
    async fn transition(&self, id: &RecordId, action: &str, fallback: Payload) -> Result<Value, ApiError> {
        let result = match self.client.post_action(id, action, None).await {
            Err(e) if try_next_route(&e) => {
                tracing::debug!("Task {}: no '{}' route ({}), patching status", id, action, e);
                self.client.patch_fields(id, fallback).await
            }
            other => other,
        };
        if result.is_ok() {
            tracing::info!("Task {}: {}", id, action);
        }
        result
    }

    pub async fn start(&self, id: &RecordId, at: DateTime<Utc>) -> Result<Value, ApiError> {
        let fallback = Payload::new()
            .set("status", TaskStatus::InProgress.as_str())
            .set("started_at", iso_timestamp(at));
        self.transition(id, "start", fallback).await
    }

    pub async fn complete(&self, id: &RecordId, at: DateTime<Utc>) -> Result<Value, ApiError> {
        let fallback = Payload::new()
            .set("status", TaskStatus::Completed.as_str())
            .set("completed_at", iso_timestamp(at));
        self.transition(id, "complete", fallback).await
    }

    pub async fn cancel(&self, id: &RecordId) -> Result<Value, ApiError> {
        let fallback = Payload::new().set("status", TaskStatus::Cancelled.as_str());
        self.transition(id, "cancel", fallback).await
    }
}
