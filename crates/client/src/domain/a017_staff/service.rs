use contracts::domain::a017_staff::StaffMember;
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct StaffService {
    client: ResourceClient<StaffMember>,
}

impl StaffService {
    pub fn new(client: ResourceClient<StaffMember>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<StaffMember> {
        &self.client
    }

    pub async fn set_active(&self, id: &RecordId, active: bool) -> Result<StaffMember, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("is_active", active))
            .await?;
        tracing::info!("Staff member {} active = {}", id, active);
        Ok(StaffMember::from_record(&RawRecord::from_value(body)))
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
    async fn test_deactivate() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "personal/2/", 200, json!({"id": 2, "first_name": "Luis", "is_active": false}));
        let staff = StaffService::new(client::<StaffMember>(&fake).await);

        let member = staff.set_active(&RecordId::Int(2), false).await.unwrap();
        assert!(!member.active);
        assert_eq!(member.first_name, "Luis");
        assert_eq!(
            fake.last(Method::Patch, "personal/2/").and_then(|c| c.body),
            Some(json!({"is_active": false}))
        );
    }
}
