use contracts::domain::a001_user::User;
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};
use serde_json::{json, Value};

use crate::shared::error::ApiError;
use crate::shared::resource_client::{try_next_route, ResourceClient};

/// Операции над пользователями помимо CRUD
#[derive(Clone)]
pub struct UserService {
    client: ResourceClient<User>,
}

impl UserService {
    pub fn new(client: ResourceClient<User>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<User> {
        &self.client
    }

    pub async fn set_active(&self, id: &RecordId, active: bool) -> Result<User, ApiError> {
        let body = self
            .client
            .patch_fields(id, Payload::new().set("is_active", active))
            .await?;
        tracing::info!("User {} active = {}", id, active);
        Ok(User::from_record(&RawRecord::from_value(body)))
    }

    pub async fn toggle_active(&self, user: &User) -> Result<User, ApiError> {
        let id = user
            .id()
            .ok_or_else(|| ApiError::Validation("Usuario sin id".into()))?;
        self.set_active(id, !user.is_active).await
    }

    pub async fn reset_password(&self, id: &RecordId) -> Result<Value, ApiError> {
        match self.client.post_action(id, "reset_password", None).await {
            Err(e) if try_next_route(&e) => {
                tracing::debug!("reset_password not available ({}), trying reset-password", e);
                self.client.post_action(id, "reset-password", None).await
            }
            other => other,
        }
    }

    pub async fn assign_role(&self, id: &RecordId, role: &RecordId) -> Result<Value, ApiError> {
        let body = json!({ "role_id": role.to_value() });
        match self.client.post_action(id, "assign_role", Some(&body)).await {
            Err(e) if try_next_route(&e) => {
                tracing::debug!("assign_role not available ({}), trying rol", e);
                let body = json!({ "rol_id": role.to_value() });
                self.client.post_action(id, "rol", Some(&body)).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::fake::FakeTransport;
    use crate::shared::http::Method;
    use crate::shared::resource_client::test_support::client;

    #[tokio::test]
    async fn test_toggle_active_patches_flag() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "users/7/", 200, json!({"id": 7, "username": "ana", "is_active": false}));
        let users = UserService::new(client::<User>(&fake).await);
        let user = User::from_record(&RawRecord::from_value(json!({"id": 7, "username": "ana"})));

        let updated = users.toggle_active(&user).await.unwrap();
        assert!(!updated.is_active);
        let call = fake.last(Method::Patch, "users/7/").unwrap();
        assert_eq!(call.body, Some(json!({"is_active": false})));
    }

    #[tokio::test]
    async fn test_reset_password_falls_back_to_dashed_route() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "users/7/reset-password/", 200, json!({"ok": true}));
        let users = UserService::new(client::<User>(&fake).await);

        let result = users.reset_password(&RecordId::Int(7)).await.unwrap();
        assert_eq!(result, json!({"ok": true}));
        assert_eq!(
            fake.log(),
            vec!["POST users/7/reset_password/", "POST users/7/reset-password/"]
        );
    }

    #[tokio::test]
    async fn test_assign_role_fallback_renames_key() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "users/7/assign_role/", 405, Value::Null);
        fake.on(Method::Post, "users/7/rol/", 200, json!({}));
        let users = UserService::new(client::<User>(&fake).await);

        users.assign_role(&RecordId::Int(7), &RecordId::Int(3)).await.unwrap();
        assert_eq!(
            fake.last(Method::Post, "users/7/assign_role/").and_then(|c| c.body),
            Some(json!({"role_id": 3}))
        );
        assert_eq!(
            fake.last(Method::Post, "users/7/rol/").and_then(|c| c.body),
            Some(json!({"rol_id": 3}))
        );
    }

    #[tokio::test]
    async fn test_network_failure_does_not_try_fallback() {
        let fake = FakeTransport::new();
        fake.unreachable(Method::Post, "users/7/reset_password/");
        let users = UserService::new(client::<User>(&fake).await);

        let err = users.reset_password(&RecordId::Int(7)).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(fake.calls().len(), 1);
    }
}
