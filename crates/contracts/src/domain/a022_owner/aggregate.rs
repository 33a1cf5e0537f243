use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{Payload, RawRecord};
use crate::shared::record_id::RecordId;

const STATUS: &[&str] = &["estado", "status"];
const USER: &[&str] = &["usuario", "user", "usuario_id", "user_id"];
const USER_DATA: &[&str] = &["usuario_data", "user_data"];
const CREATED_AT: &[&str] = &["created_at", "fecha_alta"];

pub const STATUS_ACTIVE: &str = "activo";
pub const STATUS_INACTIVE: &str = "inactivo";

/// Account fields the backend nests next to the user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OwnerUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl OwnerUser {
    fn from_record(raw: &RawRecord) -> Self {
        Self {
            username: raw.pick_str(&["username"], ""),
            first_name: raw.pick_str(&["first_name", "nombres"], ""),
            last_name: raw.pick_str(&["last_name", "apellidos"], ""),
            email: raw.pick_str(&["email"], ""),
        }
    }
}

/// Собственник: связь пользователя с ролью владельца
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Owner {
    pub id: Option<RecordId>,
    /// `activo` | `inactivo`
    pub status: String,
    pub user: Option<RecordId>,
    pub user_data: OwnerUser,
    pub created_at: Option<String>,
}

impl Owner {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ACTIVE)
    }

    /// Full name, else username, else the user id
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.user_data.first_name, self.user_data.last_name);
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        if !self.user_data.username.is_empty() {
            return self.user_data.username.clone();
        }
        self.user.as_ref().map(RecordId::to_string).unwrap_or_default()
    }
}

impl Resource for Owner {
    fn resource_index() -> &'static str {
        "a022"
    }

    fn collection_name() -> &'static str {
        "owners"
    }

    fn element_name() -> &'static str {
        "Propietario"
    }

    fn list_name() -> &'static str {
        "Propietarios"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["propietarios/", "owners/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        let user_data = raw.pick_nested(USER_DATA);
        let user = raw
            .pick_ref(USER)
            .map(|r| r.id)
            .or_else(|| user_data.as_ref().and_then(|d| d.pick_id(&["id", "pk", "uuid"])));
        Self {
            id: raw.pick_id(&["id", "pk"]),
            status: raw.pick_str(STATUS, STATUS_ACTIVE),
            user,
            user_data: user_data.as_ref().map(OwnerUser::from_record).unwrap_or_default(),
            created_at: raw.pick_opt_str(CREATED_AT),
        }
    }

    /// The serializer accepts `{usuario, estado}` only.
    fn to_payload(&self) -> Payload {
        Payload::new()
            .set_id("usuario", self.user.as_ref())
            .set("estado", self.status.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.user.is_none() {
            return Err("Seleccione el usuario".into());
        }
        let status = self.status.to_lowercase();
        if status != STATUS_ACTIVE && status != STATUS_INACTIVE {
            return Err(format!("Estado inválido: {}", self.status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_user_data() {
        let owner = Owner::from_record(&RawRecord::from_value(json!({
            "id": 1,
            "usuario": 14,
            "usuario_data": {"id": 14, "username": "jperez", "first_name": "Juan", "last_name": "Pérez"},
            "created_at": "2024-01-10T12:00:00Z"
        })));
        assert_eq!(owner.user, Some(RecordId::Int(14)));
        assert_eq!(owner.display_name(), "Juan Pérez");
        assert!(owner.is_active());

        let payload = owner.to_payload().into_value();
        assert_eq!(payload, json!({"usuario": 14, "estado": "activo"}));
    }

    #[test]
    fn test_user_id_from_nested_data_only() {
        let owner = Owner::from_record(&RawRecord::from_value(json!({
            "estado": "inactivo",
            "user_data": {"pk": 3, "username": "mlopez"}
        })));
        assert_eq!(owner.user, Some(RecordId::Int(3)));
        assert_eq!(owner.display_name(), "mlopez");
        assert!(!owner.is_active());
    }

    #[test]
    fn test_validate_status() {
        let owner = Owner {
            user: Some(RecordId::Int(1)),
            status: "pendiente".into(),
            ..Default::default()
        };
        assert!(owner.validate().is_err());
    }
}
