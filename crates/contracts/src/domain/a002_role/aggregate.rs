use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::common::Resource;
use crate::shared::field_adapter::{Payload, RawRecord};
use crate::shared::record_id::RecordId;

const ID: &[&str] = &["id", "uuid", "pk"];
const NAME: &[&str] = &["nombre", "name", "role_name", "title", "code"];
const DESCRIPTION: &[&str] = &["descripcion", "description"];
const PERMISSIONS: &[&str] = &["permissions", "permisos"];

/// Роль
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Role {
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub permissions: Vec<RecordId>,
}

impl Resource for Role {
    fn resource_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "roles"
    }

    fn element_name() -> &'static str {
        "Rol"
    }

    fn list_name() -> &'static str {
        "Roles"
    }

    /// Older deployments exposed Django groups instead of roles.
    fn candidate_paths() -> &'static [&'static str] {
        &["roles/", "groups/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(ID),
            name: raw.pick_str(NAME, ""),
            description: raw.pick_str(DESCRIPTION, ""),
            permissions: raw.pick_id_list(PERMISSIONS),
        }
    }

    fn to_payload(&self) -> Payload {
        let permissions: Vec<Value> = self.permissions.iter().map(RecordId::to_value).collect();
        Payload::new()
            .set("nombre", self.name.as_str())
            .set("descripcion", self.description.as_str())
            .set("permissions", permissions)
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre del rol es obligatorio".into());
        }
        Ok(())
    }
}
