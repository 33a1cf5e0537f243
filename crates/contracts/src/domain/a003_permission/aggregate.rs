use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{Payload, RawRecord};
use crate::shared::record_id::RecordId;

/// Право доступа (Django permission)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Permission {
    pub id: Option<RecordId>,
    pub name: String,
    pub codename: String,
    pub app_label: String,
    pub model: String,
}

impl Resource for Permission {
    fn resource_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "permissions"
    }

    fn element_name() -> &'static str {
        "Permiso"
    }

    fn list_name() -> &'static str {
        "Permisos"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["permissions/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            name: raw.pick_str(&["name", "nombre"], ""),
            codename: raw.pick_str(&["codename", "codigo"], ""),
            app_label: raw.pick_str(&["app_label", "app"], ""),
            model: raw.pick_str(&["model", "modelo"], ""),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("name", self.name.as_str())
            .set("codename", self.codename.as_str())
            .set("app_label", self.app_label.as_str())
            .set("model", self.model.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.codename.trim().is_empty() {
            return Err("Nombre y codename son obligatorios".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_record_spanish_keys() {
        let raw = RawRecord::from_value(json!({"id": 5, "nombre": "Ver multas", "codigo": "view_fine"}));
        let perm = Permission::from_record(&raw);
        assert_eq!(perm.name, "Ver multas");
        assert_eq!(perm.codename, "view_fine");
        assert!(perm.validate().is_ok());
    }
}
