use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::common::{Resource, UpdateMethod};
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

// ============================================================================
// Aliases
// ============================================================================

const ID: &[&str] = &["id", "uuid", "pk"];
const FIRST_NAME: &[&str] = &["nombres", "first_name"];
const LAST_NAME: &[&str] = &["apellidos", "last_name"];
const PHONE: &[&str] = &["telefono", "phone"];
const ACTIVE: &[&str] = &["is_active", "activo"];
const ROLE_ID: &[&str] = &["rol_id", "role_id", "role"];
const ROLE_NAME: &[&str] = &["rol_nombre", "role_name"];

// ============================================================================
// Record
// ============================================================================

/// Пользователь системы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct User {
    pub id: Option<RecordId>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
    pub role: Option<EntityRef>,
    pub role_name: String,
    pub created_at: String,
    pub updated_at: String,
    pub bio: String,

    // Только для формы создания / смены пароля
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// First entry of a `roles: [{id, name}]` array, when the backend sends one.
fn first_role(raw: &RawRecord) -> Option<RawRecord> {
    match raw.get("roles") {
        Some(Value::Array(roles)) => roles.first().cloned().map(RawRecord::from_value),
        _ => None,
    }
}

impl Resource for User {
    fn resource_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "users"
    }

    fn element_name() -> &'static str {
        "Usuario"
    }

    fn list_name() -> &'static str {
        "Usuarios"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["users/"]
    }

    fn update_method() -> UpdateMethod {
        UpdateMethod::Patch
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        let first_role = first_role(raw);
        let role = raw.pick_ref(ROLE_ID).or_else(|| {
            first_role
                .as_ref()
                .and_then(|r| r.pick_ref(&["id"]).map(|mut role| {
                    role.label = r.pick_opt_str(&["name", "nombre"]);
                    role
                }))
        });
        let role_name = raw
            .pick_opt_str(ROLE_NAME)
            .or_else(|| role.as_ref().and_then(|r| r.label.clone()))
            .unwrap_or_default();

        Self {
            id: raw.pick_id(ID),
            username: raw.pick_str(&["username"], ""),
            email: raw.pick_str(&["email"], ""),
            first_name: raw.pick_str(FIRST_NAME, ""),
            last_name: raw.pick_str(LAST_NAME, ""),
            phone: raw.pick_str(PHONE, ""),
            is_active: raw.pick_bool(ACTIVE, true),
            role,
            role_name,
            created_at: raw.pick_str(&["created_at"], ""),
            updated_at: raw.pick_str(&["updated_at"], ""),
            bio: raw.pick_str(&["bio"], ""),
            password: None,
            password_confirm: None,
        }
    }

    /// Roles are assigned through a dedicated action, never in the body.
    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("username", self.username.as_str())
            .set("email", self.email.as_str())
            .set("first_name", self.first_name.as_str())
            .set("last_name", self.last_name.as_str())
            .set("phone", self.phone.as_str())
            .set("is_active", self.is_active)
            .set_opt("password", self.password.clone())
            .set_opt("password2", self.password_confirm.clone())
            .set("bio", self.bio.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("El usuario es obligatorio".into());
        }
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            return Err("Email inválido".into());
        }
        if self.id.is_none() && self.password.as_deref().unwrap_or("").is_empty() {
            return Err("La contraseña es obligatoria".into());
        }
        if self.password.is_some() && self.password != self.password_confirm {
            return Err("Las contraseñas no coinciden".into());
        }
        Ok(())
    }
}
