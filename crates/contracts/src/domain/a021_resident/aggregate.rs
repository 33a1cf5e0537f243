use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

pub(crate) const FIRST_NAME: &[&str] = &["nombre", "first_name", "nombres"];
pub(crate) const LAST_NAME: &[&str] = &["apellido", "last_name", "apellidos"];
pub(crate) const DOCUMENT: &[&str] = &["dni", "documento", "document", "identidad", "ci"];
pub(crate) const PHONE: &[&str] = &["telefono", "phone"];
pub(crate) const EMAIL: &[&str] = &["email"];
pub(crate) const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unidad_uuid", "unit_id", "unit_uuid"];
pub(crate) const ACTIVE: &[&str] = &["activo", "is_active"];
const RELATIONSHIP: &[&str] = &["parentesco", "relationship", "relacion"];
const BIRTH_DATE: &[&str] = &["fecha_nac", "fecha_nacimiento", "birth_date"];

/// Член семьи, проживающий в квартире
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Resident {
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub phone: String,
    pub email: String,
    pub relationship: String,
    pub birth_date: Option<String>,
    pub unit: Option<EntityRef>,
    pub active: bool,
}

impl Resident {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Resource for Resident {
    fn resource_index() -> &'static str {
        "a021"
    }

    fn collection_name() -> &'static str {
        "residents"
    }

    fn element_name() -> &'static str {
        "Residente"
    }

    fn list_name() -> &'static str {
        "Residentes"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["familia/", "residentes/", "residents/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "pk"]),
            first_name: raw.pick_str(FIRST_NAME, ""),
            last_name: raw.pick_str(LAST_NAME, ""),
            document: raw.pick_str(DOCUMENT, ""),
            phone: raw.pick_str(PHONE, ""),
            email: raw.pick_str(EMAIL, ""),
            relationship: raw.pick_str(RELATIONSHIP, ""),
            birth_date: raw.pick_opt_str(BIRTH_DATE),
            unit: raw.pick_ref(UNIT),
            active: raw.pick_bool(ACTIVE, true),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("nombre", self.first_name.as_str())
            .set("apellido", self.last_name.as_str())
            .set("dni", self.document.as_str())
            .set("telefono", self.phone.as_str())
            .set("email", self.email.as_str())
            .set("parentesco", self.relationship.as_str())
            .set_opt("fecha_nac", self.birth_date.clone())
            .set_ref("unidad", self.unit.as_ref())
            .set("activo", self.active)
    }

    fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("El nombre es obligatorio".into());
        }
        if self.unit.is_none() {
            return Err("Seleccione la unidad".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_family_member_shape() {
        let resident = Resident::from_record(&RawRecord::from_value(json!({
            "pk": 8,
            "first_name": "Sofía",
            "apellidos": "Vargas",
            "identidad": "998877",
            "relacion": "Hija",
            "fecha_nacimiento": "2010-02-14",
            "unit_uuid": "a1b2"
        })));
        assert_eq!(resident.full_name(), "Sofía Vargas");
        assert_eq!(resident.document, "998877");
        assert_eq!(resident.relationship, "Hija");
        assert_eq!(resident.unit.map(|u| u.id), Some(RecordId::Text("a1b2".into())));
        assert!(resident.active);
    }

    #[test]
    fn test_validate_requires_unit() {
        let resident = Resident {
            first_name: "Ana".into(),
            ..Default::default()
        };
        assert!(resident.validate().is_err());
    }
}
