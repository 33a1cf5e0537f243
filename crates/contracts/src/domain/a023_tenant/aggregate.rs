use serde::{Deserialize, Serialize};

use crate::domain::a021_resident::aggregate::{ACTIVE, DOCUMENT, EMAIL, FIRST_NAME, LAST_NAME, PHONE, UNIT};
use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

const LEASE_START: &[&str] = &["fecha_inicio", "start_date", "fecha_alta"];
const LEASE_END: &[&str] = &["fecha_fin", "end_date", "fecha_baja"];

/// Арендатор
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Tenant {
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub phone: String,
    pub email: String,
    pub unit: Option<EntityRef>,
    pub active: bool,
    pub lease_start: Option<String>,
    pub lease_end: Option<String>,
}

impl Resource for Tenant {
    fn resource_index() -> &'static str {
        "a023"
    }

    fn collection_name() -> &'static str {
        "tenants"
    }

    fn element_name() -> &'static str {
        "Inquilino"
    }

    fn list_name() -> &'static str {
        "Inquilinos"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["inquilinos/", "tenants/"]
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
            unit: raw.pick_ref(UNIT),
            active: raw.pick_bool(ACTIVE, true),
            lease_start: raw.pick_opt_str(LEASE_START),
            lease_end: raw.pick_opt_str(LEASE_END),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("nombre", self.first_name.as_str())
            .set("apellido", self.last_name.as_str())
            .set("dni", self.document.as_str())
            .set("telefono", self.phone.as_str())
            .set("email", self.email.as_str())
            .set_ref("unidad", self.unit.as_ref())
            .set("activo", self.active)
            .set_opt("fecha_inicio", self.lease_start.clone())
            .set_opt("fecha_fin", self.lease_end.clone())
    }

    fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("El nombre es obligatorio".into());
        }
        if self.unit.is_none() {
            return Err("Seleccione la unidad".into());
        }
        if let (Some(start), Some(end)) = (&self.lease_start, &self.lease_end) {
            if end < start {
                return Err("El fin del contrato es anterior al inicio".into());
            }
        }
        Ok(())
    }
}
