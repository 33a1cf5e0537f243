use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

// ============================================================================
// Aliases
// ============================================================================

const ID: &[&str] = &["id", "uuid", "pk"];
const NAME: &[&str] = &["nombre", "visitante", "name", "fullname"];
const DOCUMENT: &[&str] = &["documento", "doc", "dni", "document"];
const PHONE: &[&str] = &["telefono", "phone"];
const REASON: &[&str] = &["motivo", "reason", "asunto"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id", "unidad_uuid", "unit_uuid"];
const DATE: &[&str] = &["fecha", "date", "created_at"];
const CHECK_IN: &[&str] = &["hora_entrada", "checkin", "entrada", "in_time", "time_in"];
const CHECK_OUT: &[&str] = &["hora_salida", "checkout", "salida", "out_time", "time_out"];
const AUTHORIZED_BY: &[&str] = &["autorizado_por", "autorizado", "authorized_by"];
const PLATE: &[&str] = &["placa", "plate", "vehiculo"];
const STATUS: &[&str] = &["estado", "status"];

pub const STATUS_INSIDE: &str = "EN_CASA";
pub const STATUS_LEFT: &str = "SALIO";
pub const STATUS_PENDING: &str = "PENDIENTE";

/// Status implied by the check-in/check-out timestamps.
pub fn derive_status(check_in: Option<&str>, check_out: Option<&str>) -> &'static str {
    match (check_in, check_out) {
        (_, Some(_)) => STATUS_LEFT,
        (Some(_), None) => STATUS_INSIDE,
        (None, None) => STATUS_PENDING,
    }
}

/// Визит
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Visit {
    pub id: Option<RecordId>,
    pub name: String,
    pub document: String,
    pub phone: String,
    pub reason: String,
    pub unit: Option<EntityRef>,
    pub date: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub authorized_by: Option<EntityRef>,
    pub plate: String,
    pub status: String,
}

impl Visit {
    pub fn is_inside(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }
}

impl Resource for Visit {
    fn resource_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "visits"
    }

    fn element_name() -> &'static str {
        "Visita"
    }

    fn list_name() -> &'static str {
        "Visitas"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &[
            "visitas/",
            "visita/",
            "visitas-acceso/",
            "visitors/",
            "access-visits/",
        ]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        let check_in = raw.pick_opt_str(CHECK_IN);
        let check_out = raw.pick_opt_str(CHECK_OUT);
        let status = raw
            .pick_opt_str(STATUS)
            .unwrap_or_else(|| derive_status(check_in.as_deref(), check_out.as_deref()).to_string());

        Self {
            id: raw.pick_id(ID),
            name: raw.pick_str(NAME, ""),
            document: raw.pick_str(DOCUMENT, ""),
            phone: raw.pick_str(PHONE, ""),
            reason: raw.pick_str(REASON, ""),
            unit: raw.pick_ref(UNIT),
            date: raw.pick_opt_str(DATE),
            check_in,
            check_out,
            authorized_by: raw.pick_ref(AUTHORIZED_BY),
            plate: raw.pick_str(PLATE, ""),
            status,
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("nombre", self.name.as_str())
            .set("documento", self.document.as_str())
            .set("telefono", self.phone.as_str())
            .set("motivo", self.reason.as_str())
            .set_ref("unidad", self.unit.as_ref())
            .set_opt("fecha", self.date.clone())
            .set_opt("hora_entrada", self.check_in.clone())
            .set_opt("hora_salida", self.check_out.clone())
            .set_ref("autorizado_por", self.authorized_by.as_ref())
            .set("placa", self.plate.as_str())
            .set("estado", self.status.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre del visitante es obligatorio".into());
        }
        Ok(())
    }
}
