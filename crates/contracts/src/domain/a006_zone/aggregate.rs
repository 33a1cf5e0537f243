use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{Payload, RawRecord};
use crate::shared::record_id::RecordId;

const NAME: &[&str] = &["nombre", "name", "titulo"];
const DESCRIPTION: &[&str] = &["descripcion", "description", "detalle"];
const KIND: &[&str] = &["tipo", "type", "categoria"];
const CAPACITY: &[&str] = &["aforo", "capacity", "cupo"];
const ACTIVE: &[&str] = &["activo", "is_active", "status"];
const LOCATION: &[&str] = &["ubicacion", "location", "bloque", "torre", "edificio"];
const OPENS_AT: &[&str] = &["horario_inicio", "hora_inicio", "open_from", "start_time"];
const CLOSES_AT: &[&str] = &["horario_fin", "hora_fin", "open_to", "end_time"];
const COLOR: &[&str] = &["color", "hex"];

/// Зона / общая площадь
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Zone {
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub capacity: Option<i64>,
    pub active: bool,
    pub location: String,
    /// `HH:mm`
    pub opens_at: Option<String>,
    pub closes_at: Option<String>,
    pub color: Option<String>,
}

impl Resource for Zone {
    fn resource_index() -> &'static str {
        "a006"
    }

    fn collection_name() -> &'static str {
        "zones"
    }

    fn element_name() -> &'static str {
        "Zona"
    }

    fn list_name() -> &'static str {
        "Zonas"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["zonas/", "zona/", "areas-comunes/", "areas/", "zones/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            name: raw.pick_str(NAME, ""),
            description: raw.pick_str(DESCRIPTION, ""),
            kind: raw.pick_str(KIND, ""),
            capacity: raw.pick_opt_i64(CAPACITY),
            active: raw.pick_bool(ACTIVE, true),
            location: raw.pick_str(LOCATION, ""),
            opens_at: raw.pick_opt_str(OPENS_AT),
            closes_at: raw.pick_opt_str(CLOSES_AT),
            color: raw.pick_opt_str(COLOR),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("nombre", self.name.as_str())
            .set("descripcion", self.description.as_str())
            .set("tipo", self.kind.as_str())
            .set_opt("aforo", self.capacity)
            .set("activo", self.active)
            .set("ubicacion", self.location.as_str())
            .set_opt("horario_inicio", self.opens_at.clone())
            .set_opt("horario_fin", self.closes_at.clone())
            .set_opt("color", self.color.clone())
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre de la zona es obligatorio".into());
        }
        if let Some(capacity) = self.capacity {
            if capacity < 0 {
                return Err("El aforo no puede ser negativo".into());
            }
        }
        Ok(())
    }
}
