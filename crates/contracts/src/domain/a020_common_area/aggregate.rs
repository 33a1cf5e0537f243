use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{Payload, RawRecord};
use crate::shared::record_id::RecordId;

const NAME: &[&str] = &["nombre", "name"];
const DESCRIPTION: &[&str] = &["descripcion", "description"];
const KIND: &[&str] = &["tipo", "type", "category", "categoria"];
const LOCATION: &[&str] = &["ubicacion", "location"];
const CAPACITY: &[&str] = &["aforo", "capacity"];
const ACTIVE: &[&str] = &["activo", "is_active", "status"];
const BOOKABLE: &[&str] = &["requiere_reserva", "requires_booking", "bookable"];
const FEE: &[&str] = &["costo", "precio", "tarifa", "fee", "price", "rate"];
const OPENS_AT: &[&str] = &["horario_inicio", "hora_inicio", "start_time", "open_from"];
const CLOSES_AT: &[&str] = &["horario_fin", "hora_fin", "end_time", "open_to"];
const RULES: &[&str] = &["reglas", "rules", "politicas", "policies"];
const COLOR: &[&str] = &["color"];

/// Общая зона с бронированием (бассейн, салон, BBQ)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommonArea {
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub location: String,
    pub capacity: Option<i64>,
    pub active: bool,
    pub requires_booking: bool,
    pub fee: Option<f64>,
    /// `HH:mm`
    pub opens_at: Option<String>,
    pub closes_at: Option<String>,
    pub rules: String,
    pub color: Option<String>,
}

impl Resource for CommonArea {
    fn resource_index() -> &'static str {
        "a020"
    }

    fn collection_name() -> &'static str {
        "common_areas"
    }

    fn element_name() -> &'static str {
        "Área común"
    }

    fn list_name() -> &'static str {
        "Áreas comunes"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["areas-comunes/", "areas/", "amenities/", "common-areas/"]
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
            location: raw.pick_str(LOCATION, ""),
            capacity: raw.pick_opt_i64(CAPACITY),
            active: raw.pick_bool(ACTIVE, true),
            requires_booking: raw.pick_bool(BOOKABLE, false),
            fee: raw.pick_opt_f64(FEE),
            opens_at: raw.pick_opt_str(OPENS_AT),
            closes_at: raw.pick_opt_str(CLOSES_AT),
            rules: raw.pick_str(RULES, ""),
            color: raw.pick_opt_str(COLOR),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("nombre", self.name.as_str())
            .set("descripcion", self.description.as_str())
            .set("tipo", self.kind.as_str())
            .set("ubicacion", self.location.as_str())
            .set_opt("aforo", self.capacity)
            .set("activo", self.active)
            .set("requiere_reserva", self.requires_booking)
            .set_opt("costo", self.fee)
            .set_opt("horario_inicio", self.opens_at.clone())
            .set_opt("horario_fin", self.closes_at.clone())
            .set("reglas", self.rules.as_str())
            .set_opt("color", self.color.clone())
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre del área es obligatorio".into());
        }
        if self.capacity.is_some_and(|c| c < 0) {
            return Err("El aforo no puede ser negativo".into());
        }
        if self.fee.is_some_and(|f| f < 0.0) {
            return Err("La tarifa no puede ser negativa".into());
        }
        // `HH:mm` compares correctly as text
        if let (Some(open), Some(close)) = (&self.opens_at, &self.closes_at) {
            if close <= open {
                return Err("El horario de cierre debe ser posterior a la apertura".into());
            }
        }
        Ok(())
    }
}
