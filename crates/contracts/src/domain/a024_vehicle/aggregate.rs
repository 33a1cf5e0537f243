use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

const PLATE: &[&str] = &["placa", "plate", "matricula"];
const MAKE: &[&str] = &["marca", "make", "brand"];
const MODEL: &[&str] = &["modelo", "model"];
const COLOR: &[&str] = &["color"];
const STATUS: &[&str] = &["estado", "status"];
const UNIT: &[&str] = &["unidad_habitacional", "unidad", "unit", "unidad_id", "unit_id"];

/// Plates are stored uppercase without surrounding or inner spaces.
pub fn normalize_plate(plate: &str) -> String {
    plate.split_whitespace().collect::<String>().to_uppercase()
}

/// Автомобиль жильца
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Vehicle {
    pub id: Option<RecordId>,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub status: String,
    pub unit: Option<EntityRef>,
}

impl Resource for Vehicle {
    fn resource_index() -> &'static str {
        "a024"
    }

    fn collection_name() -> &'static str {
        "vehicles"
    }

    fn element_name() -> &'static str {
        "Vehículo"
    }

    fn list_name() -> &'static str {
        "Vehículos"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["vehiculos/", "vehicles/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            plate: raw.pick_str(PLATE, ""),
            make: raw.pick_str(MAKE, ""),
            model: raw.pick_str(MODEL, ""),
            color: raw.pick_str(COLOR, ""),
            status: raw.pick_str(STATUS, ""),
            unit: raw.pick_ref(UNIT),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("placa", normalize_plate(&self.plate))
            .set("marca", self.make.as_str())
            .set("modelo", self.model.as_str())
            .set("color", self.color.as_str())
            .set("estado", self.status.as_str())
            .set_ref("unidad_habitacional", self.unit.as_ref())
    }

    fn validate(&self) -> Result<(), String> {
        if normalize_plate(&self.plate).is_empty() {
            return Err("La placa es obligatoria".into());
        }
        if self.make.trim().is_empty() {
            return Err("La marca es obligatoria".into());
        }
        if self.unit.is_none() {
            return Err("Seleccione la unidad habitacional".into());
        }
        Ok(())
    }
}
