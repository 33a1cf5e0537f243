use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

const NAME: &[&str] = &["nombre", "name"];
const DESCRIPTION: &[&str] = &["descripcion", "description"];
const KIND: &[&str] = &["tipo", "type"];
const VENDOR: &[&str] = &["proveedor", "vendor", "proveedor_id", "vendor_id"];
const COST: &[&str] = &["costo", "cost", "price"];
const CURRENCY: &[&str] = &["moneda", "currency"];
const FREQUENCY: &[&str] = &["periodicidad", "frequency"];
const START_DATE: &[&str] = &["fecha_inicio", "start_date"];
const END_DATE: &[&str] = &["fecha_fin", "end_date"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id"];
const AREA: &[&str] = &["area", "area_id", "amenity"];
const ACTIVE: &[&str] = &["activo", "is_active", "estado"];
const NOTES: &[&str] = &["notas", "notes"];

/// MANTENIMIENTO | LIMPIEZA | SEGURIDAD | OTRO
pub const DEFAULT_KIND: &str = "MANTENIMIENTO";
/// MENSUAL | ANUAL | USO
pub const DEFAULT_FREQUENCY: &str = "MENSUAL";
pub const DEFAULT_CURRENCY: &str = "BOB";

/// Контрактная услуга (уборка, охрана, обслуживание)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Service {
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub vendor: Option<EntityRef>,
    pub cost: f64,
    pub currency: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
    pub unit: Option<EntityRef>,
    pub area: Option<EntityRef>,
    pub active: bool,
    pub notes: String,
}

impl Resource for Service {
    fn resource_index() -> &'static str {
        "a018"
    }

    fn collection_name() -> &'static str {
        "services"
    }

    fn element_name() -> &'static str {
        "Servicio"
    }

    fn list_name() -> &'static str {
        "Servicios"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["servicios/", "services/", "mantenimiento/servicios/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            name: raw.pick_str(NAME, ""),
            description: raw.pick_str(DESCRIPTION, ""),
            kind: raw.pick_str(KIND, DEFAULT_KIND),
            vendor: raw.pick_ref(VENDOR),
            cost: raw.pick_f64(COST, 0.0),
            currency: raw.pick_str(CURRENCY, DEFAULT_CURRENCY),
            frequency: raw.pick_str(FREQUENCY, DEFAULT_FREQUENCY),
            start_date: raw.pick_str(START_DATE, ""),
            end_date: raw.pick_str(END_DATE, ""),
            unit: raw.pick_ref(UNIT),
            area: raw.pick_ref(AREA),
            active: raw.pick_bool(ACTIVE, true),
            notes: raw.pick_str(NOTES, ""),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("nombre", self.name.as_str())
            .set("descripcion", self.description.as_str())
            .set("tipo", self.kind.as_str())
            .set_ref("proveedor", self.vendor.as_ref())
            .set("costo", self.cost)
            .set("moneda", self.currency.as_str())
            .set("periodicidad", self.frequency.as_str())
            .set("start_date", self.start_date.as_str())
            .set("end_date", self.end_date.as_str())
            .set_ref("unidad", self.unit.as_ref())
            .set_ref("area", self.area.as_ref())
            .set("is_active", self.active)
            .set("notas", self.notes.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre del servicio es obligatorio".into());
        }
        if self.cost < 0.0 {
            return Err("El costo no puede ser negativo".into());
        }
        // Both dates are ISO `YYYY-MM-DD`, so text order is date order.
        if !self.start_date.is_empty() && !self.end_date.is_empty() && self.end_date < self.start_date {
            return Err("La fecha fin es anterior a la fecha inicio".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let service = Service::from_record(&RawRecord::from_value(json!({
            "name": "Limpieza piscina",
            "price": 450,
            "vendor": {"id": 3, "nombre": "AquaClean"}
        })));
        assert_eq!(service.kind, DEFAULT_KIND);
        assert_eq!(service.frequency, DEFAULT_FREQUENCY);
        assert_eq!(service.currency, DEFAULT_CURRENCY);
        assert_eq!(service.cost, 450.0);
        assert_eq!(service.vendor.map(|v| v.display()).as_deref(), Some("AquaClean"));
        assert!(service.active);
    }

    #[test]
    fn test_validate_date_order() {
        let service = Service {
            name: "Jardinería".into(),
            start_date: "2024-05-01".into(),
            end_date: "2024-04-30".into(),
            ..Default::default()
        };
        assert!(service.validate().is_err());
    }
}
