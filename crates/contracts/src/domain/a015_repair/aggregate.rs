use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::money::round2;
use crate::shared::record_id::RecordId;

// ============================================================================
// Aliases
// ============================================================================

const CODE: &[&str] = &["codigo", "code", "numero", "wo"];
const TITLE: &[&str] = &["titulo", "title"];
const DESCRIPTION: &[&str] = &["descripcion", "description"];
const CATEGORY: &[&str] = &["categoria", "category"];
const STATUS: &[&str] = &["estado", "status"];
const VENDOR: &[&str] = &["proveedor", "vendor", "proveedor_id", "vendor_id"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id"];
const AREA: &[&str] = &["area", "area_id", "amenity"];
const INCIDENT: &[&str] = &["incidente", "incidente_id", "incident"];
const DATE: &[&str] = &["fecha", "date", "created_at"];
const CLOSED_AT: &[&str] = &["fecha_cierre", "closed_at"];
const MATERIALS: &[&str] = &["costo_materiales", "materials"];
const LABOR: &[&str] = &["costo_mano_obra", "labor"];
const OTHERS: &[&str] = &["costo_otros", "others"];
const TAX: &[&str] = &["impuesto", "tax"];
const TOTAL: &[&str] = &["total", "amount_total"];
const CURRENCY: &[&str] = &["moneda", "currency"];
const ATTACHMENT: &[&str] = &["adjunto_url", "attachment", "file"];
const NOTES: &[&str] = &["notas", "notes"];

pub const DEFAULT_CURRENCY: &str = "BOB";

/// Статус ремонта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairStatus {
    Pending,
    InProgress,
    Completed,
    Voided,
}

impl RepairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStatus::Pending => "PENDIENTE",
            RepairStatus::InProgress => "EN_PROCESO",
            RepairStatus::Completed => "COMPLETADO",
            RepairStatus::Voided => "ANULADO",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PENDIENTE" => Some(RepairStatus::Pending),
            "EN_PROCESO" => Some(RepairStatus::InProgress),
            "COMPLETADO" => Some(RepairStatus::Completed),
            "ANULADO" => Some(RepairStatus::Voided),
            _ => None,
        }
    }
}

/// Ремонт / наряд на работы
///
/// `tax` is an amount, not a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Repair {
    pub id: Option<RecordId>,
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub vendor: Option<EntityRef>,
    pub unit: Option<EntityRef>,
    pub area: Option<EntityRef>,
    pub incident: Option<EntityRef>,
    pub date: String,
    pub closed_at: String,
    pub materials_cost: f64,
    pub labor_cost: f64,
    pub other_costs: f64,
    pub tax: f64,
    pub total: f64,
    pub currency: String,
    pub attachment_url: String,
    pub notes: String,
}

impl Repair {
    pub fn status(&self) -> Option<RepairStatus> {
        RepairStatus::parse(&self.status)
    }

    /// Materials + labor + other costs + tax
    pub fn cost_sum(&self) -> f64 {
        round2(self.materials_cost + self.labor_cost + self.other_costs + self.tax)
    }
}

impl Resource for Repair {
    fn resource_index() -> &'static str {
        "a015"
    }

    fn collection_name() -> &'static str {
        "repairs"
    }

    fn element_name() -> &'static str {
        "Reparación"
    }

    fn list_name() -> &'static str {
        "Reparaciones"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["reparaciones/", "repairs/", "ordenes-reparacion/", "work-orders/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        let mut repair = Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            code: raw.pick_str(CODE, ""),
            title: raw.pick_str(TITLE, ""),
            description: raw.pick_str(DESCRIPTION, ""),
            category: raw.pick_str(CATEGORY, ""),
            status: raw.pick_str(STATUS, RepairStatus::Pending.as_str()),
            vendor: raw.pick_ref(VENDOR),
            unit: raw.pick_ref(UNIT),
            area: raw.pick_ref(AREA),
            incident: raw.pick_ref(INCIDENT),
            date: raw.pick_str(DATE, ""),
            closed_at: raw.pick_str(CLOSED_AT, ""),
            materials_cost: raw.pick_f64(MATERIALS, 0.0),
            labor_cost: raw.pick_f64(LABOR, 0.0),
            other_costs: raw.pick_f64(OTHERS, 0.0),
            tax: raw.pick_f64(TAX, 0.0),
            total: 0.0,
            currency: raw.pick_str(CURRENCY, DEFAULT_CURRENCY),
            attachment_url: raw.pick_str(ATTACHMENT, ""),
            notes: raw.pick_str(NOTES, ""),
        };
        repair.total = raw.pick_opt_f64(TOTAL).unwrap_or_else(|| repair.cost_sum());
        repair
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("codigo", self.code.as_str())
            .set("titulo", self.title.as_str())
            .set("descripcion", self.description.as_str())
            .set("categoria", self.category.as_str())
            .set("estado", self.status.as_str())
            .set_ref("proveedor", self.vendor.as_ref())
            .set_ref("unidad", self.unit.as_ref())
            .set_ref("area", self.area.as_ref())
            .set_ref("incidente", self.incident.as_ref())
            .set("fecha", self.date.as_str())
            .set("fecha_cierre", self.closed_at.as_str())
            .set("costo_materiales", self.materials_cost)
            .set("costo_mano_obra", self.labor_cost)
            .set("costo_otros", self.other_costs)
            .set("impuesto", self.tax)
            .set("total", self.total)
            .set("moneda", self.currency.as_str())
            .set("adjunto_url", self.attachment_url.as_str())
            .set("notas", self.notes.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("El título de la reparación es obligatorio".into());
        }
        let costs = [self.materials_cost, self.labor_cost, self.other_costs, self.tax];
        if costs.iter().any(|c| *c < 0.0) {
            return Err("Los costos no pueden ser negativos".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_work_order_shape() {
        let repair = Repair::from_record(&RawRecord::from_value(json!({
            "pk": 5,
            "wo": "WO-005",
            "title": "Bomba de agua",
            "vendor_id": 9,
            "incident": {"id": 12, "titulo": "Fuga"},
            "materials": "120.50",
            "labor": 80,
            "tax": 26.1,
            "amount_total": 226.6
        })));
        assert_eq!(repair.code, "WO-005");
        assert_eq!(repair.status(), Some(RepairStatus::Pending));
        assert_eq!(repair.vendor.map(|v| v.id), Some(RecordId::Int(9)));
        assert_eq!(repair.incident.map(|i| i.id), Some(RecordId::Int(12)));
        assert_eq!(repair.materials_cost, 120.5);
        assert_eq!(repair.total, 226.6);
        assert_eq!(repair.currency, DEFAULT_CURRENCY);
    }

    #[test]
    fn test_missing_total_is_cost_sum() {
        let repair = Repair::from_record(&RawRecord::from_value(json!({
            "costo_materiales": 10.1,
            "costo_mano_obra": 20.2,
            "impuesto": 3.3
        })));
        assert_eq!(repair.total, 33.6);
    }

    #[test]
    fn test_validate_rejects_negative_cost() {
        let repair = Repair {
            title: "Portón".into(),
            labor_cost: -1.0,
            ..Default::default()
        };
        assert!(repair.validate().is_err());
    }
}
