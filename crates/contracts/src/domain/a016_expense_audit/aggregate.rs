use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::money::round2;
use crate::shared::record_id::RecordId;

const DATE: &[&str] = &["fecha", "date", "created_at"];
const CATEGORY: &[&str] = &["categoria", "category"];
const SUBCATEGORY: &[&str] = &["subcategoria", "subcategory"];
const VENDOR: &[&str] = &["proveedor", "vendor", "proveedor_id", "vendor_id"];
const DESCRIPTION: &[&str] = &["descripcion", "description", "detalle"];
const CURRENCY: &[&str] = &["moneda", "currency"];
const BASE: &[&str] = &["base", "neto", "amount"];
const TAX: &[&str] = &["impuesto", "tax"];
const OTHERS: &[&str] = &["otros", "other_costs"];
const TOTAL: &[&str] = &["total", "amount_total"];
const INVOICE: &[&str] = &["factura_id", "invoice_id"];
const INVOICE_NUMBER: &[&str] = &["factura_numero", "invoice_number"];
const REPAIR: &[&str] = &["reparacion_id", "repair_id"];
const AREA: &[&str] = &["area", "area_id", "amenity"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id"];
const STATUS: &[&str] = &["estado", "status"];
const REMARK: &[&str] = &["observacion", "notes"];

pub const DEFAULT_CURRENCY: &str = "BOB";

/// Состояние сверки расхода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseStatus {
    Registered,
    Reconciled,
    Flagged,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Registered => "REGISTRADO",
            ExpenseStatus::Reconciled => "CONCILIADO",
            ExpenseStatus::Flagged => "OBSERVADO",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "REGISTRADO" => Some(ExpenseStatus::Registered),
            "CONCILIADO" => Some(ExpenseStatus::Reconciled),
            "OBSERVADO" => Some(ExpenseStatus::Flagged),
            _ => None,
        }
    }
}

/// Расход в журнале аудита
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExpenseAudit {
    pub id: Option<RecordId>,
    pub date: String,
    pub category: String,
    pub subcategory: String,
    pub vendor: Option<EntityRef>,
    pub description: String,
    pub currency: String,
    pub base: f64,
    /// Amount, not a percentage
    pub tax: f64,
    pub other_costs: f64,
    pub total: f64,
    pub invoice: Option<RecordId>,
    pub invoice_number: String,
    pub repair: Option<RecordId>,
    pub area: Option<EntityRef>,
    pub unit: Option<EntityRef>,
    pub status: String,
    pub remark: String,
}

impl ExpenseAudit {
    pub fn status(&self) -> Option<ExpenseStatus> {
        ExpenseStatus::parse(&self.status)
    }
}

impl Resource for ExpenseAudit {
    fn resource_index() -> &'static str {
        "a016"
    }

    fn collection_name() -> &'static str {
        "expense_audits"
    }

    fn element_name() -> &'static str {
        "Gasto"
    }

    fn list_name() -> &'static str {
        "Auditoría de gastos"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["auditoria-gastos/", "auditoria/egresos/", "gastos/auditoria/", "expenses/audit/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        let base = raw.pick_f64(BASE, 0.0);
        let tax = raw.pick_f64(TAX, 0.0);
        let other_costs = raw.pick_f64(OTHERS, 0.0);
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            date: raw.pick_str(DATE, ""),
            category: raw.pick_str(CATEGORY, ""),
            subcategory: raw.pick_str(SUBCATEGORY, ""),
            vendor: raw.pick_ref(VENDOR),
            description: raw.pick_str(DESCRIPTION, ""),
            currency: raw.pick_str(CURRENCY, DEFAULT_CURRENCY),
            base,
            tax,
            other_costs,
            total: raw
                .pick_opt_f64(TOTAL)
                .unwrap_or_else(|| round2(base + tax + other_costs)),
            invoice: raw.pick_id(INVOICE),
            invoice_number: raw.pick_str(INVOICE_NUMBER, ""),
            repair: raw.pick_id(REPAIR),
            area: raw.pick_ref(AREA),
            unit: raw.pick_ref(UNIT),
            status: raw.pick_str(STATUS, ExpenseStatus::Registered.as_str()),
            remark: raw.pick_str(REMARK, ""),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("fecha", self.date.as_str())
            .set("categoria", self.category.as_str())
            .set("subcategoria", self.subcategory.as_str())
            .set_ref("proveedor", self.vendor.as_ref())
            .set("descripcion", self.description.as_str())
            .set("moneda", self.currency.as_str())
            .set("base", self.base)
            .set("impuesto", self.tax)
            .set("otros", self.other_costs)
            .set("total", self.total)
            .set_id("factura_id", self.invoice.as_ref())
            .set("factura_numero", self.invoice_number.as_str())
            .set_id("reparacion_id", self.repair.as_ref())
            .set_ref("area", self.area.as_ref())
            .set_ref("unidad", self.unit.as_ref())
            .set("estado", self.status.as_str())
            .set("observacion", self.remark.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.date.trim().is_empty() {
            return Err("La fecha del gasto es obligatoria".into());
        }
        if self.category.trim().is_empty() {
            return Err("La categoría es obligatoria".into());
        }
        if self.base < 0.0 || self.tax < 0.0 || self.other_costs < 0.0 {
            return Err("Los montos no pueden ser negativos".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_defaults_to_sum_of_parts() {
        let expense = ExpenseAudit::from_record(&RawRecord::from_value(json!({
            "date": "2024-04-02",
            "category": "Mantenimiento",
            "neto": "100",
            "tax": 13,
            "other_costs": 2.5,
            "invoice_id": 31,
            "repair_id": 5
        })));
        assert_eq!(expense.total, 115.5);
        assert_eq!(expense.invoice, Some(RecordId::Int(31)));
        assert_eq!(expense.repair, Some(RecordId::Int(5)));
        assert_eq!(expense.status(), Some(ExpenseStatus::Registered));
        assert_eq!(expense.currency, "BOB");
    }

    #[test]
    fn test_backend_total_wins() {
        let expense = ExpenseAudit::from_record(&RawRecord::from_value(json!({
            "base": 100, "impuesto": 13, "total": 120
        })));
        assert_eq!(expense.total, 120.0);
    }

    #[test]
    fn test_validate() {
        let mut expense = ExpenseAudit {
            date: "2024-04-02".into(),
            category: "Limpieza".into(),
            ..Default::default()
        };
        assert!(expense.validate().is_ok());
        expense.base = -5.0;
        assert!(expense.validate().is_err());
    }
}
