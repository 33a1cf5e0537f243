use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::money::{round2, InvoiceTotals, LineItem};
use crate::shared::record_id::RecordId;

// ============================================================================
// Aliases
// ============================================================================

const ID: &[&str] = &["id", "uuid", "pk"];
const NUMBER: &[&str] = &["numero", "code", "serial"];
const CUSTOMER: &[&str] = &["cliente_id", "customer_id", "persona_id"];
const CUSTOMER_NAME: &[&str] = &["cliente_nombre", "customer_name", "persona"];
const CUSTOMER_TYPE: &[&str] = &["cliente_tipo", "customer_type", "tipo"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id"];
const ISSUE_DATE: &[&str] = &["fecha_emision", "issue_date", "fecha"];
const DUE_DATE: &[&str] = &["fecha_vencimiento", "due_date"];
const STATUS: &[&str] = &["estado", "status"];
const CURRENCY: &[&str] = &["moneda", "currency"];
const LINES: &[&str] = &["items", "detalle"];
const SUBTOTAL: &[&str] = &["subtotal", "amount_subtotal"];
const TAX: &[&str] = &["impuesto", "tax", "iva"];
const DISCOUNT: &[&str] = &["descuento", "discount"];
const TOTAL: &[&str] = &["total", "amount_total"];
const NOTES: &[&str] = &["notas", "notes"];

const LINE_DESCRIPTION: &[&str] = &["descripcion", "description"];
const LINE_QUANTITY: &[&str] = &["cantidad", "qty"];
const LINE_PRICE: &[&str] = &["precio", "unit_price"];
const LINE_TOTAL: &[&str] = &["total", "subtotal"];

pub const DEFAULT_CUSTOMER_TYPE: &str = "RESIDENTE";
pub const DEFAULT_STATUS: &str = "PENDIENTE";
pub const DEFAULT_CURRENCY: &str = "BOB";

// ============================================================================
// Lines
// ============================================================================

/// Строка счета в том виде, в котором ее прислал бэкенд
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

impl InvoiceLine {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        let item = LineItem::new(description, quantity, unit_price);
        Self {
            total: item.line_total(),
            description: item.description,
            quantity,
            unit_price,
        }
    }

    /// A missing line total is recomputed from quantity and price.
    fn from_record(raw: &RawRecord) -> Self {
        let quantity = raw.pick_f64(LINE_QUANTITY, 1.0);
        let unit_price = raw.pick_f64(LINE_PRICE, 0.0);
        Self {
            description: raw.pick_str(LINE_DESCRIPTION, ""),
            quantity,
            unit_price,
            total: raw.pick_f64(LINE_TOTAL, quantity * unit_price),
        }
    }

    fn to_value(&self) -> Value {
        Payload::new()
            .set("descripcion", self.description.as_str())
            .set("cantidad", self.quantity)
            .set("precio", self.unit_price)
            .set("total", round2(self.total))
            .into_value()
    }

    pub fn as_item(&self) -> LineItem {
        LineItem::new(self.description.clone(), self.quantity, self.unit_price)
    }
}

// ============================================================================
// Invoice
// ============================================================================

/// Счет (factura)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Invoice {
    pub id: Option<RecordId>,
    pub number: String,
    pub customer: Option<EntityRef>,
    pub customer_name: String,
    pub customer_type: String,
    pub unit: Option<EntityRef>,
    pub issue_date: String,
    pub due_date: String,
    pub status: String,
    pub currency: String,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
    pub notes: String,
}

impl Invoice {
    /// Recompute amounts from the lines. Called by the invoice form before
    /// submitting.
    pub fn apply_totals(&mut self, tax_percent: f64, discount: f64) -> InvoiceTotals {
        for line in &mut self.lines {
            line.total = line.as_item().line_total();
        }
        let items: Vec<LineItem> = self.lines.iter().map(InvoiceLine::as_item).collect();
        let totals = InvoiceTotals::compute(&items, tax_percent, discount);
        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.discount = totals.discount;
        self.total = totals.grand_total;
        totals
    }
}

impl Resource for Invoice {
    fn resource_index() -> &'static str {
        "a007"
    }

    fn collection_name() -> &'static str {
        "invoices"
    }

    fn element_name() -> &'static str {
        "Factura"
    }

    fn list_name() -> &'static str {
        "Facturas"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["facturas/", "invoices/", "comprobantes/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(ID),
            number: raw.pick_str(NUMBER, ""),
            customer: raw.pick_ref(CUSTOMER),
            customer_name: raw.pick_str(CUSTOMER_NAME, ""),
            customer_type: raw.pick_str(CUSTOMER_TYPE, DEFAULT_CUSTOMER_TYPE),
            unit: raw.pick_ref(UNIT),
            issue_date: raw.pick_str(ISSUE_DATE, ""),
            due_date: raw.pick_str(DUE_DATE, ""),
            status: raw.pick_str(STATUS, DEFAULT_STATUS),
            currency: raw.pick_str(CURRENCY, DEFAULT_CURRENCY),
            lines: raw
                .pick_records(LINES)
                .iter()
                .map(InvoiceLine::from_record)
                .collect(),
            subtotal: raw.pick_f64(SUBTOTAL, 0.0),
            tax: raw.pick_f64(TAX, 0.0),
            discount: raw.pick_f64(DISCOUNT, 0.0),
            total: raw.pick_f64(TOTAL, 0.0),
            notes: raw.pick_str(NOTES, ""),
        }
    }

    /// Amounts go out rounded to two decimals.
    fn to_payload(&self) -> Payload {
        let lines: Vec<Value> = self.lines.iter().map(InvoiceLine::to_value).collect();
        Payload::new()
            .set("numero", self.number.as_str())
            .set_ref("cliente_id", self.customer.as_ref())
            .set("cliente_nombre", self.customer_name.as_str())
            .set("cliente_tipo", self.customer_type.as_str())
            .set_ref("unidad", self.unit.as_ref())
            .set("fecha_emision", self.issue_date.as_str())
            .set("fecha_vencimiento", self.due_date.as_str())
            .set("estado", self.status.as_str())
            .set("moneda", self.currency.as_str())
            .set("items", lines)
            .set("subtotal", round2(self.subtotal))
            .set("impuesto", round2(self.tax))
            .set("descuento", round2(self.discount))
            .set("total", round2(self.total))
            .set("notas", self.notes.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.customer.is_none() && self.customer_name.trim().is_empty() {
            return Err("Seleccione un cliente".into());
        }
        if self.issue_date.trim().is_empty() {
            return Err("La fecha de emisión es obligatoria".into());
        }
        if self.lines.is_empty() {
            return Err("Agregue al menos un ítem".into());
        }
        if self
            .lines
            .iter()
            .any(|l| l.description.trim().is_empty() || l.quantity <= 0.0 || l.unit_price < 0.0)
        {
            return Err("Revise descripción, cantidad y precio de los ítems".into());
        }
        Ok(())
    }
}
