use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::money::round2;
use crate::shared::record_id::RecordId;

const ID: &[&str] = &["id", "uuid", "pk"];
const INVOICE: &[&str] = &["factura_id", "invoice", "invoice_id", "comprobante_id"];
const INVOICE_NUMBER: &[&str] = &["factura_numero", "invoice_number", "comprobante"];
const DATE: &[&str] = &["fecha", "date", "paid_at"];
const AMOUNT: &[&str] = &["monto", "amount"];
const CURRENCY: &[&str] = &["moneda", "currency"];
const METHOD: &[&str] = &["metodo", "method", "forma"];
const REFERENCE: &[&str] = &["referencia", "reference", "voucher"];
const STATUS: &[&str] = &["estado", "status"];
const NOTES: &[&str] = &["observacion", "notes", "nota"];
const BALANCE: &[&str] = &["saldo_pendiente", "balance"];

pub const DEFAULT_METHOD: &str = "EFECTIVO";
pub const DEFAULT_CURRENCY: &str = "BOB";

/// Статус платежа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Confirmed,
    Pending,
    Voided,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Confirmed => "CONFIRMADO",
            PaymentStatus::Pending => "PENDIENTE",
            PaymentStatus::Voided => "ANULADO",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "CONFIRMADO" => Some(PaymentStatus::Confirmed),
            "PENDIENTE" => Some(PaymentStatus::Pending),
            "ANULADO" => Some(PaymentStatus::Voided),
            _ => None,
        }
    }
}

/// Платеж по счету
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Payment {
    pub id: Option<RecordId>,
    pub invoice: Option<EntityRef>,
    /// Display only, never sent back
    pub invoice_number: String,
    pub date: String,
    pub amount: f64,
    pub currency: String,
    /// EFECTIVO | TARJETA | TRANSFERENCIA | QR
    pub method: String,
    pub reference: String,
    pub status: String,
    pub notes: String,
    /// Outstanding invoice balance, when the backend reports it
    pub balance: f64,
}

impl Payment {
    pub fn status(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.status)
    }
}

impl Resource for Payment {
    fn resource_index() -> &'static str {
        "a008"
    }

    fn collection_name() -> &'static str {
        "payments"
    }

    fn element_name() -> &'static str {
        "Pago"
    }

    fn list_name() -> &'static str {
        "Pagos"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["pagos/", "payments/", "cobros/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        let invoice = raw.pick_ref(INVOICE);
        let invoice_number = raw
            .pick_opt_str(INVOICE_NUMBER)
            .or_else(|| invoice.as_ref().and_then(|r| r.label.clone()))
            .unwrap_or_default();
        Self {
            id: raw.pick_id(ID),
            invoice,
            invoice_number,
            date: raw.pick_str(DATE, ""),
            amount: raw.pick_f64(AMOUNT, 0.0),
            currency: raw.pick_str(CURRENCY, DEFAULT_CURRENCY),
            method: raw.pick_str(METHOD, DEFAULT_METHOD),
            reference: raw.pick_str(REFERENCE, ""),
            status: raw.pick_str(STATUS, PaymentStatus::Confirmed.as_str()),
            notes: raw.pick_str(NOTES, ""),
            balance: raw.pick_f64(BALANCE, 0.0),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set_ref("factura_id", self.invoice.as_ref())
            .set("fecha", self.date.as_str())
            .set("monto", round2(self.amount))
            .set("moneda", self.currency.as_str())
            .set("metodo", self.method.as_str())
            .set("referencia", self.reference.as_str())
            .set("estado", self.status.as_str())
            .set("observacion", self.notes.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.invoice.is_none() {
            return Err("Seleccione la factura".into());
        }
        if self.date.trim().is_empty() {
            return Err("La fecha es obligatoria".into());
        }
        if self.amount <= 0.0 {
            return Err("El monto debe ser mayor a cero".into());
        }
        Ok(())
    }
}
