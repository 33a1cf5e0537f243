use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::money::round2;
use crate::shared::penalty::{parse_date, PenaltyAccrual};
use crate::shared::record_id::RecordId;

// ============================================================================
// Aliases
// ============================================================================

const ID: &[&str] = &["id", "uuid", "pk"];
const CODE: &[&str] = &["codigo", "code", "numero"];
const REASON: &[&str] = &["motivo", "reason", "descripcion", "description"];
const KIND: &[&str] = &["tipo", "type"];
const AMOUNT: &[&str] = &["monto", "amount"];
const CURRENCY: &[&str] = &["moneda", "currency"];
const STATUS: &[&str] = &["estado", "status"];
const DATE: &[&str] = &["fecha", "date", "created_at"];
const DUE_DATE: &[&str] = &["vencimiento", "due_date"];
const DAILY_INTEREST: &[&str] = &["interes_dia", "daily_interest"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id"];
const RESIDENT: &[&str] = &["residente", "resident", "residente_id", "resident_id"];
const INVOICE: &[&str] = &["factura_id", "invoice_id"];
const INVOICE_NUMBER: &[&str] = &["factura_numero", "invoice_number"];
const NOTES: &[&str] = &["observacion", "notes"];

pub const DEFAULT_KIND: &str = "GENERAL";
pub const DEFAULT_CURRENCY: &str = "BOB";

/// Статус штрафа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FineStatus {
    Pending,
    Paid,
    Voided,
}

impl FineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FineStatus::Pending => "PENDIENTE",
            FineStatus::Paid => "PAGADA",
            FineStatus::Voided => "ANULADA",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PENDIENTE" => Some(FineStatus::Pending),
            "PAGADA" => Some(FineStatus::Paid),
            "ANULADA" => Some(FineStatus::Voided),
            _ => None,
        }
    }
}

/// Штраф (multa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Fine {
    pub id: Option<RecordId>,
    pub code: String,
    pub reason: String,
    pub kind: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub date: String,
    pub due_date: String,
    /// Percent of the principal per day overdue
    pub daily_interest: f64,
    pub unit: Option<EntityRef>,
    pub resident: Option<EntityRef>,
    pub invoice: Option<EntityRef>,
    pub invoice_number: String,
    pub notes: String,
}

impl Fine {
    pub fn status(&self) -> Option<FineStatus> {
        FineStatus::parse(&self.status)
    }

    /// Estimated interest as of `today`. Paid and voided fines do not accrue.
    pub fn accrual(&self, today: NaiveDate) -> PenaltyAccrual {
        let due = match self.status() {
            Some(FineStatus::Paid) | Some(FineStatus::Voided) => None,
            _ => parse_date(&self.due_date),
        };
        PenaltyAccrual::compute_opt(self.amount, self.daily_interest, due, today)
    }
}

impl Resource for Fine {
    fn resource_index() -> &'static str {
        "a009"
    }

    fn collection_name() -> &'static str {
        "fines"
    }

    fn element_name() -> &'static str {
        "Multa"
    }

    fn list_name() -> &'static str {
        "Multas"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["multas/", "fines/", "sanciones/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(ID),
            code: raw.pick_str(CODE, ""),
            reason: raw.pick_str(REASON, ""),
            kind: raw.pick_str(KIND, DEFAULT_KIND),
            amount: raw.pick_f64(AMOUNT, 0.0),
            currency: raw.pick_str(CURRENCY, DEFAULT_CURRENCY),
            status: raw.pick_str(STATUS, FineStatus::Pending.as_str()),
            date: raw.pick_str(DATE, ""),
            due_date: raw.pick_str(DUE_DATE, ""),
            daily_interest: raw.pick_f64(DAILY_INTEREST, 0.0),
            unit: raw.pick_ref(UNIT),
            resident: raw.pick_ref(RESIDENT),
            invoice: raw.pick_ref(INVOICE),
            invoice_number: raw.pick_str(INVOICE_NUMBER, ""),
            notes: raw.pick_str(NOTES, ""),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("codigo", self.code.as_str())
            .set("motivo", self.reason.as_str())
            .set("tipo", self.kind.as_str())
            .set("monto", round2(self.amount))
            .set("moneda", self.currency.as_str())
            .set("estado", self.status.as_str())
            .set("fecha", self.date.as_str())
            .set("vencimiento", self.due_date.as_str())
            .set("interes_dia", self.daily_interest)
            .set_ref("unidad", self.unit.as_ref())
            .set_ref("residente", self.resident.as_ref())
            .set("observacion", self.notes.as_str())
            .set_ref("factura_id", self.invoice.as_ref())
    }

    fn validate(&self) -> Result<(), String> {
        if self.reason.trim().is_empty() {
            return Err("El motivo es obligatorio".into());
        }
        if self.amount <= 0.0 {
            return Err("El monto debe ser mayor a cero".into());
        }
        if self.date.trim().is_empty() {
            return Err("La fecha es obligatoria".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    #[test]
    fn test_accrual_for_pending_fine() {
        let fine = Fine::from_record(&RawRecord::from_value(json!({
            "reason": "Ruido",
            "amount": 200,
            "due_date": "2024-06-10",
            "daily_interest": "1"
        })));
        assert_eq!(fine.status(), Some(FineStatus::Pending));
        let accrual = fine.accrual(today());
        assert_eq!(accrual.days_overdue, 10);
        assert_eq!(accrual.penalty, 20.0);
        assert_eq!(accrual.total_due, 220.0);
    }

    #[test]
    fn test_paid_fine_does_not_accrue() {
        let fine = Fine {
            amount: 200.0,
            daily_interest: 1.0,
            due_date: "2024-06-10".into(),
            status: "PAGADA".into(),
            ..Default::default()
        };
        assert_eq!(fine.accrual(today()).penalty, 0.0);
    }

    #[test]
    fn test_unit_and_resident_refs() {
        let fine = Fine::from_record(&RawRecord::from_value(json!({
            "unit_id": 7,
            "resident": {"uuid": "r-1", "name": "Ana"}
        })));
        assert_eq!(fine.unit.map(|u| u.id), Some(RecordId::Int(7)));
        assert_eq!(fine.resident.map(|r| r.display()), Some("Ana".into()));
        assert_eq!(fine.kind, DEFAULT_KIND);
    }
}
