use super::aggregate::Payment;
use crate::shared::csv_export::CsvExportable;
use crate::shared::money::format_amount;

pub const EXPORT_FILE_PREFIX: &str = "historial_pagos";

impl CsvExportable for Payment {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Factura",
            "Fecha",
            "Monto",
            "Método",
            "Referencia",
            "Estado",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        let invoice = if self.invoice_number.is_empty() {
            self.invoice.as_ref().map(|r| r.display()).unwrap_or_default()
        } else {
            self.invoice_number.clone()
        };
        vec![
            self.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            invoice,
            self.date.clone(),
            format_amount(self.amount),
            self.method.clone(),
            self.reference.clone(),
            self.status.clone(),
        ]
    }
}
