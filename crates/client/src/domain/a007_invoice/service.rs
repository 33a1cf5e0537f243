use contracts::domain::a007_invoice::Invoice;
use contracts::domain::common::Resource;
use contracts::shared::money::InvoiceTotals;
use contracts::shared::RecordId;

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

/// Download routes for the printable invoice, in order
const PDF_ROUTES: &[&str] = &["pdf", "print"];

#[derive(Clone)]
pub struct InvoiceService {
    client: ResourceClient<Invoice>,
}

impl InvoiceService {
    pub fn new(client: ResourceClient<Invoice>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Invoice> {
        &self.client
    }

    /// Recompute totals from the lines and save. A negative grand total is
    /// sent as is, only logged.
    pub async fn save_with_totals(
        &self,
        invoice: &mut Invoice,
        tax_percent: f64,
        discount: f64,
    ) -> Result<(Invoice, InvoiceTotals), ApiError> {
        let totals = invoice.apply_totals(tax_percent, discount);
        if totals.is_negative() {
            tracing::warn!(
                "Invoice {} has a negative total ({}), discount exceeds subtotal plus tax",
                invoice.number,
                totals.grand_total
            );
        }
        invoice.validate().map_err(ApiError::Validation)?;
        let saved = self.client.save(invoice).await?;
        Ok((saved, totals))
    }

    pub async fn pdf(&self, id: &RecordId) -> Result<Vec<u8>, ApiError> {
        self.client.download(id, PDF_ROUTES).await
    }

    /// `factura_<number>.pdf`, falling back to the id
    pub fn pdf_file_name(invoice_number: Option<&str>, id: &RecordId) -> String {
        match invoice_number.map(str::trim).filter(|n| !n.is_empty()) {
            Some(number) => format!("factura_{}.pdf", number),
            None => format!("factura_{}.pdf", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::fake::FakeTransport;
    use crate::shared::http::Method;
    use crate::shared::resource_client::test_support::client;
    use contracts::domain::a007_invoice::InvoiceLine;
    use contracts::shared::EntityRef;
    use serde_json::{json, Value};

    fn draft() -> Invoice {
        Invoice {
            customer: Some(EntityRef::new(12i64)),
            issue_date: "2024-03-01".into(),
            lines: vec![
                InvoiceLine::new("Expensas", 2.0, 50.0),
                InvoiceLine::new("Agua", 1.0, 30.0),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_totals_are_sent_rounded() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "facturas/", 201, json!({"id": 1, "total": 136.9}));
        let invoices = InvoiceService::new(client::<Invoice>(&fake).await);
        let mut invoice = draft();

        let (saved, totals) = invoices.save_with_totals(&mut invoice, 13.0, 10.0).await.unwrap();
        assert_eq!(saved.id, Some(RecordId::Int(1)));
        assert_eq!(totals.subtotal, 130.0);
        assert_eq!(totals.tax, 16.9);
        assert_eq!(totals.grand_total, 136.9);

        let body = fake.last(Method::Post, "facturas/").and_then(|c| c.body).unwrap();
        assert_eq!(body["subtotal"], json!(130.0));
        assert_eq!(body["impuesto"], json!(16.9));
        assert_eq!(body["total"], json!(136.9));
        assert_eq!(body["cliente_id"], json!(12));
    }

    #[tokio::test]
    async fn test_invalid_invoice_is_not_sent() {
        let fake = FakeTransport::new();
        let invoices = InvoiceService::new(client::<Invoice>(&fake).await);
        let mut invoice = Invoice {
            lines: Vec::new(),
            ..draft()
        };
        let err = invoices.save_with_totals(&mut invoice, 13.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pdf_falls_back_to_print() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "facturas/3/pdf/", 404, Value::Null);
        fake.on_bytes(Method::Get, "facturas/3/print/", 200, b"%PDF".to_vec());
        let invoices = InvoiceService::new(client::<Invoice>(&fake).await);
        assert_eq!(invoices.pdf(&RecordId::Int(3)).await.unwrap(), b"%PDF");
    }

    #[test]
    fn test_pdf_file_name() {
        let id = RecordId::Int(3);
        assert_eq!(InvoiceService::pdf_file_name(Some("F-001"), &id), "factura_F-001.pdf");
        assert_eq!(InvoiceService::pdf_file_name(Some(" "), &id), "factura_3.pdf");
    }
}
