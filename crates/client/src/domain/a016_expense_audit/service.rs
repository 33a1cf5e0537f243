use contracts::domain::a016_expense_audit::{ExpenseAudit, ExpenseStatus};
use contracts::domain::common::Resource;
use contracts::shared::{Payload, RawRecord, RecordId};

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

#[derive(Clone)]
pub struct ExpenseAuditService {
    client: ResourceClient<ExpenseAudit>,
}

impl ExpenseAuditService {
    pub fn new(client: ResourceClient<ExpenseAudit>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<ExpenseAudit> {
        &self.client
    }

    /// Reconcile or flag an expense. Flagging requires a remark.
    pub async fn set_status(
        &self,
        id: &RecordId,
        status: ExpenseStatus,
        remark: Option<&str>,
    ) -> Result<ExpenseAudit, ApiError> {
        let remark = remark.map(str::trim).filter(|r| !r.is_empty());
        if status == ExpenseStatus::Flagged && remark.is_none() {
            return Err(ApiError::Validation("Indique la observación".into()));
        }
        let fields = Payload::new()
            .set("estado", status.as_str())
            .set_opt("observacion", remark);
        let body = self.client.patch_fields(id, fields).await?;
        tracing::info!("Expense {} -> {}", id, status.as_str());
        Ok(ExpenseAudit::from_record(&RawRecord::from_value(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::fake::FakeTransport;
    use crate::shared::http::Method;
    use crate::shared::resource_client::test_support::client;
    use serde_json::json;

    #[tokio::test]
    async fn test_flag_sends_remark() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "auditoria-gastos/4/", 200, json!({"id": 4, "estado": "OBSERVADO"}));
        let expenses = ExpenseAuditService::new(client::<ExpenseAudit>(&fake).await);

        let expense = expenses
            .set_status(&RecordId::Int(4), ExpenseStatus::Flagged, Some(" Falta factura "))
            .await
            .unwrap();
        assert_eq!(expense.status(), Some(ExpenseStatus::Flagged));
        assert_eq!(
            fake.last(Method::Patch, "auditoria-gastos/4/").and_then(|c| c.body),
            Some(json!({"estado": "OBSERVADO", "observacion": "Falta factura"}))
        );
    }

    #[tokio::test]
    async fn test_flag_without_remark_is_rejected_locally() {
        let fake = FakeTransport::new();
        let expenses = ExpenseAuditService::new(client::<ExpenseAudit>(&fake).await);

        let err = expenses
            .set_status(&RecordId::Int(4), ExpenseStatus::Flagged, Some("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_without_remark() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "auditoria-gastos/4/", 200, json!({}));
        let expenses = ExpenseAuditService::new(client::<ExpenseAudit>(&fake).await);

        expenses
            .set_status(&RecordId::Int(4), ExpenseStatus::Reconciled, None)
            .await
            .unwrap();
        assert_eq!(
            fake.last(Method::Patch, "auditoria-gastos/4/").and_then(|c| c.body),
            Some(json!({"estado": "CONCILIADO"}))
        );
    }
}
