use std::path::PathBuf;
use std::sync::Arc;

use contracts::domain::a008_payment::Payment;
use contracts::domain::a009_fine::Fine;
use contracts::domain::a010_maintenance_task::MaintenanceTask;
use contracts::domain::a011_log_entry::LogEntry;
use contracts::domain::a012_report::{
    FinanceReport, MaintenanceReport, OperationsReport, ReportQuery, FINANCE_SLUG,
    MAINTENANCE_SLUG, OPERATIONS_SLUG, REPORTS_ENDPOINT,
};
use contracts::shared::money::format_amount;
use contracts::shared::{EntityRef, ListQuery};
use serde_json::Value;

use crate::shared::api_client::ApiClient;
use crate::shared::discovery::EndpointResolver;
use crate::shared::error::ApiError;
use crate::shared::export::Exporter;
use crate::shared::resource_client::{try_next_route, ResourceClient};

/// Отчеты: готовые с бэкенда, иначе собранные из списков
pub struct ReportService {
    api: ApiClient,
    resolver: Arc<EndpointResolver>,
    payments: ResourceClient<Payment>,
    fines: ResourceClient<Fine>,
    tasks: ResourceClient<MaintenanceTask>,
    logs: ResourceClient<LogEntry>,
}

impl ReportService {
    pub fn new(api: ApiClient, resolver: Arc<EndpointResolver>) -> Self {
        Self {
            payments: ResourceClient::new(api.clone(), resolver.clone()),
            fines: ResourceClient::new(api.clone(), resolver.clone()),
            tasks: ResourceClient::new(api.clone(), resolver.clone()),
            logs: ResourceClient::new(api.clone(), resolver.clone()),
            api,
            resolver,
        }
    }

    /// `GET {reports}{slug}/` with the date range and currency
    pub async fn fetch(&self, slug: &str, query: &ReportQuery) -> Result<Value, ApiError> {
        let base = self.resolver.resolve(&REPORTS_ENDPOINT).await?;
        let path = format!("{}{}/", base, slug);
        self.api.get_json(&path, &query.to_query_pairs()).await
    }

    /// Prepared report, or `None` when the backend has none for `slug`.
    async fn prepared(&self, slug: &str, query: &ReportQuery) -> Result<Option<Value>, ApiError> {
        match self.fetch(slug, query).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if try_next_route(&e) => {
                tracing::debug!("Report '{}' not available ({}), building locally", slug, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn list_query(query: &ReportQuery) -> ListQuery {
        query
            .range_pairs()
            .into_iter()
            .fold(ListQuery::new(), |q, (name, value)| q.filter(name, value))
    }

    pub async fn finance(&self, query: &ReportQuery) -> Result<FinanceReport, ApiError> {
        if let Some(report) = self
            .prepared(FINANCE_SLUG, query)
            .await?
            .and_then(|data| FinanceReport::from_api(&data))
        {
            return Ok(report);
        }
        let list = Self::list_query(query);
        let payments = self.payments.fetch_all(&list).await?;
        let fines = self.fines.fetch_all(&list).await?;
        Ok(FinanceReport::from_client(payments, fines))
    }

    pub async fn maintenance(&self, query: &ReportQuery) -> Result<MaintenanceReport, ApiError> {
        if let Some(report) = self
            .prepared(MAINTENANCE_SLUG, query)
            .await?
            .and_then(|data| MaintenanceReport::from_api(&data))
        {
            return Ok(report);
        }
        let tasks = self.tasks.fetch_all(&Self::list_query(query)).await?;
        Ok(MaintenanceReport::from_client(tasks))
    }

    pub async fn operations(&self, query: &ReportQuery) -> Result<OperationsReport, ApiError> {
        if let Some(report) = self
            .prepared(OPERATIONS_SLUG, query)
            .await?
            .and_then(|data| OperationsReport::from_api(&data))
        {
            return Ok(report);
        }
        let entries = self.logs.fetch_all(&Self::list_query(query)).await?;
        Ok(OperationsReport::from_client(entries))
    }
}

// ============================================================================
// CSV
// ============================================================================

pub async fn export_finance(
    exporter: &Exporter,
    report: &FinanceReport,
    query: &ReportQuery,
) -> Result<PathBuf, ApiError> {
    let rows: Vec<Vec<String>> = report
        .payments
        .iter()
        .map(|p| {
            vec![
                p.date.clone(),
                p.invoice_number.clone(),
                format_amount(p.amount),
                p.method.clone(),
                p.status.clone(),
                p.reference.clone(),
            ]
        })
        .collect();
    exporter
        .write_table(
            &format!("reporte_pagos_{}.csv", query.file_suffix()),
            &["Fecha", "Factura", "Monto", "Método", "Estado", "Referencia"],
            &rows,
        )
        .await
}

pub async fn export_maintenance(
    exporter: &Exporter,
    report: &MaintenanceReport,
    query: &ReportQuery,
) -> Result<PathBuf, ApiError> {
    let display = |r: &Option<EntityRef>| r.as_ref().map(|r| r.display()).unwrap_or_default();
    let rows: Vec<Vec<String>> = report
        .tasks
        .iter()
        .map(|t| {
            vec![
                t.scheduled_date.clone(),
                t.title.clone(),
                display(&t.service),
                display(&t.assignee),
                format_amount(t.estimated_cost),
                t.status.clone(),
            ]
        })
        .collect();
    exporter
        .write_table(
            &format!("reporte_mantenimiento_{}.csv", query.file_suffix()),
            &["Fecha", "Título", "Servicio", "Responsable", "Costo", "Estado"],
            &rows,
        )
        .await
}

pub async fn export_operations(
    exporter: &Exporter,
    report: &OperationsReport,
    query: &ReportQuery,
) -> Result<PathBuf, ApiError> {
    let rows: Vec<Vec<String>> = report
        .entries
        .iter()
        .map(|e| {
            vec![
                e.date.clone(),
                e.time.clone(),
                e.shift.clone(),
                e.kind.clone(),
                e.title.clone(),
                e.status.clone(),
            ]
        })
        .collect();
    exporter
        .write_table(
            &format!("reporte_bitacora_{}.csv", query.file_suffix()),
            &["Fecha", "Hora", "Turno", "Tipo", "Título", "Estado"],
            &rows,
        )
        .await
}
