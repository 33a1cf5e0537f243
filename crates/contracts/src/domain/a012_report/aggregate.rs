//! Finance, maintenance and operations reports.
//!
//! The backend may serve a prepared report under `<reports>/<slug>/`; when it
//! does not, the same figures are built from the plain resource lists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::a008_payment::Payment;
use crate::domain::a009_fine::Fine;
use crate::domain::a010_maintenance_task::MaintenanceTask;
use crate::domain::a011_log_entry::LogEntry;
use crate::domain::common::{Resource, ResourceEndpoint};
use crate::shared::field_adapter::RawRecord;
use crate::shared::money::{kpi_sum, round2};

pub const FINANCE_SLUG: &str = "finanzas";
pub const MAINTENANCE_SLUG: &str = "mantenimiento";
pub const OPERATIONS_SLUG: &str = "operacion";

/// Label for rows whose grouping key is empty
pub const UNKNOWN_GROUP: &str = "N/D";

/// Reports are looked up with `ping=1` instead of a page request.
pub const REPORTS_ENDPOINT: ResourceEndpoint = ResourceEndpoint {
    collection: "reports",
    candidates: &["reportes/", "reports/", "analytics/"],
    lookup_params: &[("ping", "1")],
};

// ============================================================================
// Query
// ============================================================================

/// Параметры отчета
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub currency: String,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            currency: "BOB".to_string(),
        }
    }
}

impl ReportQuery {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("desde".to_string(), from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("hasta".to_string(), to.format("%Y-%m-%d").to_string()));
        }
        if !self.currency.is_empty() {
            pairs.push(("moneda".to_string(), self.currency.clone()));
        }
        pairs
    }

    /// Date filters for the list fallback (no currency)
    pub fn range_pairs(&self) -> Vec<(String, String)> {
        self.to_query_pairs()
            .into_iter()
            .filter(|(k, _)| k != "moneda")
            .collect()
    }

    /// `<from>-<to>` suffix used in exported file names
    pub fn file_suffix(&self) -> String {
        let fmt = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        format!("{}-{}", fmt(self.from), fmt(self.to))
    }
}

// ============================================================================
// Series
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountPoint {
    pub date: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountPoint {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub value: u64,
}

fn day_of(value: &str) -> &str {
    value.get(..10).unwrap_or(value)
}

/// Sum an amount per calendar day, ascending by date. Rows without a date
/// are skipped.
pub fn group_by_date_sum<T>(
    rows: &[T],
    date_of: impl Fn(&T) -> &str,
    amount_of: impl Fn(&T) -> f64,
) -> Vec<AmountPoint> {
    let mut totals: std::collections::BTreeMap<String, f64> = Default::default();
    for row in rows {
        let day = day_of(date_of(row));
        if day.is_empty() {
            continue;
        }
        *totals.entry(day.to_string()).or_default() += amount_of(row);
    }
    totals
        .into_iter()
        .map(|(date, total)| AmountPoint {
            date,
            total: round2(total),
        })
        .collect()
}

pub fn group_count_by_date<T>(rows: &[T], date_of: impl Fn(&T) -> &str) -> Vec<CountPoint> {
    let mut counts: std::collections::BTreeMap<String, u64> = Default::default();
    for row in rows {
        let day = day_of(date_of(row));
        if day.is_empty() {
            continue;
        }
        *counts.entry(day.to_string()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| CountPoint { date, count })
        .collect()
}

/// Count rows per value in first-seen order; empty values count as `N/D`.
pub fn group_by_value_count<T>(rows: &[T], key_of: impl Fn(&T) -> &str) -> Vec<NamedCount> {
    let mut groups: Vec<NamedCount> = Vec::new();
    for row in rows {
        let key = match key_of(row) {
            "" => UNKNOWN_GROUP,
            k => k,
        };
        match groups.iter_mut().find(|g| g.name == key) {
            Some(group) => group.value += 1,
            None => groups.push(NamedCount {
                name: key.to_string(),
                value: 1,
            }),
        }
    }
    groups
}

// ============================================================================
// Prepared report parsing helpers
// ============================================================================

/// `data[key]`, then `data.results[key]`, as a list of records.
fn records<R: Resource>(data: &Value, key: &str) -> Vec<R> {
    let list = data
        .get(key)
        .or_else(|| data.get("results").and_then(|r| r.get(key)));
    match list {
        Some(Value::Array(items)) => items
            .iter()
            .cloned()
            .map(RawRecord::from_value)
            .map(|raw| R::from_record(&raw))
            .collect(),
        _ => Vec::new(),
    }
}

fn series<T: for<'de> Deserialize<'de>>(data: &Value, key: &str) -> Option<Vec<T>> {
    data.get(key)
        .and_then(|v| serde_json::from_value::<Vec<T>>(v.clone()).ok())
}

fn kpi_f64(data: &Value, key: &str) -> Option<f64> {
    let raw = RawRecord::from_value(data.get("kpis").cloned().unwrap_or(Value::Null));
    raw.pick_opt_f64(&[key])
}

fn kpi_u64(data: &Value, key: &str) -> Option<u64> {
    kpi_f64(data, key).map(|v| v.max(0.0) as u64)
}

/// A prepared report counts only when it carries `results`.
fn is_prepared(data: &Value) -> bool {
    data.get("results").map(|r| !r.is_null()).unwrap_or(false)
}

// ============================================================================
// Finance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinanceKpis {
    pub income: f64,
    pub fines: f64,
    pub tickets: u64,
}

/// Финансовый отчет
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinanceReport {
    pub payments: Vec<Payment>,
    pub fines: Vec<Fine>,
    pub income_series: Vec<AmountPoint>,
    pub fines_series: Vec<AmountPoint>,
    pub kpis: FinanceKpis,
}

impl FinanceReport {
    pub fn from_client(payments: Vec<Payment>, fines: Vec<Fine>) -> Self {
        let kpis = FinanceKpis {
            income: kpi_sum(&payments, |p| p.amount),
            fines: kpi_sum(&fines, |f| f.amount),
            tickets: payments.len() as u64,
        };
        Self {
            income_series: group_by_date_sum(&payments, |p| p.date.as_str(), |p| p.amount),
            fines_series: group_by_date_sum(&fines, |f| f.date.as_str(), |f| f.amount),
            payments,
            fines,
            kpis,
        }
    }

    /// `None` when the response is not a prepared report.
    pub fn from_api(data: &Value) -> Option<Self> {
        if !is_prepared(data) {
            return None;
        }
        let built = Self::from_client(records(data, "pagos"), records(data, "multas"));
        Some(Self {
            income_series: series(data, "serieIngresos").unwrap_or(built.income_series),
            fines_series: series(data, "serieMultas").unwrap_or(built.fines_series),
            kpis: FinanceKpis {
                income: kpi_f64(data, "ingresos").unwrap_or(built.kpis.income),
                fines: kpi_f64(data, "multas").unwrap_or(built.kpis.fines),
                tickets: kpi_u64(data, "tickets").unwrap_or(built.kpis.tickets),
            },
            payments: built.payments,
            fines: built.fines,
        })
    }
}

// ============================================================================
// Maintenance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaintenanceKpis {
    pub tasks: u64,
    pub completed: u64,
    pub cost: f64,
}

/// Отчет по обслуживанию
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaintenanceReport {
    pub tasks: Vec<MaintenanceTask>,
    pub task_series: Vec<CountPoint>,
    pub cost_series: Vec<AmountPoint>,
    pub kpis: MaintenanceKpis,
}

impl MaintenanceReport {
    /// Cost figures come from the tasks' estimated cost.
    pub fn from_client(tasks: Vec<MaintenanceTask>) -> Self {
        let kpis = MaintenanceKpis {
            tasks: tasks.len() as u64,
            completed: tasks.iter().filter(|t| t.is_completed()).count() as u64,
            cost: kpi_sum(&tasks, |t| t.estimated_cost),
        };
        Self {
            task_series: group_count_by_date(&tasks, |t| t.scheduled_date.as_str()),
            cost_series: group_by_date_sum(&tasks, |t| t.scheduled_date.as_str(), |t| t.estimated_cost),
            tasks,
            kpis,
        }
    }

    pub fn from_api(data: &Value) -> Option<Self> {
        if !is_prepared(data) {
            return None;
        }
        let built = Self::from_client(records(data, "tareas"));
        Some(Self {
            task_series: series(data, "serieTareas").unwrap_or(built.task_series),
            cost_series: series(data, "serieCostos").unwrap_or(built.cost_series),
            kpis: MaintenanceKpis {
                tasks: kpi_u64(data, "tareas").unwrap_or(built.kpis.tasks),
                completed: kpi_u64(data, "completas").unwrap_or(built.kpis.completed),
                cost: kpi_f64(data, "costo").unwrap_or(built.kpis.cost),
            },
            tasks: built.tasks,
        })
    }
}

// ============================================================================
// Operations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationsKpis {
    pub entries: u64,
    pub closed: u64,
}

/// Операционный отчет (журнал)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationsReport {
    pub entries: Vec<LogEntry>,
    pub shift_series: Vec<NamedCount>,
    pub kpis: OperationsKpis,
}

impl OperationsReport {
    pub fn from_client(entries: Vec<LogEntry>) -> Self {
        let kpis = OperationsKpis {
            entries: entries.len() as u64,
            closed: entries.iter().filter(|e| e.is_closed()).count() as u64,
        };
        Self {
            shift_series: group_by_value_count(&entries, |e| e.shift.as_str()),
            entries,
            kpis,
        }
    }

    pub fn from_api(data: &Value) -> Option<Self> {
        if !is_prepared(data) {
            return None;
        }
        let built = Self::from_client(records(data, "bitacora"));
        Some(Self {
            shift_series: series(data, "serieTurno").unwrap_or(built.shift_series),
            kpis: OperationsKpis {
                entries: kpi_u64(data, "entradas").unwrap_or(built.kpis.entries),
                closed: kpi_u64(data, "cerradas").unwrap_or(built.kpis.closed),
            },
            entries: built.entries,
        })
    }
}
