pub mod aggregate;

pub use aggregate::{
    FinanceReport, MaintenanceReport, OperationsReport, ReportQuery, FINANCE_SLUG,
    MAINTENANCE_SLUG, OPERATIONS_SLUG, REPORTS_ENDPOINT,
};
