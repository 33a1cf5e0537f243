use chrono::NaiveDate;

use super::aggregate::LogEntry;
use crate::domain::a012_report::ReportQuery;
use crate::shared::csv_export::CsvExportable;

pub const EXPORT_FILE_PREFIX: &str = "bitacora";

/// `bitacora_<from>-<to>.csv`; an open end reads `desde` / `hasta`.
pub fn range_file_name(range: &ReportQuery) -> String {
    let fmt = |d: Option<NaiveDate>, open: &str| {
        d.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| open.to_string())
    };
    format!(
        "{}_{}-{}.csv",
        EXPORT_FILE_PREFIX,
        fmt(range.from, "desde"),
        fmt(range.to, "hasta")
    )
}

fn display(reference: &Option<crate::shared::field_adapter::EntityRef>) -> String {
    reference.as_ref().map(|r| r.display()).unwrap_or_default()
}

impl CsvExportable for LogEntry {
    fn headers() -> Vec<&'static str> {
        vec![
            "Fecha", "Hora", "Turno", "Tipo", "Título", "Autor", "Unidad", "Área", "Estado",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.time.clone(),
            self.shift.clone(),
            self.kind.clone(),
            self.title.clone(),
            display(&self.author),
            display(&self.unit),
            display(&self.area),
            self.status.clone(),
        ]
    }
}
