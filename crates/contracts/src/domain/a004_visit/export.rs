use super::aggregate::Visit;
use crate::shared::csv_export::CsvExportable;

/// File name prefix for the visit register export
pub const EXPORT_FILE_PREFIX: &str = "registro_visitas";

impl CsvExportable for Visit {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Visitante",
            "Documento",
            "Telefono",
            "Motivo",
            "Unidad",
            "Fecha",
            "Entrada",
            "Salida",
            "Estado",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            self.name.clone(),
            self.document.clone(),
            self.phone.clone(),
            self.reason.clone(),
            self.unit.as_ref().map(|u| u.display()).unwrap_or_default(),
            self.date.clone().unwrap_or_default(),
            self.check_in.clone().unwrap_or_default(),
            self.check_out.clone().unwrap_or_default(),
            self.status.clone(),
        ]
    }
}
