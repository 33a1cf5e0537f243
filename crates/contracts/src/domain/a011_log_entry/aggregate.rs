use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

const ID: &[&str] = &["id", "uuid", "pk"];
const DATE: &[&str] = &["fecha", "date"];
const TIME: &[&str] = &["hora", "time"];
const CREATED_AT: &[&str] = &["created_at"];
const SHIFT: &[&str] = &["turno", "shift"];
const KIND: &[&str] = &["tipo", "category", "class"];
const TITLE: &[&str] = &["titulo", "title"];
const DESCRIPTION: &[&str] = &["descripcion", "description", "detalle"];
const AUTHOR: &[&str] = &["autor", "author", "user", "personal", "autor_id"];
const STATUS: &[&str] = &["estado", "status"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id"];
const AREA: &[&str] = &["area", "area_id", "amenity"];
const TASK: &[&str] = &["tarea_id", "task_id", "tarea"];
const INCIDENT: &[&str] = &["incidente_id", "incident_id", "incidente"];
const ATTACHMENT: &[&str] = &["adjunto_url", "attachment", "file"];
const NOTES: &[&str] = &["notas", "notes"];

/// OPERATIVO | SEGURIDAD | LIMPIEZA | MANTENIMIENTO | INCIDENTE
pub const DEFAULT_KIND: &str = "OPERATIVO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogStatus {
    Open,
    Closed,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Open => "ABIERTO",
            LogStatus::Closed => "CERRADO",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ABIERTO" => Some(LogStatus::Open),
            "CERRADO" => Some(LogStatus::Closed),
            _ => None,
        }
    }
}

/// Запись журнала (bitácora)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LogEntry {
    pub id: Option<RecordId>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:mm`
    pub time: String,
    pub shift: String,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub author: Option<EntityRef>,
    pub status: String,
    pub unit: Option<EntityRef>,
    pub area: Option<EntityRef>,
    pub task: Option<EntityRef>,
    pub incident: Option<EntityRef>,
    pub attachment_url: String,
    pub notes: String,
}

impl LogEntry {
    pub fn status(&self) -> Option<LogStatus> {
        LogStatus::parse(&self.status)
    }

    pub fn is_closed(&self) -> bool {
        self.status() == Some(LogStatus::Closed)
    }
}

/// Slice of an ISO timestamp, empty when it is too short.
fn timestamp_part(raw: &RawRecord, from: usize, to: usize) -> String {
    raw.pick_str(CREATED_AT, "")
        .get(from..to)
        .map(str::to_string)
        .unwrap_or_default()
}

impl Resource for LogEntry {
    fn resource_index() -> &'static str {
        "a011"
    }

    fn collection_name() -> &'static str {
        "logs"
    }

    fn element_name() -> &'static str {
        "Entrada de bitácora"
    }

    fn list_name() -> &'static str {
        "Bitácora"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &[
            "bitacora/",
            "bitacoras/",
            "operaciones/bitacora/",
            "mantenimiento/bitacora/",
            "logs/",
        ]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    /// Date and time fall back to the `created_at` timestamp.
    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(ID),
            date: raw
                .pick_opt_str(DATE)
                .unwrap_or_else(|| timestamp_part(raw, 0, 10)),
            time: raw
                .pick_opt_str(TIME)
                .unwrap_or_else(|| timestamp_part(raw, 11, 16)),
            shift: raw.pick_str(SHIFT, ""),
            kind: raw.pick_str(KIND, DEFAULT_KIND),
            title: raw.pick_str(TITLE, ""),
            description: raw.pick_str(DESCRIPTION, ""),
            author: raw.pick_ref(AUTHOR),
            status: raw.pick_str(STATUS, LogStatus::Open.as_str()),
            unit: raw.pick_ref(UNIT),
            area: raw.pick_ref(AREA),
            task: raw.pick_ref(TASK),
            incident: raw.pick_ref(INCIDENT),
            attachment_url: raw.pick_str(ATTACHMENT, ""),
            notes: raw.pick_str(NOTES, ""),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("fecha", self.date.as_str())
            .set("hora", self.time.as_str())
            .set("turno", self.shift.as_str())
            .set("tipo", self.kind.as_str())
            .set("title", self.title.as_str())
            .set("descripcion", self.description.as_str())
            .set_ref("autor", self.author.as_ref())
            .set("status", self.status.as_str())
            .set_ref("unidad", self.unit.as_ref())
            .set_ref("area", self.area.as_ref())
            .set_ref("tarea_id", self.task.as_ref())
            .set_ref("incidente_id", self.incident.as_ref())
            .set("adjunto_url", self.attachment_url.as_str())
            .set("notas", self.notes.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("El título es obligatorio".into());
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

    #[test]
    fn test_date_and_time_from_created_at() {
        let entry = LogEntry::from_record(&RawRecord::from_value(json!({
            "id": 77,
            "title": "Ronda nocturna",
            "created_at": "2024-06-03T22:45:10Z",
            "user": 4
        })));
        assert_eq!(entry.date, "2024-06-03");
        assert_eq!(entry.time, "22:45");
        assert_eq!(entry.kind, DEFAULT_KIND);
        assert_eq!(entry.status(), Some(LogStatus::Open));
        assert_eq!(entry.author.map(|a| a.id), Some(RecordId::Int(4)));
    }

    #[test]
    fn test_short_created_at() {
        let entry = LogEntry::from_record(&RawRecord::from_value(json!({"created_at": "2024"})));
        assert_eq!(entry.date, "");
        assert_eq!(entry.time, "");
    }

    #[test]
    fn test_payload_uses_title_and_status() {
        let entry = LogEntry {
            title: "Fuga".into(),
            date: "2024-06-03".into(),
            status: "CERRADO".into(),
            ..Default::default()
        };
        assert!(entry.is_closed());
        let payload = entry.to_payload();
        assert_eq!(payload.get("title"), Some(&json!("Fuga")));
        assert_eq!(payload.get("status"), Some(&json!("CERRADO")));
        assert!(!payload.contains("hora"));
    }
}
