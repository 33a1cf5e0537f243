use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

// ============================================================================
// Aliases
// ============================================================================

const TITLE: &[&str] = &["titulo", "title", "asunto"];
const DESCRIPTION: &[&str] = &["descripcion", "description", "detalle"];
const CATEGORY: &[&str] = &["categoria", "category", "tipo", "type"];
const PRIORITY: &[&str] = &["prioridad", "priority", "severity"];
const STATUS: &[&str] = &["estado", "status"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id", "unidad_uuid", "unit_uuid"];
const REPORTER: &[&str] = &["reportado_por", "reporter", "creado_por", "created_by"];
const ASSIGNEE: &[&str] = &["asignado_a", "assignee", "encargado"];
const REPORTED_AT: &[&str] = &["fecha_reporte", "fecha", "created_at", "reported_at"];
const RESOLVED_AT: &[&str] = &["fecha_resolucion", "resuelto_en", "resolved_at"];
const EVIDENCE: &[&str] = &["evidencia_url", "evidence", "photo", "image", "attachment"];
const NOTES: &[&str] = &["notas", "comentarios", "comments"];

pub const DEFAULT_PRIORITY: &str = "MEDIA";

/// Статус инцидента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "ABIERTO",
            IncidentStatus::InProgress => "EN_PROCESO",
            IncidentStatus::Resolved => "RESUELTO",
            IncidentStatus::Closed => "CERRADO",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ABIERTO" | "OPEN" => Some(IncidentStatus::Open),
            "EN_PROCESO" | "IN_PROGRESS" => Some(IncidentStatus::InProgress),
            "RESUELTO" | "RESOLVED" => Some(IncidentStatus::Resolved),
            "CERRADO" | "CLOSED" => Some(IncidentStatus::Closed),
            _ => None,
        }
    }
}

/// Инцидент, заявленный жильцом или охраной
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Incident {
    pub id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub category: String,
    /// BAJA | MEDIA | ALTA | CRITICA
    pub priority: String,
    pub status: String,
    pub unit: Option<EntityRef>,
    pub reporter: Option<EntityRef>,
    pub assignee: Option<EntityRef>,
    pub reported_at: Option<String>,
    pub resolved_at: Option<String>,
    pub evidence_url: Option<String>,
    pub notes: String,
}

impl Incident {
    pub fn status(&self) -> Option<IncidentStatus> {
        IncidentStatus::parse(&self.status)
    }
}

impl Resource for Incident {
    fn resource_index() -> &'static str {
        "a013"
    }

    fn collection_name() -> &'static str {
        "incidents"
    }

    fn element_name() -> &'static str {
        "Incidente"
    }

    fn list_name() -> &'static str {
        "Incidentes"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["incidentes/", "incidents/", "reportes-incidentes/", "issues/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            title: raw.pick_str(TITLE, ""),
            description: raw.pick_str(DESCRIPTION, ""),
            category: raw.pick_str(CATEGORY, ""),
            priority: raw.pick_str(PRIORITY, DEFAULT_PRIORITY),
            status: raw.pick_str(STATUS, IncidentStatus::Open.as_str()),
            unit: raw.pick_ref(UNIT),
            reporter: raw.pick_ref(REPORTER),
            assignee: raw.pick_ref(ASSIGNEE),
            reported_at: raw.pick_opt_str(REPORTED_AT),
            resolved_at: raw.pick_opt_str(RESOLVED_AT),
            evidence_url: raw.pick_opt_str(EVIDENCE),
            notes: raw.pick_str(NOTES, ""),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("titulo", self.title.as_str())
            .set("descripcion", self.description.as_str())
            .set("categoria", self.category.as_str())
            .set("prioridad", self.priority.as_str())
            .set("estado", self.status.as_str())
            .set_ref("unidad", self.unit.as_ref())
            .set_ref("reportado_por", self.reporter.as_ref())
            .set_ref("asignado_a", self.assignee.as_ref())
            .set_opt("fecha_reporte", self.reported_at.clone())
            .set_opt("fecha_resolucion", self.resolved_at.clone())
            .set_opt("evidencia_url", self.evidence_url.clone())
            .set("notas", self.notes.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("El título del incidente es obligatorio".into());
        }
        Ok(())
    }
}
