use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

// ============================================================================
// Aliases
// ============================================================================

const ID: &[&str] = &["id", "uuid", "pk"];
const CODE: &[&str] = &["codigo", "code", "numero"];
const TITLE: &[&str] = &["titulo", "title"];
const DESCRIPTION: &[&str] = &["descripcion", "description"];
const STATUS: &[&str] = &["estado", "status"];
const PRIORITY: &[&str] = &["prioridad", "priority"];
const ASSIGNEE: &[&str] = &["responsable", "assignee", "user", "responsable_id"];
const SERVICE: &[&str] = &["servicio", "service", "servicio_id", "service_id"];
const ASSET: &[&str] = &["equipo", "asset", "equipo_id", "asset_id"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id"];
const AREA: &[&str] = &["area", "area_id", "amenity"];
const SCHEDULED: &[&str] = &["fecha_programada", "scheduled_date", "start_date"];
const DUE: &[&str] = &["fecha_limite", "due_date", "end_date"];
const STARTED: &[&str] = &["fecha_inicio", "started_at"];
const COMPLETED: &[&str] = &["fecha_cierre", "completed_at"];
const RECURRENCE: &[&str] = &["recurrencia", "recurrence"];
const HOURS: &[&str] = &["estimado_horas", "estimated_hours"];
const COST: &[&str] = &["costo_estimado", "estimated_cost"];
const NOTES: &[&str] = &["notas", "notes"];
const ACTIVE: &[&str] = &["activo", "is_active"];

pub const DEFAULT_PRIORITY: &str = "MEDIA";
pub const DEFAULT_RECURRENCE: &str = "NUNCA";

/// Статус задачи обслуживания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDIENTE",
            TaskStatus::InProgress => "EN_PROCESO",
            TaskStatus::Completed => "COMPLETADA",
            TaskStatus::Cancelled => "CANCELADA",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PENDIENTE" => Some(TaskStatus::Pending),
            "EN_PROCESO" => Some(TaskStatus::InProgress),
            "COMPLETADA" => Some(TaskStatus::Completed),
            "CANCELADA" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

/// Задача обслуживания
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaintenanceTask {
    pub id: Option<RecordId>,
    pub code: String,
    pub title: String,
    pub description: String,
    pub status: String,
    /// BAJA | MEDIA | ALTA | CRITICA
    pub priority: String,
    pub assignee: Option<EntityRef>,
    pub service: Option<EntityRef>,
    pub asset: Option<EntityRef>,
    pub unit: Option<EntityRef>,
    pub area: Option<EntityRef>,
    pub scheduled_date: String,
    pub due_date: String,
    pub started_at: String,
    pub completed_at: String,
    /// NUNCA | DIARIA | SEMANAL | MENSUAL
    pub recurrence: String,
    pub estimated_hours: f64,
    pub estimated_cost: f64,
    pub notes: String,
    pub active: bool,
}

impl MaintenanceTask {
    pub fn status(&self) -> Option<TaskStatus> {
        TaskStatus::parse(&self.status)
    }

    pub fn is_completed(&self) -> bool {
        self.status() == Some(TaskStatus::Completed)
    }
}

impl Resource for MaintenanceTask {
    fn resource_index() -> &'static str {
        "a010"
    }

    fn collection_name() -> &'static str {
        "maintenance_tasks"
    }

    fn element_name() -> &'static str {
        "Tarea de mantenimiento"
    }

    fn list_name() -> &'static str {
        "Tareas de mantenimiento"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &[
            "tareas-mantenimiento/",
            "mantenimiento/tareas/",
            "work-orders/tasks/",
            "tasks/",
        ]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(ID),
            code: raw.pick_str(CODE, ""),
            title: raw.pick_str(TITLE, ""),
            description: raw.pick_str(DESCRIPTION, ""),
            status: raw.pick_str(STATUS, TaskStatus::Pending.as_str()),
            priority: raw.pick_str(PRIORITY, DEFAULT_PRIORITY),
            assignee: raw.pick_ref(ASSIGNEE),
            service: raw.pick_ref(SERVICE),
            asset: raw.pick_ref(ASSET),
            unit: raw.pick_ref(UNIT),
            area: raw.pick_ref(AREA),
            scheduled_date: raw.pick_str(SCHEDULED, ""),
            due_date: raw.pick_str(DUE, ""),
            started_at: raw.pick_str(STARTED, ""),
            completed_at: raw.pick_str(COMPLETED, ""),
            recurrence: raw.pick_str(RECURRENCE, DEFAULT_RECURRENCE),
            estimated_hours: raw.pick_f64(HOURS, 0.0),
            estimated_cost: raw.pick_f64(COST, 0.0),
            notes: raw.pick_str(NOTES, ""),
            active: raw.pick_bool(ACTIVE, true),
        }
    }

    // The task endpoint speaks English for most writable fields
    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("codigo", self.code.as_str())
            .set("titulo", self.title.as_str())
            .set("descripcion", self.description.as_str())
            .set("status", self.status.as_str())
            .set("priority", self.priority.as_str())
            .set_ref("responsable", self.assignee.as_ref())
            .set_ref("servicio", self.service.as_ref())
            .set_ref("equipo", self.asset.as_ref())
            .set_ref("unidad", self.unit.as_ref())
            .set_ref("area", self.area.as_ref())
            .set("scheduled_date", self.scheduled_date.as_str())
            .set("due_date", self.due_date.as_str())
            .set("started_at", self.started_at.as_str())
            .set("completed_at", self.completed_at.as_str())
            .set("recurrence", self.recurrence.as_str())
            .set("estimated_hours", self.estimated_hours)
            .set("estimated_cost", self.estimated_cost)
            .set("is_active", self.active)
            .set("notes", self.notes.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("El título es obligatorio".into());
        }
        Ok(())
    }
}
