use serde::{Deserialize, Serialize};

use crate::domain::common::{Resource, UpdateMethod};
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

const TITLE: &[&str] = &["titulo", "title"];
const BODY: &[&str] = &["mensaje", "body", "cuerpo"];
const KIND: &[&str] = &["tipo", "category"];
const PRIORITY: &[&str] = &["prioridad", "priority"];
const CHANNEL: &[&str] = &["canal", "channel"];
const STATUS: &[&str] = &["estado", "status"];
const READ: &[&str] = &["leida", "read"];
const RECIPIENT: &[&str] = &["destinatario", "to", "user", "unidad"];
const RECIPIENT_KIND: &[&str] = &["destinatario_tipo", "to_type", "scope"];
const SCHEDULED: &[&str] = &["programada", "scheduled"];
const SCHEDULED_AT: &[&str] = &["fecha_programada", "scheduled_at"];
const SENT_AT: &[&str] = &["fecha_envio", "sent_at"];

pub const STATUS_READ: &str = "LEIDA";
pub const STATUS_UNREAD: &str = "NO_LEIDA";

/// Приоритет уведомления (UI: BAJA..CRITICA, бэкенд: low..critical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Critical,
}

impl NotificationPriority {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationPriority::Low => "BAJA",
            NotificationPriority::Normal => "NORMAL",
            NotificationPriority::High => "ALTA",
            NotificationPriority::Critical => "CRITICA",
        }
    }

    pub fn wire(&self) -> &'static str {
        match self {
            NotificationPriority::Low => "low",
            NotificationPriority::Normal => "normal",
            NotificationPriority::High => "high",
            NotificationPriority::Critical => "critical",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "BAJA" => Some(NotificationPriority::Low),
            "NORMAL" => Some(NotificationPriority::Normal),
            "ALTA" => Some(NotificationPriority::High),
            "CRITICA" => Some(NotificationPriority::Critical),
            _ => None,
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(NotificationPriority::Low),
            "normal" => Some(NotificationPriority::Normal),
            "high" => Some(NotificationPriority::High),
            "critical" => Some(NotificationPriority::Critical),
            _ => None,
        }
    }
}

/// Канал доставки (UI: PUSH | EMAIL | SMS, бэкенд: inapp | email | sms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Push,
    Email,
    Sms,
}

impl Channel {
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Push => "PUSH",
            Channel::Email => "EMAIL",
            Channel::Sms => "SMS",
        }
    }

    pub fn wire(&self) -> &'static str {
        match self {
            Channel::Push => "inapp",
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

/// Backend priority to the UI label; unknown values pass through.
fn priority_label(wire: &str) -> String {
    NotificationPriority::from_wire(wire)
        .map(|p| p.label().to_string())
        .unwrap_or_else(|| wire.to_string())
}

/// UI channel to the backend value; unknown values are sent lowercased.
fn channel_wire(label: &str) -> String {
    match label.trim().to_uppercase().as_str() {
        "PUSH" => Channel::Push.wire().to_string(),
        "EMAIL" => Channel::Email.wire().to_string(),
        "SMS" => Channel::Sms.wire().to_string(),
        _ => label.to_lowercase(),
    }
}

fn channel_label(wire: &str) -> String {
    match wire.trim().to_lowercase().as_str() {
        "inapp" => Channel::Push.label().to_string(),
        "email" => Channel::Email.label().to_string(),
        "sms" => Channel::Sms.label().to_string(),
        _ => wire.to_uppercase(),
    }
}

pub fn read_status(read: bool) -> &'static str {
    if read {
        STATUS_READ
    } else {
        STATUS_UNREAD
    }
}

/// Уведомление
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Notification {
    pub id: Option<RecordId>,
    pub title: String,
    pub body: String,
    pub kind: String,
    /// UI label (BAJA, NORMAL, ALTA, CRITICA)
    pub priority: String,
    /// UI label (PUSH, EMAIL, SMS)
    pub channel: String,
    pub status: String,
    pub read: bool,
    pub recipient: Option<EntityRef>,
    pub recipient_kind: String,
    pub scheduled: bool,
    pub scheduled_at: Option<String>,
    pub sent_at: Option<String>,
}

impl Resource for Notification {
    fn resource_index() -> &'static str {
        "a014"
    }

    fn collection_name() -> &'static str {
        "notifications"
    }

    fn element_name() -> &'static str {
        "Notificación"
    }

    fn list_name() -> &'static str {
        "Notificaciones"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["notificaciones/", "notifications/"]
    }

    fn update_method() -> UpdateMethod {
        UpdateMethod::Patch
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        let status = raw.pick_opt_str(STATUS);
        let read = raw
            .pick_opt_bool(READ)
            .unwrap_or_else(|| status.as_deref() == Some(STATUS_READ));
        let scheduled_at = raw.pick_opt_str(SCHEDULED_AT);
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            title: raw.pick_str(TITLE, "-"),
            body: raw.pick_str(BODY, ""),
            kind: raw.pick_str(KIND, ""),
            priority: priority_label(&raw.pick_str(PRIORITY, "")),
            channel: channel_label(&raw.pick_str(CHANNEL, "")),
            status: status.unwrap_or_else(|| read_status(read).to_string()),
            read,
            recipient: raw.pick_ref(RECIPIENT),
            recipient_kind: raw.pick_str(RECIPIENT_KIND, ""),
            scheduled: raw.pick_opt_bool(SCHEDULED).unwrap_or(scheduled_at.is_some()),
            scheduled_at,
            sent_at: raw.pick_opt_str(SENT_AT),
        }
    }

    /// The backend calls the body `cuerpo`; unknown priorities are left out.
    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("titulo", self.title.as_str())
            .set("cuerpo", self.body.as_str())
            .set("tipo", self.kind.as_str())
            .set_opt("prioridad", NotificationPriority::from_label(&self.priority).map(|p| p.wire()))
            .set("canal", channel_wire(&self.channel))
            .set("estado", self.status.as_str())
            .set("leida", self.read)
            .set_ref("destinatario", self.recipient.as_ref())
            .set("destinatario_tipo", self.recipient_kind.as_str())
            .set("programada", self.scheduled)
            .set_opt("fecha_programada", self.scheduled_at.clone())
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.title == "-" {
            return Err("El título es obligatorio".into());
        }
        if self.scheduled && self.scheduled_at.is_none() {
            return Err("Indique la fecha programada".into());
        }
        Ok(())
    }
}
