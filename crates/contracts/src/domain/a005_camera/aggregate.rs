use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

const NAME: &[&str] = &["nombre", "name", "alias"];
const HOST: &[&str] = &["ip", "host", "address"];
const PORT: &[&str] = &["puerto", "port"];
const RTSP_URL: &[&str] = &["rtsp_url", "url_rtsp", "stream", "url"];
const HTTP_URL: &[&str] = &["http_url", "url_http", "snapshot", "jpg"];
const LOCATION: &[&str] = &["ubicacion", "location"];
const ZONE: &[&str] = &["zona", "zone", "zona_id", "zone_id"];
const ACTIVE: &[&str] = &["activa", "active", "is_active"];
const KIND: &[&str] = &["tipo", "type", "modelo", "model"];
const VENDOR: &[&str] = &["fabricante", "vendor", "brand"];
const USERNAME: &[&str] = &["usuario", "username"];

/// Камера видеонаблюдения
///
/// Camera passwords are never read back into the local record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Camera {
    pub id: Option<RecordId>,
    pub name: String,
    pub host: String,
    pub port: Option<i64>,
    pub rtsp_url: String,
    pub http_url: String,
    pub location: String,
    pub zone: Option<EntityRef>,
    pub active: bool,
    pub kind: String,
    pub vendor: String,
    pub username: String,
}

impl Resource for Camera {
    fn resource_index() -> &'static str {
        "a005"
    }

    fn collection_name() -> &'static str {
        "cameras"
    }

    fn element_name() -> &'static str {
        "Cámara"
    }

    fn list_name() -> &'static str {
        "Cámaras"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["camaras/", "cameras/", "security-cameras/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            name: raw.pick_str(NAME, ""),
            host: raw.pick_str(HOST, ""),
            port: raw.pick_opt_i64(PORT),
            rtsp_url: raw.pick_str(RTSP_URL, ""),
            http_url: raw.pick_str(HTTP_URL, ""),
            location: raw.pick_str(LOCATION, ""),
            zone: raw.pick_ref(ZONE),
            active: raw.pick_bool(ACTIVE, true),
            kind: raw.pick_str(KIND, ""),
            vendor: raw.pick_str(VENDOR, ""),
            username: raw.pick_str(USERNAME, ""),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("nombre", self.name.as_str())
            .set("ip", self.host.as_str())
            .set_opt("puerto", self.port)
            .set("rtsp_url", self.rtsp_url.as_str())
            .set("http_url", self.http_url.as_str())
            .set("ubicacion", self.location.as_str())
            .set_ref("zona", self.zone.as_ref())
            .set("activa", self.active)
            .set("tipo", self.kind.as_str())
            .set("fabricante", self.vendor.as_str())
            .set("usuario", self.username.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre de la cámara es obligatorio".into());
        }
        if self.host.trim().is_empty() {
            return Err("La IP / host es obligatoria".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vendor_shape() {
        let raw = RawRecord::from_value(json!({
            "id": 4,
            "alias": "Portería",
            "host": "10.0.0.21",
            "port": "554",
            "stream": "rtsp://10.0.0.21/live",
            "zone_id": 2,
            "is_active": false,
            "brand": "Hikvision"
        }));
        let cam = Camera::from_record(&raw);
        assert_eq!(cam.name, "Portería");
        assert_eq!(cam.port, Some(554));
        assert_eq!(cam.rtsp_url, "rtsp://10.0.0.21/live");
        assert_eq!(cam.zone.map(|z| z.id), Some(RecordId::Int(2)));
        assert!(!cam.active);
        assert_eq!(cam.vendor, "Hikvision");
    }

    #[test]
    fn test_validate_requires_host() {
        let cam = Camera {
            name: "Lobby".into(),
            ..Default::default()
        };
        assert!(cam.validate().is_err());
    }
}
