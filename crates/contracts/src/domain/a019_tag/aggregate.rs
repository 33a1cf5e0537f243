use serde::{Deserialize, Serialize};

use crate::domain::common::{Resource, UpdateMethod};
use crate::shared::field_adapter::{Payload, RawRecord};
use crate::shared::record_id::RecordId;

const NAME: &[&str] = &["nombre", "name"];
const SLUG: &[&str] = &["slug"];
const COLOR: &[&str] = &["color"];
const DESCRIPTION: &[&str] = &["descripcion", "description"];
const ACTIVE: &[&str] = &["activo", "is_active"];
const CREATED_AT: &[&str] = &["created_at"];
const UPDATED_AT: &[&str] = &["updated_at"];

/// Lowercase ASCII slug: accents folded, runs of other characters become `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        let c = match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        };
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Тег для классификации записей
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Tag {
    pub id: Option<RecordId>,
    pub name: String,
    pub slug: String,
    /// `#RRGGBB`
    pub color: String,
    pub description: String,
    pub active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Tag {
    /// The stored slug, or one derived from the name
    pub fn effective_slug(&self) -> String {
        if self.slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            self.slug.clone()
        }
    }
}

impl Resource for Tag {
    fn resource_index() -> &'static str {
        "a019"
    }

    fn collection_name() -> &'static str {
        "tags"
    }

    fn element_name() -> &'static str {
        "Etiqueta"
    }

    fn list_name() -> &'static str {
        "Etiquetas"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["tang/", "etiquetas/", "tags/"]
    }

    fn update_method() -> UpdateMethod {
        UpdateMethod::Patch
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            name: raw.pick_str(NAME, ""),
            slug: raw.pick_str(SLUG, ""),
            color: raw.pick_str(COLOR, ""),
            description: raw.pick_str(DESCRIPTION, ""),
            active: raw.pick_bool(ACTIVE, true),
            created_at: raw.pick_opt_str(CREATED_AT),
            updated_at: raw.pick_opt_str(UPDATED_AT),
        }
    }

    /// Timestamps are server-owned and never sent.
    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("nombre", self.name.as_str())
            .set("slug", self.effective_slug())
            .set("color", self.color.as_str())
            .set("descripcion", self.description.as_str())
            .set("activo", self.active)
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre de la etiqueta es obligatorio".into());
        }
        if !self.color.is_empty() && !is_hex_color(&self.color) {
            return Err("El color debe tener el formato #RRGGBB".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_record() {
        let tag = Tag::from_record(&RawRecord::from_value(json!({
            "uuid": "t-1",
            "name": "Urgente",
            "color": "#FF0000",
            "is_active": false,
            "created_at": "2024-01-01T00:00:00Z"
        })));
        assert_eq!(tag.id, Some(RecordId::Text("t-1".into())));
        assert!(!tag.active);
        let payload = tag.to_payload();
        assert!(!payload.contains("created_at"));
        assert_eq!(payload.get("slug"), Some(&json!("urgente")));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Área Común  #2"), "area-comun-2");
        assert_eq!(slugify("  Niño "), "nino");
        assert_eq!(slugify("!!"), "");
    }

    #[test]
    fn test_validate_color() {
        let mut tag = Tag {
            name: "Ruido".into(),
            color: "red".into(),
            ..Default::default()
        };
        assert!(tag.validate().is_err());
        tag.color = "#a1b2c3".into();
        assert!(tag.validate().is_ok());
    }
}
