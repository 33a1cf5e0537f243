//! Tolerant projection between backend JSON and local record shapes.
//!
//! The backend never settled on key names: a unit reference may arrive as
//! `unidad`, `unit`, `unidad_id`, `unit_id` or a nested `{id, nombre}` object.
//! [`RawRecord`] reads a logical field by walking an ordered alias list and
//! taking the first defined value; [`Payload`] builds the reverse mapping and
//! omits everything that is undefined, `null` or an empty string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record_id::RecordId;

/// Keys tried, in order, to pull an id out of a nested reference object.
const NESTED_ID_KEYS: &[&str] = &["id", "pk", "uuid"];
/// Keys tried, in order, to pull a display label out of a nested reference.
const NESTED_LABEL_KEYS: &[&str] = &["nombre", "name", "label", "numero", "serial", "codigo", "code"];

/// Ссылка на другую запись (unit, zone, resident...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: RecordId,
    /// Present only when the backend nested the referenced object
    pub label: Option<String>,
}

impl EntityRef {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    /// Text to show in a table cell: the label when known, otherwise the id.
    pub fn display(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// A backend record as received, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Non-object values (a stray string, `null`) normalize to an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First alias whose value is present and not `null`.
    pub fn pick(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    pub fn pick_str(&self, aliases: &[&str], default: &str) -> String {
        match self.pick(aliases) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }

    /// Like [`pick_str`](Self::pick_str) but an empty string counts as absent.
    pub fn pick_opt_str(&self, aliases: &[&str]) -> Option<String> {
        let value = self.pick_str(aliases, "");
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Monetary and count fields: JSON numbers and numeric strings parse,
    /// anything else falls back to `default`.
    pub fn pick_f64(&self, aliases: &[&str], default: f64) -> f64 {
        self.pick(aliases).and_then(parse_number).unwrap_or(default)
    }

    pub fn pick_opt_f64(&self, aliases: &[&str]) -> Option<f64> {
        self.pick(aliases).and_then(parse_number)
    }

    pub fn pick_opt_i64(&self, aliases: &[&str]) -> Option<i64> {
        self.pick(aliases).and_then(|value| match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
    }

    pub fn pick_bool(&self, aliases: &[&str], default: bool) -> bool {
        match self.pick(aliases) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    pub fn pick_opt_bool(&self, aliases: &[&str]) -> Option<bool> {
        match self.pick(aliases) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn pick_id(&self, aliases: &[&str]) -> Option<RecordId> {
        self.pick(aliases).and_then(RecordId::from_value)
    }

    /// A reference given either as a bare id or as a nested object.
    pub fn pick_ref(&self, aliases: &[&str]) -> Option<EntityRef> {
        match self.pick(aliases)? {
            Value::Object(nested) => {
                let nested = RawRecord(nested.clone());
                let id = nested.pick_id(NESTED_ID_KEYS)?;
                Some(EntityRef {
                    id,
                    label: nested.pick_opt_str(NESTED_LABEL_KEYS),
                })
            }
            other => RecordId::from_value(other).map(|id| EntityRef { id, label: None }),
        }
    }

    /// Nested object (`usuario_data` and the like)
    pub fn pick_nested(&self, aliases: &[&str]) -> Option<RawRecord> {
        match self.pick(aliases)? {
            Value::Object(map) => Some(RawRecord(map.clone())),
            _ => None,
        }
    }

    /// Nested object list (invoice lines). Non-object entries are skipped.
    pub fn pick_records(&self, aliases: &[&str]) -> Vec<RawRecord> {
        match self.pick(aliases) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(RawRecord(map.clone())),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Id list where each entry may be a number, a numeric string or an
    /// object carrying `id`, `pk`, `permission_id` or `permission.id`.
    pub fn pick_id_list(&self, aliases: &[&str]) -> Vec<RecordId> {
        let Some(Value::Array(items)) = self.pick(aliases) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::Object(map) => {
                    let nested = RawRecord(map.clone());
                    nested
                        .pick_id(&["id", "pk", "permission_id"])
                        .or_else(|| nested.pick_ref(&["permission"]).map(|r| r.id))
                }
                Value::String(s) => Some(RecordId::from(s.trim())),
                other => RecordId::from_value(other),
            })
            .collect()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Payload> for RawRecord {
    fn from(payload: Payload) -> Self {
        Self(payload.into_map())
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Request body under construction.
///
/// Every setter silently skips `null` and empty strings so the backend only
/// receives fields that carry a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let empty = match &value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        if !empty {
            self.0.insert(key.to_string(), value);
        }
        self
    }

    pub fn set_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub fn set_id(self, key: &str, id: Option<&RecordId>) -> Self {
        self.set_opt(key, id.map(RecordId::to_value))
    }

    /// References travel as bare ids; labels are display-only.
    pub fn set_ref(self, key: &str, reference: Option<&EntityRef>) -> Self {
        self.set_id(key, reference.map(|r| &r.id))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
