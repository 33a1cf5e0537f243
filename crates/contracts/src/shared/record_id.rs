use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Идентификатор записи на бэкенде
///
/// The backend hands out integer primary keys for most collections and UUID
/// strings for a few (users in particular), so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Read an id out of a JSON value. Empty strings and non-scalar values
    /// are not ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) if !s.trim().is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Text(s) => Value::from(s.as_str()),
        }
    }

    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

/// Only a canonical integer (`"42"`, not `"007"` or `"+7"`) becomes `Int`, so
/// the id prints back exactly as given.
impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(n) if n.to_string() == value => RecordId::Int(n),
            _ => RecordId::Text(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        assert_eq!(RecordId::from_value(&json!(7)), Some(RecordId::Int(7)));
        assert_eq!(
            RecordId::from_value(&json!("3f2b")),
            Some(RecordId::Text("3f2b".into()))
        );
        assert_eq!(RecordId::from_value(&json!("")), None);
        assert_eq!(RecordId::from_value(&json!(null)), None);
        assert_eq!(RecordId::from_value(&json!({"id": 1})), None);
    }

    #[test]
    fn test_from_str_prefers_integer() {
        assert_eq!(RecordId::from("42"), RecordId::Int(42));
        assert_eq!(RecordId::from("abc-1"), RecordId::Text("abc-1".into()));
        assert_eq!(RecordId::Int(42).to_string(), "42");
        assert_eq!(RecordId::from("-3"), RecordId::Int(-3));
    }

    #[test]
    fn test_from_str_keeps_leading_zeros() {
        assert_eq!(RecordId::from("007"), RecordId::Text("007".into()));
        assert_eq!(RecordId::from("007").to_string(), "007");
        assert_eq!(RecordId::from("+7"), RecordId::Text("+7".into()));
        assert_eq!(RecordId::from("0"), RecordId::Int(0));
    }
}
