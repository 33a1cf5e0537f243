//! Paginated list requests and responses.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field_adapter::RawRecord;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Page size used when walking every page for an export
pub const EXPORT_PAGE_SIZE: u32 = 500;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Значение фильтра списка
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    /// Rendered as `<name>_desde` / `<name>_hasta`
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    List(Vec<String>),
}

impl FilterValue {
    fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.trim().is_empty(),
            FilterValue::DateRange { from, to } => from.is_none() && to.is_none(),
            FilterValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    fn push_pairs(&self, name: &str, out: &mut Vec<(String, String)>) {
        match self {
            FilterValue::Text(s) => out.push((name.to_string(), s.trim().to_string())),
            FilterValue::Number(n) => out.push((name.to_string(), format_number(*n))),
            FilterValue::Bool(b) => out.push((name.to_string(), b.to_string())),
            FilterValue::Date(d) => out.push((name.to_string(), d.format(DATE_FORMAT).to_string())),
            FilterValue::DateRange { from, to } => {
                if let Some(from) = from {
                    out.push((format!("{}_desde", name), from.format(DATE_FORMAT).to_string()));
                }
                if let Some(to) = to {
                    out.push((format!("{}_hasta", name), to.format(DATE_FORMAT).to_string()));
                }
            }
            FilterValue::List(items) => {
                for item in items {
                    out.push((name.to_string(), item.clone()));
                }
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value as f64)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        FilterValue::Date(value)
    }
}

/// Sort field, `-` prefix for descending (`-id`, `nombre`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Returns `None` for an empty spec (`""` or a lone `-`).
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let (descending, field) = match spec.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    pub fn to_param(&self) -> String {
        if self.descending {
            format!("-{}", self.field)
        } else {
            self.field.clone()
        }
    }

    /// Same field flips direction, another field starts ascending.
    pub fn toggled(current: Option<&SortSpec>, field: &str) -> SortSpec {
        match current {
            Some(spec) if spec.field == field => SortSpec {
                field: field.to_string(),
                descending: !spec.descending,
            },
            _ => SortSpec::asc(field),
        }
    }
}

/// Параметры запроса страницы списка
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: BTreeMap<String, FilterValue>,
    pub sort: Option<SortSpec>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            filters: BTreeMap::new(),
            sort: None,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn filter(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Query-string pairs in a stable order: paging, ordering, then filters
    /// by name. Empty filters are left out.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.max(1).to_string()),
            ("page_size".to_string(), self.page_size.max(1).to_string()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push(("ordering".to_string(), sort.to_param()));
        }
        for (name, value) in &self.filters {
            if !value.is_empty() {
                value.push_pairs(name, &mut pairs);
            }
        }
        pairs
    }
}

/// Страница результатов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Backend total when supplied, otherwise the length of `results`
    pub count: u64,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    pub fn total_pages(&self, page_size: u32) -> u32 {
        let page_size = u64::from(page_size.max(1));
        (self.count.div_ceil(page_size)).max(1) as u32
    }
}

impl Page<RawRecord> {
    /// Accepts `{count, results}` as well as a bare array.
    pub fn from_response(body: Value) -> Self {
        match body {
            Value::Array(items) => {
                let results: Vec<RawRecord> = items.into_iter().map(RawRecord::from_value).collect();
                Page {
                    count: results.len() as u64,
                    results,
                }
            }
            Value::Object(mut map) => {
                let results: Vec<RawRecord> = match map.remove("results") {
                    Some(Value::Array(items)) => {
                        items.into_iter().map(RawRecord::from_value).collect()
                    }
                    _ => Vec::new(),
                };
                let count = map
                    .get("count")
                    .and_then(Value::as_u64)
                    .unwrap_or(results.len() as u64);
                Page { count, results }
            }
            _ => Page::default(),
        }
    }
}

/// Page to reload after deleting a record: step back once the last row of a
/// non-first page is gone.
pub fn page_after_delete(current_page: u32, rows_on_page: usize) -> u32 {
    if rows_on_page <= 1 && current_page > 1 {
        current_page - 1
    } else {
        current_page.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_query_pairs() {
        let pairs = ListQuery::new().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "1".to_string()),
                ("page_size".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn test_query_encoding_filters_and_sort() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let query = ListQuery::new()
            .page(2)
            .page_size(25)
            .sort(SortSpec::parse("-id").unwrap())
            .filter("search", "  torre ")
            .filter("estado", "")
            .filter("activo", true)
            .filter("unidad", 7i64)
            .filter(
                "fecha",
                FilterValue::DateRange {
                    from: Some(from),
                    to: None,
                },
            );
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("page".into(), "2".into())));
        assert!(pairs.contains(&("page_size".into(), "25".into())));
        assert!(pairs.contains(&("ordering".into(), "-id".into())));
        assert!(pairs.contains(&("search".into(), "torre".into())));
        assert!(pairs.contains(&("activo".into(), "true".into())));
        assert!(pairs.contains(&("unidad".into(), "7".into())));
        assert!(pairs.contains(&("fecha_desde".into(), "2024-03-01".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "estado" || k == "fecha_hasta"));
    }

    #[test]
    fn test_page_zero_is_clamped() {
        let query = ListQuery::new().page(0).page_size(0);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 1);
    }

    #[test]
    fn test_sort_spec() {
        assert_eq!(SortSpec::parse("nombre"), Some(SortSpec::asc("nombre")));
        assert_eq!(SortSpec::parse("-fecha"), Some(SortSpec::desc("fecha")));
        assert_eq!(SortSpec::parse("-"), None);
        let current = SortSpec::asc("nombre");
        assert_eq!(SortSpec::toggled(Some(&current), "nombre"), SortSpec::desc("nombre"));
        assert_eq!(SortSpec::toggled(Some(&current), "id"), SortSpec::asc("id"));
    }

    #[test]
    fn test_page_from_envelope() {
        let page = Page::from_response(json!({"count": 42, "results": [{"id": 1}, {"id": 2}]}));
        assert_eq!(page.count, 42);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.total_pages(10), 5);
    }

    #[test]
    fn test_page_from_bare_array_and_missing_count() {
        let page = Page::from_response(json!([{"id": 1}, {"id": 2}, {"id": 3}]));
        assert_eq!(page.count, 3);

        let page = Page::from_response(json!({"results": [{"id": 1}]}));
        assert_eq!(page.count, 1);

        let page = Page::from_response(json!("unexpected"));
        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages(10), 1);
    }

    #[test]
    fn test_page_after_delete() {
        assert_eq!(page_after_delete(3, 1), 2);
        assert_eq!(page_after_delete(3, 4), 3);
        assert_eq!(page_after_delete(1, 1), 1);
    }
}
