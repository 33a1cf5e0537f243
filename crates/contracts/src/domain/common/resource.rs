use crate::shared::field_adapter::{Payload, RawRecord};
use crate::shared::record_id::RecordId;

/// HTTP verb used to save an edited record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    /// Full replacement
    Put,
    /// Partial update
    Patch,
}

/// Трейт для ресурса REST API
///
/// Ties a local record shape to its remote collection: where it may live,
/// how it is read from a backend record and how it is written back.
pub trait Resource: Clone + Send + Sync + 'static {
    // ============================================================================
    // Метаданные ресурса (статические данные)
    // ============================================================================

    /// Index of the resource in the system (e.g. "a004")
    fn resource_index() -> &'static str;

    /// Stable key for discovery caching and configuration (e.g. "visits")
    fn collection_name() -> &'static str;

    /// Singular UI name
    fn element_name() -> &'static str;

    /// Plural UI name
    fn list_name() -> &'static str;

    /// Collection paths to try, most likely first. Each ends with `/`.
    fn candidate_paths() -> &'static [&'static str];

    /// Query sent when trying a candidate path
    fn lookup_params() -> &'static [(&'static str, &'static str)] {
        &[("page", "1")]
    }

    fn update_method() -> UpdateMethod {
        UpdateMethod::Put
    }

    // ============================================================================
    // Методы экземпляра
    // ============================================================================

    fn id(&self) -> Option<&RecordId>;

    /// Normalize a backend record. Never fails: missing fields take defaults.
    fn from_record(raw: &RawRecord) -> Self;

    /// Reverse mapping to the request body
    fn to_payload(&self) -> Payload;

    /// Required-field checks run before submitting a form
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Where a collection may live and how to look it up. Reports have no record
/// type of their own, so discovery works on this rather than on [`Resource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceEndpoint {
    pub collection: &'static str,
    pub candidates: &'static [&'static str],
    pub lookup_params: &'static [(&'static str, &'static str)],
}

impl ResourceEndpoint {
    pub fn of<R: Resource>() -> Self {
        Self {
            collection: R::collection_name(),
            candidates: R::candidate_paths(),
            lookup_params: R::lookup_params(),
        }
    }

    /// Path used when no candidate answers
    pub fn fallback(&self) -> &'static str {
        self.candidates.first().copied().unwrap_or("")
    }
}
