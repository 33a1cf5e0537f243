use std::marker::PhantomData;
use std::sync::Arc;

use contracts::domain::common::{Resource, ResourceEndpoint, UpdateMethod};
use contracts::shared::pagination::EXPORT_PAGE_SIZE;
use contracts::shared::{ListQuery, Page, Payload, RawRecord, RecordId};
use serde_json::Value;

use crate::shared::api_client::ApiClient;
use crate::shared::discovery::EndpointResolver;
use crate::shared::error::ApiError;

/// CRUD over one REST collection, typed by its record shape.
pub struct ResourceClient<R: Resource> {
    api: ApiClient,
    resolver: Arc<EndpointResolver>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            resolver: self.resolver.clone(),
            _record: PhantomData,
        }
    }
}

/// Errors after which the next fallback route is worth trying: the backend
/// answered, just not on this route.
pub fn try_next_route(err: &ApiError) -> bool {
    matches!(err, ApiError::Status { status, .. } if *status != 401)
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient, resolver: Arc<EndpointResolver>) -> Self {
        Self {
            api,
            resolver,
            _record: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Collection path, discovered on first use
    pub async fn base_path(&self) -> Result<String, ApiError> {
        self.resolver.resolve(&ResourceEndpoint::of::<R>()).await
    }

    pub async fn element_path(&self, id: &RecordId) -> Result<String, ApiError> {
        let base = self.base_path().await?;
        Ok(format!("{}{}/", base, urlencoding::encode(&id.to_string())))
    }

    async fn action_path(&self, id: &RecordId, action: &str) -> Result<String, ApiError> {
        let element = self.element_path(id).await?;
        Ok(format!("{}{}/", element, action.trim_matches('/')))
    }

    // ============================================================================
    // Чтение
    // ============================================================================

    pub async fn list(&self, query: &ListQuery) -> Result<Page<R>, ApiError> {
        let base = self.base_path().await?;
        let body = self.api.get_json(&base, &query.to_query_pairs()).await?;
        let page = Page::from_response(body).map(|raw| R::from_record(&raw));
        tracing::debug!(
            "{}: page {} -> {} of {} records",
            R::collection_name(),
            query.page,
            page.results.len(),
            page.count
        );
        Ok(page)
    }

    pub async fn get(&self, id: &RecordId) -> Result<R, ApiError> {
        let path = self.element_path(id).await?;
        let body = self.api.get_json(&path, &[]).await?;
        Ok(R::from_record(&RawRecord::from_value(body)))
    }

    /// Every record under the query's filters and sort, walking pages of
    /// [`EXPORT_PAGE_SIZE`] until the total is reached or a page is empty.
    pub async fn fetch_all(&self, query: &ListQuery) -> Result<Vec<R>, ApiError> {
        let mut query = query.clone().page_size(EXPORT_PAGE_SIZE).page(1);
        let mut all = Vec::new();
        loop {
            let page = self.list(&query).await?;
            if page.results.is_empty() {
                break;
            }
            all.extend(page.results);
            if all.len() as u64 >= page.count {
                break;
            }
            query.page += 1;
        }
        tracing::info!("{}: fetched {} records", R::collection_name(), all.len());
        Ok(all)
    }

    // ============================================================================
    // Изменение
    // ============================================================================

    pub async fn create(&self, record: &R) -> Result<R, ApiError> {
        let base = self.base_path().await?;
        let body = self
            .api
            .post_json(&base, Some(&record.to_payload().into_value()))
            .await?;
        tracing::info!("{}: created", R::collection_name());
        Ok(saved_or(body, record))
    }

    pub async fn update(&self, record: &R) -> Result<R, ApiError> {
        let id = record
            .id()
            .ok_or_else(|| ApiError::Validation(format!("{} has no id", R::element_name())))?;
        let path = self.element_path(id).await?;
        let payload = record.to_payload().into_value();
        let body = match R::update_method() {
            UpdateMethod::Put => self.api.put_json(&path, &payload).await?,
            UpdateMethod::Patch => self.api.patch_json(&path, &payload).await?,
        };
        tracing::info!("{}: updated {}", R::collection_name(), id);
        Ok(saved_or(body, record))
    }

    /// Create when the record has no id yet, update otherwise
    pub async fn save(&self, record: &R) -> Result<R, ApiError> {
        match record.id() {
            Some(_) => self.update(record).await,
            None => self.create(record).await,
        }
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        let path = self.element_path(id).await?;
        self.api.delete(&path).await?;
        tracing::info!("{}: deleted {}", R::collection_name(), id);
        Ok(())
    }

    /// PATCH a handful of fields (status changes, check-in times...)
    pub async fn patch_fields(&self, id: &RecordId, fields: Payload) -> Result<Value, ApiError> {
        let path = self.element_path(id).await?;
        self.api.patch_json(&path, &fields.into_value()).await
    }

    /// POST to `{id}/{action}/`
    pub async fn post_action(&self, id: &RecordId, action: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let path = self.action_path(id, action).await?;
        self.api.post_json(&path, body).await
    }

    pub async fn get_action(&self, id: &RecordId, action: &str) -> Result<Value, ApiError> {
        let path = self.action_path(id, action).await?;
        self.api.get_json(&path, &[]).await
    }

    /// Binary GET of `{id}/{suffix}/`, trying each suffix in turn.
    pub async fn download(&self, id: &RecordId, suffixes: &[&str]) -> Result<Vec<u8>, ApiError> {
        let mut last_err = ApiError::Validation("no download route".into());
        for suffix in suffixes {
            let path = self.action_path(id, suffix).await?;
            match self.api.get_bytes(&path, &[]).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if try_next_route(&e) => {
                    tracing::debug!("Download {} failed: {}", path, e);
                    last_err = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }
}

/// Backends that answer 204 (or `{}`) keep the submitted record.
fn saved_or<R: Resource>(body: Value, submitted: &R) -> R {
    match body {
        Value::Object(ref map) if !map.is_empty() => R::from_record(&RawRecord::from_value(body)),
        _ => submitted.clone(),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::client;
    use super::*;
    use crate::shared::http::fake::FakeTransport;
    use crate::shared::http::Method;
    use contracts::domain::a001_user::User;
    use contracts::domain::a006_zone::Zone;
    use contracts::domain::a009_fine::Fine;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_normalizes_and_encodes_query() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "zonas/",
            200,
            json!({"count": 12, "results": [{"id": 1, "nombre": "Piscina"}, {"pk": 2, "name": "Gimnasio"}]}),
        );
        let zones = client::<Zone>(&fake).await;

        let query = ListQuery::new().page(2).filter("search", "pis");
        let page = zones.list(&query).await.unwrap();
        assert_eq!(page.count, 12);
        assert_eq!(page.results[0].name, "Piscina");
        assert_eq!(page.results[1].id, Some(RecordId::Int(2)));
        assert_eq!(page.results[1].name, "Gimnasio");

        let call = fake.last(Method::Get, "zonas/").unwrap();
        assert!(call.query.contains(&("page".into(), "2".into())));
        assert!(call.query.contains(&("search".into(), "pis".into())));
    }

    #[tokio::test]
    async fn test_list_failure_is_recoverable_error() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "zonas/", 500, json!("boom"));
        let zones = client::<Zone>(&fake).await;
        let err = zones.list(&ListQuery::new()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        // no retry
        assert_eq!(fake.count(Method::Get, "zonas/"), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_walks_pages() {
        let fake = FakeTransport::new();
        let first: Vec<Value> = (1..=500).map(|i| json!({"id": i, "nombre": "z"})).collect();
        fake.on(Method::Get, "zonas/", 200, json!({"count": 502, "results": first}));
        fake.on(Method::Get, "zonas/", 200, json!({"count": 502, "results": [{"id": 501}, {"id": 502}]}));
        let zones = client::<Zone>(&fake).await;

        let all = zones.fetch_all(&ListQuery::new().page(3)).await.unwrap();
        assert_eq!(all.len(), 502);
        let pages: Vec<String> = fake
            .calls()
            .iter()
            .filter_map(|c| c.query.iter().find(|(k, _)| k == "page").map(|(_, v)| v.clone()))
            .collect();
        assert_eq!(pages, vec!["1", "2"]);
        let call = fake.last(Method::Get, "zonas/").unwrap();
        assert!(call.query.contains(&("page_size".into(), "500".into())));
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_empty_page() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "zonas/", 200, json!({"count": 10, "results": [{"id": 1}]}));
        fake.on(Method::Get, "zonas/", 200, json!({"count": 10, "results": []}));
        let zones = client::<Zone>(&fake).await;
        assert_eq!(zones.fetch_all(&ListQuery::new()).await.unwrap().len(), 1);
        assert_eq!(fake.count(Method::Get, "zonas/"), 2);
    }

    #[tokio::test]
    async fn test_update_uses_resource_method_and_encodes_id() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Patch,
            "users/a%20b/",
            200,
            json!({"id": "a b", "username": "ana", "first_name": "Ana"}),
        );
        let users = client::<User>(&fake).await;

        let mut user = User::from_record(&RawRecord::from_value(json!({"id": "a b", "username": "ana"})));
        user.first_name = "Ana".into();
        let saved = users.update(&user).await.unwrap();
        assert_eq!(saved.first_name, "Ana");
        assert_eq!(fake.log(), vec!["PATCH users/a%20b/"]);
        let body = fake.last(Method::Patch, "users/a%20b/").and_then(|c| c.body).unwrap();
        assert_eq!(body["first_name"], json!("Ana"));
    }

    #[tokio::test]
    async fn test_create_keeps_record_on_empty_response() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "zonas/", 201, Value::Null);
        let zones = client::<Zone>(&fake).await;
        let zone = Zone::from_record(&RawRecord::from_value(json!({"nombre": "Quincho", "descripcion": ""})));

        let saved = zones.save(&zone).await.unwrap();
        assert_eq!(saved.name, "Quincho");
        let body = fake.last(Method::Post, "zonas/").and_then(|c| c.body).unwrap();
        assert_eq!(body["nombre"], json!("Quincho"));
        assert!(body.get("descripcion").is_none());
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected_locally() {
        let fake = FakeTransport::new();
        let zones = client::<Zone>(&fake).await;
        let zone = Zone::from_record(&RawRecord::from_value(json!({"nombre": "Quincho"})));
        assert!(matches!(zones.update(&zone).await, Err(ApiError::Validation(_))));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_download_tries_suffixes_in_order() {
        let fake = FakeTransport::new();
        fake.on_bytes(Method::Get, "multas/4/print/", 200, b"%PDF-1.4".to_vec());
        let fines = client::<Fine>(&fake).await;

        let bytes = fines.download(&RecordId::Int(4), &["pdf", "print"]).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4");
        assert_eq!(fake.log(), vec!["GET multas/4/pdf/", "GET multas/4/print/"]);
    }

    #[tokio::test]
    async fn test_delete_hits_element_path() {
        let fake = FakeTransport::new();
        fake.on(Method::Delete, "multas/9/", 204, Value::Null);
        let fines = client::<Fine>(&fake).await;
        fines.delete(&RecordId::Int(9)).await.unwrap();
        assert_eq!(fake.log(), vec!["DELETE multas/9/"]);
    }
}
