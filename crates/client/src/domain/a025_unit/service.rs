use contracts::domain::a025_unit::Unit;
use contracts::shared::{EntityRef, ListQuery};

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

/// Page size for unit pickers
pub const OPTIONS_PAGE_SIZE: u32 = 20;

#[derive(Clone)]
pub struct UnitService {
    client: ResourceClient<Unit>,
}

impl UnitService {
    pub fn new(client: ResourceClient<Unit>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResourceClient<Unit> {
        &self.client
    }

    /// `{id, label}` options for unit pickers, filtered by `search`
    pub async fn options(&self, search: &str) -> Result<Vec<EntityRef>, ApiError> {
        let query = ListQuery::new()
            .page_size(OPTIONS_PAGE_SIZE)
            .filter("search", search.trim());
        let page = self.client.list(&query).await?;
        Ok(page.results.iter().filter_map(Unit::as_ref_option).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::fake::FakeTransport;
    use crate::shared::http::Method;
    use crate::shared::resource_client::test_support::client;
    use contracts::shared::RecordId;
    use serde_json::json;

    #[tokio::test]
    async fn test_options_label_and_search() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "unidades/",
            200,
            json!({"count": 3, "results": [
                {"uuid": "u-1", "nombre": "Depto 101", "codigo": "A-101"},
                {"id": 2, "codigo": "A-102"},
                {"codigo": "sin-id"}
            ]}),
        );
        let units = UnitService::new(client::<Unit>(&fake).await);

        let options = units.options(" A-1 ").await.unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].id, RecordId::from("u-1"));
        assert_eq!(options[0].label.as_deref(), Some("Depto 101"));
        assert_eq!(options[1].label.as_deref(), Some("A-102"));

        let call = fake.last(Method::Get, "unidades/").unwrap();
        assert!(call.query.contains(&("search".to_string(), "A-1".to_string())));
        assert!(call.query.contains(&("page_size".to_string(), "20".to_string())));
    }
}
