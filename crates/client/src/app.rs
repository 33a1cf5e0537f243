//! Wiring of transport, session, discovery and export for one backend.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use contracts::domain::a001_user::User;
use contracts::domain::a002_role::Role;
use contracts::domain::a003_permission::Permission;
use contracts::domain::a004_visit::{self, Visit};
use contracts::domain::a005_camera::Camera;
use contracts::domain::a006_zone::Zone;
use contracts::domain::a007_invoice::Invoice;
use contracts::domain::a008_payment::{self, Payment};
use contracts::domain::a009_fine::Fine;
use contracts::domain::a010_maintenance_task::MaintenanceTask;
use contracts::domain::a011_log_entry::{self, LogEntry};
use contracts::domain::a012_report::ReportQuery;
use contracts::domain::a013_incident::Incident;
use contracts::domain::a014_notification::Notification;
use contracts::domain::a015_repair::Repair;
use contracts::domain::a016_expense_audit::ExpenseAudit;
use contracts::domain::a017_staff::StaffMember;
use contracts::domain::a018_service::Service;
use contracts::domain::a019_tag::Tag;
use contracts::domain::a020_common_area::CommonArea;
use contracts::domain::a021_resident::Resident;
use contracts::domain::a022_owner::Owner;
use contracts::domain::a023_tenant::Tenant;
use contracts::domain::a024_vehicle::Vehicle;
use contracts::domain::a025_unit::Unit;
use contracts::domain::common::Resource;
use contracts::shared::csv_export::CsvExportable;
use contracts::shared::{ListQuery, RecordId};
use serde_json::{json, Value};

use crate::domain::a007_invoice::service::InvoiceService;
use crate::domain::a026_access_event::service::FaceRecognitionService;
use crate::shared::config::{resolve_path, Config, FacialConfig};
use crate::shared::export::{timestamped_name, Exporter};
use crate::shared::http::Transport;
use crate::shared::{ApiClient, ApiError, EndpointResolver, ResourceClient};
use crate::system::auth::{Session, TokenStorage};

/// Runs `$body` with `$ty` bound to the record type of a collection name.
macro_rules! with_resource {
    ($collection:expr, $ty:ident => $body:expr) => {
        match $collection {
            "users" => { type $ty = User; $body }
            "roles" => { type $ty = Role; $body }
            "permissions" => { type $ty = Permission; $body }
            "visits" => { type $ty = Visit; $body }
            "cameras" => { type $ty = Camera; $body }
            "zones" => { type $ty = Zone; $body }
            "invoices" => { type $ty = Invoice; $body }
            "payments" => { type $ty = Payment; $body }
            "fines" => { type $ty = Fine; $body }
            "maintenance_tasks" => { type $ty = MaintenanceTask; $body }
            "logs" => { type $ty = LogEntry; $body }
            "incidents" => { type $ty = Incident; $body }
            "notifications" => { type $ty = Notification; $body }
            "repairs" => { type $ty = Repair; $body }
            "expense_audits" => { type $ty = ExpenseAudit; $body }
            "staff" => { type $ty = StaffMember; $body }
            "services" => { type $ty = Service; $body }
            "tags" => { type $ty = Tag; $body }
            "common_areas" => { type $ty = CommonArea; $body }
            "residents" => { type $ty = Resident; $body }
            "owners" => { type $ty = Owner; $body }
            "tenants" => { type $ty = Tenant; $body }
            "vehicles" => { type $ty = Vehicle; $body }
            "units" => { type $ty = Unit; $body }
            other => Err(ApiError::Validation(format!("Recurso desconocido: {}", other))),
        }
    };
}

pub struct App {
    api: ApiClient,
    resolver: Arc<EndpointResolver>,
    exporter: Exporter,
    facial: FacialConfig,
}

impl App {
    pub fn new(config: &Config, transport: Arc<dyn Transport>, storage: Arc<dyn TokenStorage>) -> Self {
        let session = Arc::new(Session::new(
            transport.clone(),
            &config.api.base_url,
            config.auth.clone(),
            storage,
        ));
        let api = ApiClient::new(transport, &config.api.base_url, session);
        let resolver = Arc::new(EndpointResolver::new(
            api.clone(),
            config.resources.clone(),
            &config.discovery,
        ));
        Self {
            api,
            resolver,
            exporter: Exporter::new(resolve_path(&config.export.directory)),
            facial: config.facial.clone(),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.api.session()
    }

    pub fn resolver(&self) -> &Arc<EndpointResolver> {
        &self.resolver
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    pub fn client<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient::new(self.api.clone(), self.resolver.clone())
    }

    pub fn faces(&self) -> FaceRecognitionService {
        FaceRecognitionService::new(self.api.clone(), self.facial.clone())
    }

    /// One page of any collection as `{"count": n, "results": [...]}`
    pub async fn list_json(&self, collection: &str, query: &ListQuery) -> Result<Value, ApiError> {
        with_resource!(collection, R => {
            let page = self.client::<R>().list(query).await?;
            let results: Vec<Value> = page
                .results
                .iter()
                .map(|r| {
                    let mut body = r.to_payload().into_value();
                    if let (Some(id), Some(map)) = (r.id(), body.as_object_mut()) {
                        map.insert("id".to_string(), id.to_value());
                    }
                    body
                })
                .collect();
            Ok(json!({ "count": page.count, "results": results }))
        })
    }

    pub async fn delete(&self, collection: &str, id: &RecordId) -> Result<(), ApiError> {
        with_resource!(collection, R => self.client::<R>().delete(id).await)
    }

    /// CSV of every record in `collection`, for the collections that have an
    /// export layout. The log is exported over its whole history; use
    /// [`export_logs`](Self::export_logs) for a date range.
    pub async fn export_csv(&self, collection: &str, now: NaiveDateTime) -> Result<PathBuf, ApiError> {
        match collection {
            "visits" => {
                let name = timestamped_name(a004_visit::export::EXPORT_FILE_PREFIX, "csv", now);
                self.export_all::<Visit>(&ListQuery::new(), &name).await
            }
            "payments" => {
                let name = timestamped_name(a008_payment::export::EXPORT_FILE_PREFIX, "csv", now);
                self.export_all::<Payment>(&ListQuery::new(), &name).await
            }
            "logs" => self.export_logs(&ReportQuery::default()).await,
            other => Err(ApiError::Validation(format!("Sin exportación CSV para {}", other))),
        }
    }

    /// Log entries between `range.from` and `range.to` (`desde`/`hasta`
    /// filters) into `bitacora_<from>-<to>.csv`.
    pub async fn export_logs(&self, range: &ReportQuery) -> Result<PathBuf, ApiError> {
        let query = range
            .range_pairs()
            .into_iter()
            .fold(ListQuery::new(), |q, (name, value)| q.filter(name, value));
        let name = a011_log_entry::export::range_file_name(range);
        self.export_all::<LogEntry>(&query, &name).await
    }

    async fn export_all<R>(&self, query: &ListQuery, file_name: &str) -> Result<PathBuf, ApiError>
    where
        R: Resource + CsvExportable,
    {
        let rows = self.client::<R>().fetch_all(query).await?;
        tracing::info!("Exporting {} {}", rows.len(), R::list_name());
        self.exporter.write_csv(file_name, &rows).await
    }

    /// Download the printable invoice into the export directory.
    pub async fn save_invoice_pdf(&self, id: &RecordId) -> Result<PathBuf, ApiError> {
        let invoices = InvoiceService::new(self.client());
        let number = match invoices.client().get(id).await {
            Ok(invoice) => Some(invoice.number),
            Err(e) => {
                tracing::warn!("Invoice {} not loaded ({}), naming PDF by id", id, e);
                None
            }
        };
        let bytes = invoices.pdf(id).await?;
        let file_name = InvoiceService::pdf_file_name(number.as_deref(), id);
        self.exporter.save_bytes(&file_name, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::parse_config;
    use crate::shared::http::fake::{FakeTransport, BASE_URL};
    use crate::shared::http::Method;
    use crate::system::auth::MemoryTokenStorage;
    use chrono::NaiveDate;
    use contracts::system::auth::TokenPair;

    fn app(fake: &Arc<FakeTransport>, export_dir: &std::path::Path) -> App {
        let mut config = parse_config(&format!(
            r#"
            [api]
            base_url = "{}"

            [resources]
            visits = "visitas/"
            invoices = "facturas/"
            zones = "zonas/"
            logs = "bitacora/"
            vehicles = "vehiculos/"
            "#,
            BASE_URL
        ))
        .unwrap();
        config.export.directory = export_dir.display().to_string();
        let storage = Arc::new(MemoryTokenStorage::with_tokens(TokenPair {
            access: "a1".into(),
            refresh: "r1".into(),
        }));
        App::new(&config, fake.clone(), storage)
    }

    #[tokio::test]
    async fn test_list_json_includes_ids() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeTransport::new();
        fake.on(Method::Get, "zonas/", 200, json!([{"id": 2, "nombre": "Piscina"}]));
        let app = app(&fake, dir.path());
        app.session().restore().await.unwrap();

        let listed = app.list_json("zones", &ListQuery::new()).await.unwrap();
        assert_eq!(listed["count"], json!(1));
        assert_eq!(listed["results"][0]["id"], json!(2));
        assert_eq!(listed["results"][0]["nombre"], json!("Piscina"));
    }

    #[tokio::test]
    async fn test_unknown_collection_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeTransport::new();
        let app = app(&fake, dir.path());

        let err = app.list_json("spaceships", &ListQuery::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_export_visits_csv() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeTransport::new();
        fake.on(Method::Get, "visitas/", 200, json!([{"id": 1, "nombre": "Carla"}]));
        let app = app(&fake, dir.path());
        app.session().restore().await.unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();

        let path = app.export_csv("visits", now).await.unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("registro_visitas_20240301_0915.csv")
        );
        assert!(std::fs::read_to_string(path).unwrap().contains("Carla"));
        assert!(app.export_csv("zones", now).await.is_err());
    }

    #[tokio::test]
    async fn test_export_logs_for_range() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "bitacora/",
            200,
            json!([{"id": 1, "fecha": "2024-06-03", "titulo": "Ronda", "estado": "CERRADO"}]),
        );
        let app = app(&fake, dir.path());
        app.session().restore().await.unwrap();
        let range = ReportQuery::between(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );

        let path = app.export_logs(&range).await.unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("bitacora_2024-06-01-2024-06-30.csv")
        );
        assert!(std::fs::read_to_string(path).unwrap().contains("Ronda"));
        let call = fake.last(Method::Get, "bitacora/").unwrap();
        assert!(call.query.contains(&("desde".to_string(), "2024-06-01".to_string())));
        assert!(call.query.contains(&("hasta".to_string(), "2024-06-30".to_string())));
        assert!(!call.query.iter().any(|(k, _)| k == "moneda"));
    }

    #[tokio::test]
    async fn test_new_collections_are_dispatched() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeTransport::new();
        fake.on(Method::Get, "vehiculos/", 200, json!([{"id": 3, "placa": "2345ABC", "marca": "Toyota"}]));
        fake.on(Method::Delete, "vehiculos/007/", 204, Value::Null);
        let app = app(&fake, dir.path());
        app.session().restore().await.unwrap();

        let listed = app.list_json("vehicles", &ListQuery::new()).await.unwrap();
        assert_eq!(listed["results"][0]["placa"], json!("2345ABC"));

        app.delete("vehicles", &RecordId::from("007")).await.unwrap();
        assert_eq!(fake.count(Method::Delete, "vehiculos/007/"), 1);
    }

    #[tokio::test]
    async fn test_invoice_pdf_named_by_number() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeTransport::new();
        fake.on(Method::Get, "facturas/7/", 200, json!({"id": 7, "numero": "F-0007"}));
        fake.on_bytes(Method::Get, "facturas/7/pdf/", 200, b"%PDF-1.4".to_vec());
        let app = app(&fake, dir.path());
        app.session().restore().await.unwrap();

        let path = app.save_invoice_pdf(&RecordId::Int(7)).await.unwrap();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("factura_F-0007.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.4");
    }
}
