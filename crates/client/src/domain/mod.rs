//! Per-resource operations beyond plain CRUD, and the endpoint registry.

pub mod a001_user;
pub mod a004_visit;
pub mod a005_camera;
pub mod a007_invoice;
pub mod a008_payment;
pub mod a009_fine;
pub mod a010_maintenance_task;
pub mod a011_log_entry;
pub mod a012_report;
pub mod a013_incident;
pub mod a014_notification;
pub mod a015_repair;
pub mod a016_expense_audit;
pub mod a017_staff;
pub mod a018_service;
pub mod a019_tag;
pub mod a025_unit;
pub mod a026_access_event;

use chrono::{DateTime, SecondsFormat, Utc};
use contracts::domain::a001_user::User;
use contracts::domain::a002_role::Role;
use contracts::domain::a003_permission::Permission;
use contracts::domain::a004_visit::Visit;
use contracts::domain::a005_camera::Camera;
use contracts::domain::a006_zone::Zone;
use contracts::domain::a007_invoice::Invoice;
use contracts::domain::a008_payment::Payment;
use contracts::domain::a009_fine::Fine;
use contracts::domain::a010_maintenance_task::MaintenanceTask;
use contracts::domain::a011_log_entry::LogEntry;
use contracts::domain::a012_report::REPORTS_ENDPOINT;
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
use contracts::domain::common::ResourceEndpoint;

/// ISO timestamp as the backend expects it (`2024-03-01T09:15:00.000Z`)
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Every collection the client knows, keyed by `collection`
pub fn endpoints() -> Vec<ResourceEndpoint> {
    vec![
        ResourceEndpoint::of::<User>(),
        ResourceEndpoint::of::<Role>(),
        ResourceEndpoint::of::<Permission>(),
        ResourceEndpoint::of::<Visit>(),
        ResourceEndpoint::of::<Camera>(),
        ResourceEndpoint::of::<Zone>(),
        ResourceEndpoint::of::<Invoice>(),
        ResourceEndpoint::of::<Payment>(),
        ResourceEndpoint::of::<Fine>(),
        ResourceEndpoint::of::<MaintenanceTask>(),
        ResourceEndpoint::of::<LogEntry>(),
        REPORTS_ENDPOINT,
        ResourceEndpoint::of::<Incident>(),
        ResourceEndpoint::of::<Notification>(),
        ResourceEndpoint::of::<Repair>(),
        ResourceEndpoint::of::<ExpenseAudit>(),
        ResourceEndpoint::of::<StaffMember>(),
        ResourceEndpoint::of::<Service>(),
        ResourceEndpoint::of::<Tag>(),
        ResourceEndpoint::of::<CommonArea>(),
        ResourceEndpoint::of::<Resident>(),
        ResourceEndpoint::of::<Owner>(),
        ResourceEndpoint::of::<Tenant>(),
        ResourceEndpoint::of::<Vehicle>(),
        ResourceEndpoint::of::<Unit>(),
    ]
}

pub fn endpoint(collection: &str) -> Option<ResourceEndpoint> {
    endpoints().into_iter().find(|e| e.collection == collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_is_consistent() {
        let all = endpoints();
        let names: HashSet<&str> = all.iter().map(|e| e.collection).collect();
        assert_eq!(names.len(), all.len());
        for e in &all {
            assert!(!e.candidates.is_empty(), "{} has no candidates", e.collection);
            assert!(e.candidates.iter().all(|c| c.ends_with('/') && !c.starts_with('/')));
        }
        assert_eq!(endpoint("reports").map(|e| e.lookup_params), Some(&[("ping", "1")][..]));
        assert_eq!(endpoint("fines").map(|e| e.fallback()), Some("multas/"));
        assert_eq!(endpoint("tags").map(|e| e.fallback()), Some("tang/"));
        assert_eq!(endpoint("residents").map(|e| e.fallback()), Some("familia/"));
        assert_eq!(all.len(), 25);
        assert!(endpoint("nope").is_none());
    }

    #[test]
    fn test_iso_timestamp() {
        use chrono::TimeZone;
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        assert_eq!(iso_timestamp(at), "2024-03-01T09:15:00.000Z");
    }
}
