pub mod common;

pub mod a001_user;
pub mod a002_role;
pub mod a003_permission;
pub mod a004_visit;
pub mod a005_camera;
pub mod a006_zone;
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
pub mod a020_common_area;
pub mod a021_resident;
pub mod a022_owner;
pub mod a023_tenant;
pub mod a024_vehicle;
pub mod a025_unit;
pub mod a026_access_event;

#[cfg(test)]
mod round_trip_tests;
