pub mod aggregate;

pub use aggregate::{MaintenanceTask, TaskStatus};
