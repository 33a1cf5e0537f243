pub mod aggregate;

pub use aggregate::{Repair, RepairStatus};
