pub mod aggregate;

pub use aggregate::{normalize_plate, Vehicle};
