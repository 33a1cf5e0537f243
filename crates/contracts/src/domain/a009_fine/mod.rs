pub mod aggregate;

pub use aggregate::{Fine, FineStatus};
