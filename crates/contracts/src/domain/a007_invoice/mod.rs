pub mod aggregate;

pub use aggregate::{Invoice, InvoiceLine};
