pub mod aggregate;
pub mod export;

pub use aggregate::{Payment, PaymentStatus};
