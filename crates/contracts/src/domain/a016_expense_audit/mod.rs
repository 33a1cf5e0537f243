pub mod aggregate;

pub use aggregate::{ExpenseAudit, ExpenseStatus};
