pub mod aggregate;

pub use aggregate::Resident;
