pub mod aggregate;

pub use aggregate::Tenant;
