pub mod aggregate;

pub use aggregate::Permission;
