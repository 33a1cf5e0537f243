pub mod aggregate;

pub use aggregate::Unit;
