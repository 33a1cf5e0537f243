pub mod aggregate;

pub use aggregate::CommonArea;
