pub mod aggregate;

pub use aggregate::User;
