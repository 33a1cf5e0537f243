pub mod aggregate;

pub use aggregate::{Owner, OwnerUser};
