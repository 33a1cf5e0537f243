pub mod aggregate;

pub use aggregate::{slugify, Tag};
