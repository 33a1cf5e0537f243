//! Common types and traits for all resources

pub mod resource;

// Re-exports
pub use resource::{Resource, ResourceEndpoint, UpdateMethod};
