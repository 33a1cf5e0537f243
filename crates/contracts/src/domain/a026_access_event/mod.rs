pub mod aggregate;

pub use aggregate::{AccessEvent, FaceMatchRequest, DEFAULT_THRESHOLD};
