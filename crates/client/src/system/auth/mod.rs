pub mod jwt;
pub mod session;
pub mod storage;

pub use session::Session;
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
