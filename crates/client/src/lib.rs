pub mod app;
pub mod domain;
pub mod shared;
pub mod system;

pub use app::App;
