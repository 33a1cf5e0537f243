pub mod api_client;
pub mod config;
pub mod discovery;
pub mod edit_session;
pub mod error;
pub mod export;
pub mod http;
pub mod list_view;
pub mod resource_client;

pub use api_client::ApiClient;
pub use discovery::EndpointResolver;
pub use edit_session::{EditSession, EditState};
pub use error::ApiError;
pub use list_view::{FetchTicket, ListState, ListView};
pub use resource_client::ResourceClient;
