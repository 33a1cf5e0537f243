pub mod transport;

#[cfg(test)]
pub mod fake;

pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
