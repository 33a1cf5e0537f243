//! Scripted in-memory transport for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::shared::error::ApiError;

pub const BASE_URL: &str = "http://condo.test/api/";

#[derive(Clone)]
struct Scripted {
    status: u16,
    body: Vec<u8>,
    gate: Option<Arc<Notify>>,
    unreachable: bool,
}

struct Route {
    method: Method,
    path: String,
    responses: VecDeque<Scripted>,
}

/// Responses are queued per (method, path); the last one repeats once the
/// queue is down to it. Unscripted routes answer 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        let mut routes = self.routes.lock().unwrap();
        match routes.iter_mut().find(|r| r.method == method && r.path == path) {
            Some(route) => route.responses.push_back(scripted),
            None => routes.push(Route {
                method,
                path: path.to_string(),
                responses: VecDeque::from([scripted]),
            }),
        }
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        let body = if body.is_null() {
            Vec::new()
        } else {
            serde_json::to_vec(&body).unwrap()
        };
        self.on_bytes(method, path, status, body);
    }

    pub fn on_bytes(&self, method: Method, path: &str, status: u16, body: Vec<u8>) {
        self.push(
            method,
            path,
            Scripted {
                status,
                body,
                gate: None,
                unreachable: false,
            },
        );
    }

    /// The response is held until `gate` is notified.
    pub fn on_gated(&self, method: Method, path: &str, status: u16, body: Value, gate: Arc<Notify>) {
        self.push(
            method,
            path,
            Scripted {
                status,
                body: serde_json::to_vec(&body).unwrap(),
                gate: Some(gate),
                unreachable: false,
            },
        );
    }

    pub fn unreachable(&self, method: Method, path: &str) {
        self.push(
            method,
            path,
            Scripted {
                status: 0,
                body: Vec::new(),
                gate: None,
                unreachable: true,
            },
        );
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == method && relative(&c.url) == path)
            .count()
    }

    /// `METHOD path` of every call, in order
    pub fn log(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| format!("{} {}", c.method, relative(&c.url)))
            .collect()
    }

    pub fn last(&self, method: Method, path: &str) -> Option<HttpRequest> {
        self.calls()
            .into_iter()
            .rev()
            .find(|c| c.method == method && relative(&c.url) == path)
    }
}

fn relative(url: &str) -> &str {
    url.strip_prefix(BASE_URL).unwrap_or(url)
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let path = relative(&request.url).to_string();
        let scripted = {
            let mut routes = self.routes.lock().unwrap();
            routes
                .iter_mut()
                .find(|r| r.method == request.method && r.path == path)
                .and_then(|route| {
                    if route.responses.len() > 1 {
                        route.responses.pop_front()
                    } else {
                        route.responses.front().cloned()
                    }
                })
        };
        self.calls.lock().unwrap().push(request);

        let Some(scripted) = scripted else {
            return Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            });
        };
        if let Some(gate) = &scripted.gate {
            gate.notified().await;
        }
        if scripted.unreachable {
            return Err(ApiError::Transport("connection refused".into()));
        }
        Ok(HttpResponse {
            status: scripted.status,
            body: scripted.body,
        })
    }
}
