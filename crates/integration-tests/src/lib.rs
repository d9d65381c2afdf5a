//! Integration tests for Quarry Ledger.
//!
//! The tests drive the full router in-process, backed by the in-memory
//! document store, so no database or running server is needed:
//!
//! ```bash
//! cargo test -p quarry-ledger-integration-tests
//! ```
//!
//! [`TestApp`] wraps the router with small JSON request helpers.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use quarry_ledger_server::config::ServerConfig;
use quarry_ledger_server::db::DocumentStore;
use quarry_ledger_server::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// A router over a fresh in-memory store.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

/// Status and parsed JSON body of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// App with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// App with a specific configuration; the store is always in memory.
    #[must_use]
    pub fn with_config(config: ServerConfig) -> Self {
        let state = AppState::new(config, DocumentStore::memory());
        Self {
            router: quarry_ledger_server::app(state),
        }
    }

    /// Send a request with an optional JSON body.
    ///
    /// Non-JSON response bodies are returned as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    #[allow(clippy::expect_used)]
    pub async fn request(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET` without a body.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
