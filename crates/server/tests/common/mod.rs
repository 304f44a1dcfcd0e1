//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling comprehensive E2E testing
//! without a yt-dlp binary.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mediagrab_core::{
    testing::{MockEnricher, MockExtractor},
    Enricher, JobRunner, JobStore, MediaExtractor, MemoryJobStore,
};
use mediagrab_server::api::create_router;
use mediagrab_server::state::AppState;

/// Re-export fixtures for test convenience
pub use mediagrab_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Metadata resolution and downloads (MockExtractor)
/// - Post-download analysis (MockEnricher)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_create_download() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/download", json!({
///         "url": "https://youtu.be/abc12345678"
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The job store backing the server
    pub store: Arc<MemoryJobStore>,
    /// Mock extractor - configure metadata, progress and failures
    pub extractor: Arc<MockExtractor>,
    /// Mock enricher - configure analytics payloads and failures
    pub enricher: Arc<MockEnricher>,
    /// The runner driving job lifecycles
    pub runner: Arc<JobRunner>,
    /// Temporary directory holding downloaded artifacts
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Body parsed as JSON, `Null` when the body is empty or not JSON
    pub body: Value,
    /// Raw body text, for CSV and artifact responses
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let downloads_dir = temp_dir.path().join("downloads");

        let store = Arc::new(MemoryJobStore::new());
        let extractor = Arc::new(MockExtractor::new());
        let enricher = Arc::new(MockEnricher::new());

        let runner = Arc::new(JobRunner::new(
            Arc::clone(&store) as Arc<dyn JobStore>,
            Arc::clone(&extractor) as Arc<dyn MediaExtractor>,
            Arc::clone(&enricher) as Arc<dyn Enricher>,
            downloads_dir.clone(),
        ));

        let state = Arc::new(AppState::new(
            Arc::clone(&store) as Arc<dyn JobStore>,
            Arc::clone(&extractor) as Arc<dyn MediaExtractor>,
            Arc::clone(&runner),
            downloads_dir,
        ));

        let router = create_router(state);

        Self {
            router,
            store,
            extractor,
            enricher,
            runner,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Create a download through the API and return its id.
    pub async fn create_download(&self, body: Value) -> String {
        let response = self.post("/api/download", body).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "create download failed: {}",
            response.text
        );
        response.body["downloadId"]
            .as_str()
            .expect("downloadId should be a string")
            .to_string()
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
