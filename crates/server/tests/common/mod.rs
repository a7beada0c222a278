//! Common test utilities for API testing with mock upstreams.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock provider clients injected, so no request leaves the process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use album_import_core::testing::MockUpstream;
use album_import_core::{Config, ImportConfig, ImportService, Provider};
use album_import_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use album_import_core::testing::fixtures;

/// Test fixture with controllable provider mocks.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_netease_import() {
///     let fixture = TestFixture::new();
///     fixture.netease.push_response(fixtures::netease_album(1, "Jay", &[])).await;
///
///     let response = fixture.get("/api/import/netease?url=1").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock MusicBrainz client - queue release and search bodies
    pub musicbrainz: Arc<MockUpstream>,
    /// Mock NetEase client - queue album bodies
    pub netease: Arc<MockUpstream>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default import settings.
    pub fn new() -> Self {
        Self::with_import_config(ImportConfig::default())
    }

    /// Create a test fixture with custom import settings.
    pub fn with_import_config(import: ImportConfig) -> Self {
        let musicbrainz = Arc::new(MockUpstream::new(Provider::MusicBrainz));
        let netease = Arc::new(MockUpstream::new(Provider::NetEase));

        let config = Config {
            import: import.clone(),
            ..Default::default()
        };
        let service = ImportService::new(musicbrainz.clone(), netease.clone(), import);
        let state = Arc::new(AppState::new(config, Arc::new(service)));

        Self {
            router: create_router(state),
            musicbrainz,
            netease,
        }
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        let (status, body_bytes) = self.get_raw(path).await;

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Send a GET request and return the undecoded body.
    pub async fn get_raw(&self, path: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, body_bytes.to_vec())
    }
}
