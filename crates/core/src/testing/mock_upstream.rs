//! Mock upstream client for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::import::{ImportError, Provider, RawEnvelope, UpstreamClient, UpstreamRequest};

/// Mock implementation of the UpstreamClient trait.
///
/// Provides controllable behavior for testing:
/// - Answer calls from a queue of envelopes or errors
/// - Track requests for assertions
/// - Simulate slow providers
///
/// With an empty queue every call fails with `NotFound`.
///
/// # Example
///
/// ```rust,ignore
/// use album_import_core::testing::{fixtures, MockUpstream};
///
/// let upstream = MockUpstream::new(Provider::MusicBrainz);
/// upstream
///     .push_response(fixtures::musicbrainz_release("mb-1", "Abbey Road", &[17]))
///     .await;
///
/// let envelope = upstream.fetch(&UpstreamRequest::Release { id: "mb-1".into() }).await?;
/// assert_eq!(upstream.call_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockUpstream {
    provider: Provider,
    /// Responses handed out in order, one per call.
    responses: Arc<RwLock<VecDeque<Result<RawEnvelope, ImportError>>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<UpstreamRequest>>>,
    /// Delay applied before answering.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockUpstream {
    /// Create a mock for the given provider with nothing queued.
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            responses: Arc::new(RwLock::new(VecDeque::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Response Queue
    // =========================================================================

    /// Queue a JSON body.
    pub async fn push_response(&self, body: Value) {
        self.responses
            .write()
            .await
            .push_back(Ok(RawEnvelope::new(body)));
    }

    /// Queue an empty body.
    pub async fn push_empty(&self) {
        self.responses
            .write()
            .await
            .push_back(Ok(RawEnvelope::empty()));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: ImportError) {
        self.responses.write().await.push_back(Err(error));
    }

    /// Delay every answer by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    // =========================================================================
    // Request Recording
    // =========================================================================

    /// Get all recorded requests.
    pub async fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of calls performed.
    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl UpstreamClient for MockUpstream {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawEnvelope, ImportError> {
        self.requests.write().await.push(request.clone());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.write().await.pop_front();
        next.unwrap_or_else(|| {
            Err(ImportError::NotFound {
                provider: self.provider,
                id: request_subject(request),
            })
        })
    }
}

fn request_subject(request: &UpstreamRequest) -> String {
    match request {
        UpstreamRequest::SearchReleases { album, artist, .. } => format!(
            "{} / {}",
            album.as_deref().unwrap_or("-"),
            artist.as_deref().unwrap_or("-")
        ),
        UpstreamRequest::Release { id } | UpstreamRequest::Album { id } => id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportErrorKind;
    use serde_json::json;

    fn release(id: &str) -> UpstreamRequest {
        UpstreamRequest::Release { id: id.to_string() }
    }

    #[tokio::test]
    async fn test_responses_are_handed_out_in_order() {
        let upstream = MockUpstream::new(Provider::MusicBrainz);
        upstream.push_response(json!({ "title": "First" })).await;
        upstream.push_empty().await;

        let first = upstream.fetch(&release("a")).await.unwrap();
        assert_eq!(first.body["title"], "First");

        let second = upstream.fetch(&release("b")).await.unwrap();
        assert!(second.is_empty());

        assert_eq!(upstream.call_count().await, 2);
        assert_eq!(upstream.requests().await, vec![release("a"), release("b")]);
    }

    #[tokio::test]
    async fn test_empty_queue_is_not_found() {
        let upstream = MockUpstream::new(Provider::NetEase);

        let err = upstream
            .fetch(&UpstreamRequest::Album {
                id: "42".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::NotFound { ref id, .. } if id == "42"));
    }

    #[tokio::test]
    async fn test_queued_error() {
        let upstream = MockUpstream::new(Provider::NetEase);
        upstream
            .push_error(ImportError::UpstreamCode {
                provider: Provider::NetEase,
                code: 400,
            })
            .await;

        let err = upstream
            .fetch(&UpstreamRequest::Album {
                id: "1".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ImportErrorKind::UpstreamError);
    }
}
