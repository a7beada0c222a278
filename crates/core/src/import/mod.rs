//! External album metadata import for MusicBrainz and NetEase Cloud Music.
//!
//! An import runs through four stages:
//!
//! 1. **ResolveInput**: validate the search terms, or turn a pasted id/URL
//!    into a provider identifier ([`resolve_album_id`]).
//! 2. **CallUpstream**: one HTTP request through the provider's
//!    [`UpstreamClient`], returning the raw JSON envelope.
//! 3. **Normalize**: map the envelope into an [`ImportedAlbum`] or a
//!    [`SearchPage`] (see [`normalize`]).
//! 4. **Done**: the record is handed to the caller.
//!
//! [`ImportService`] drives the stages; each one may exit with an
//! [`ImportError`].

mod error;
mod json;
mod musicbrainz;
mod netease;
pub mod normalize;
mod resolver;
mod service;
mod types;

pub use error::{ImportError, ImportErrorKind};
pub use json::JsonExt;
pub use musicbrainz::{build_search_query, MusicBrainzClient, MusicBrainzConfig};
pub use netease::{check_response_code, NetEaseClient, NetEaseConfig, AUTH_REQUIRED_CODE};
pub use resolver::resolve_album_id;
pub use service::ImportService;
pub use types::*;

use async_trait::async_trait;
use serde_json::Value;

/// Stages of a single import request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Start,
    ResolveInput,
    CallUpstream,
    Normalize,
    Done,
}

impl ImportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStage::Start => "start",
            ImportStage::ResolveInput => "resolve_input",
            ImportStage::CallUpstream => "call_upstream",
            ImportStage::Normalize => "normalize",
            ImportStage::Done => "done",
        }
    }
}

/// An outbound operation against a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamRequest {
    /// MusicBrainz release search.
    SearchReleases {
        album: Option<String>,
        artist: Option<String>,
        limit: u32,
    },
    /// MusicBrainz release lookup by MBID.
    Release { id: String },
    /// NetEase album lookup by numeric id.
    Album { id: String },
}

impl UpstreamRequest {
    /// Short operation name, used in logs and metric labels.
    pub fn operation(&self) -> &'static str {
        match self {
            UpstreamRequest::SearchReleases { .. } => "search",
            UpstreamRequest::Release { .. } => "release",
            UpstreamRequest::Album { .. } => "album",
        }
    }
}

/// Raw JSON body returned by a provider.
///
/// An empty HTTP body is represented as `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEnvelope {
    pub body: Value,
}

impl RawEnvelope {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// An envelope for an empty response body.
    pub fn empty() -> Self {
        Self { body: Value::Null }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_null()
    }

    /// Parse a response body, treating a blank body as empty.
    pub(crate) fn from_body(provider: Provider, bytes: &[u8]) -> Result<Self, ImportError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::empty());
        }
        serde_json::from_slice(bytes)
            .map(Self::new)
            .map_err(|e| ImportError::Upstream {
                provider,
                cause: format!("invalid JSON body: {}", e),
            })
    }
}

/// A provider's HTTP client.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Provider this client talks to.
    fn provider(&self) -> Provider;

    /// Perform the request and return the raw envelope.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawEnvelope, ImportError>;
}

pub(crate) fn unsupported(provider: Provider, request: &UpstreamRequest) -> ImportError {
    ImportError::Upstream {
        provider,
        cause: format!("unsupported operation '{}'", request.operation()),
    }
}
