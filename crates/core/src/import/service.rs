//! Import orchestration.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::normalize::{normalize_album, normalize_release, normalize_search_page};
use super::{
    check_response_code, resolve_album_id, ImportError, ImportStage, ImportedAlbum,
    MusicBrainzClient, NetEaseClient, Provider, RawEnvelope, SearchPage, SearchQuery,
    UpstreamClient, UpstreamRequest,
};
use crate::config::{Config, ImportConfig};
use crate::metrics::{IMPORT_REQUESTS, UPSTREAM_DURATION};

/// Drives a search or detail import through its stages.
///
/// Holds no per-request state, so one instance is shared across handlers.
pub struct ImportService {
    musicbrainz: Arc<dyn UpstreamClient>,
    netease: Arc<dyn UpstreamClient>,
    config: ImportConfig,
}

impl ImportService {
    /// Create a service over the given provider clients.
    pub fn new(
        musicbrainz: Arc<dyn UpstreamClient>,
        netease: Arc<dyn UpstreamClient>,
        config: ImportConfig,
    ) -> Self {
        Self {
            musicbrainz,
            netease,
            config,
        }
    }

    /// Create a service with real HTTP clients built from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ImportError> {
        let musicbrainz = MusicBrainzClient::new(config.musicbrainz.clone())?;
        let netease = NetEaseClient::new(config.netease.clone())?;
        Ok(Self::new(
            Arc::new(musicbrainz),
            Arc::new(netease),
            config.import.clone(),
        ))
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    fn client(&self, provider: Provider) -> &dyn UpstreamClient {
        match provider {
            Provider::MusicBrainz => self.musicbrainz.as_ref(),
            Provider::NetEase => self.netease.as_ref(),
        }
    }

    /// Search MusicBrainz releases by album and/or artist name.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage, ImportError> {
        let result = self.run_search(query).await;

        match &result {
            Ok(page) => info!(
                "MusicBrainz search returned {} results (total {:?})",
                page.results.len(),
                page.count
            ),
            Err(e) => log_failure(Provider::MusicBrainz, "search", e),
        }
        record_outcome(Provider::MusicBrainz, "search", &result);

        result
    }

    async fn run_search(&self, query: &SearchQuery) -> Result<SearchPage, ImportError> {
        let album = query.album_term();
        let artist = query.artist_term();
        if album.is_none() && artist.is_none() {
            return Err(ImportError::InvalidIdentifier(
                "Please provide album name or artist name".to_string(),
            ));
        }

        let limit = query.limit.unwrap_or(self.config.default_search_limit);
        if limit == 0 {
            return Err(ImportError::InvalidIdentifier(
                "Search limit must be positive".to_string(),
            ));
        }

        let request = UpstreamRequest::SearchReleases {
            album: album.map(str::to_string),
            artist: artist.map(str::to_string),
            limit,
        };
        let envelope = self.call(Provider::MusicBrainz, &request).await?;

        if envelope.is_empty() {
            return Ok(SearchPage::empty());
        }
        Ok(normalize_search_page(&envelope.body))
    }

    /// Import one album from a provider.
    ///
    /// For NetEase, `input` may be a bare id or a pasted album URL. For
    /// MusicBrainz it is a release MBID.
    pub async fn fetch_detail(
        &self,
        provider: Provider,
        input: &str,
    ) -> Result<ImportedAlbum, ImportError> {
        let result = self.run_fetch_detail(provider, input).await;

        match &result {
            Ok(album) => info!(
                "Imported {} album '{}' ({}) with {} tracks ({})",
                provider,
                album.title,
                album.external_id.as_deref().unwrap_or("-"),
                album.track_count(),
                album
                    .total_duration_seconds()
                    .map(|secs| format!("{}s", secs))
                    .unwrap_or_else(|| "duration unknown".to_string())
            ),
            Err(e) => log_failure(provider, "detail", e),
        }
        record_outcome(provider, "detail", &result);

        result
    }

    async fn run_fetch_detail(
        &self,
        provider: Provider,
        input: &str,
    ) -> Result<ImportedAlbum, ImportError> {
        debug!("{} stage: {}", provider, ImportStage::Start.as_str());
        let request = match provider {
            Provider::MusicBrainz => {
                let id = input.trim();
                if id.is_empty() {
                    return Err(ImportError::InvalidIdentifier(
                        "Please provide a MusicBrainz release id".to_string(),
                    ));
                }
                UpstreamRequest::Release { id: id.to_string() }
            }
            Provider::NetEase => UpstreamRequest::Album {
                id: resolve_album_id(input)?,
            },
        };
        debug!("{} stage: {}", provider, ImportStage::CallUpstream.as_str());

        let envelope = self.call(provider, &request).await?;
        if envelope.is_empty() {
            return Err(ImportError::EmptyResult { provider });
        }

        debug!("{} stage: {}", provider, ImportStage::Normalize.as_str());
        let album = match provider {
            Provider::MusicBrainz => normalize_release(&envelope.body)?,
            Provider::NetEase => {
                // Also applies to clients that hand back the body unchecked.
                check_response_code(&envelope.body)?;
                normalize_album(&envelope.body)?
            }
        };

        debug!("{} stage: {}", provider, ImportStage::Done.as_str());
        Ok(album)
    }

    /// Perform one upstream call under the configured timeout.
    async fn call(
        &self,
        provider: Provider,
        request: &UpstreamRequest,
    ) -> Result<RawEnvelope, ImportError> {
        let timeout = self.config.request_timeout();
        let timer = UPSTREAM_DURATION
            .with_label_values(&[provider.as_str(), request.operation()])
            .start_timer();

        let result = tokio::time::timeout(timeout, self.client(provider).fetch(request)).await;
        timer.observe_duration();

        match result {
            Ok(result) => result,
            Err(_) => Err(ImportError::Upstream {
                provider,
                cause: format!("timed out after {}s", timeout.as_secs()),
            }),
        }
    }
}

fn log_failure(provider: Provider, operation: &str, err: &ImportError) {
    warn!(
        "{} {} failed at stage {} ({}): {}",
        provider,
        operation,
        err.stage().as_str(),
        err.kind().as_str(),
        err
    );
}

fn record_outcome<T>(provider: Provider, operation: &str, result: &Result<T, ImportError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind().as_str(),
    };
    IMPORT_REQUESTS
        .with_label_values(&[provider.as_str(), operation, outcome])
        .inc();
}
