//! MusicBrainz API client.
//!
//! MusicBrainz requires:
//! - User-Agent header with application name/version and contact info
//! - `fmt=json` on every request, otherwise XML is returned

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{unsupported, ImportError, Provider, RawEnvelope, UpstreamClient, UpstreamRequest};

const PROVIDER: Provider = Provider::MusicBrainz;

/// Longest error body kept in an upstream error message.
const MAX_ERROR_BODY: usize = 200;

/// MusicBrainz API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicBrainzConfig {
    /// User-Agent string (required by MusicBrainz).
    /// Format: "AppName/Version ( contact-url-or-email )"
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Base URL of the web service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_user_agent() -> String {
    format!(
        "AlbumImport/{} ( https://github.com/album-import/album-import )",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_base_url() -> String {
    "https://musicbrainz.org/ws/2".to_string()
}

impl Default for MusicBrainzConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            base_url: default_base_url(),
        }
    }
}

/// Build the Lucene query for a release search.
///
/// Returns `None` when both terms are blank.
pub fn build_search_query(album: Option<&str>, artist: Option<&str>) -> Option<String> {
    let terms: Vec<String> = [("release", album), ("artist", artist)]
        .into_iter()
        .filter_map(|(field, value)| {
            let value = value.map(str::trim).filter(|v| !v.is_empty())?;
            Some(format!("{}:\"{}\"", field, value.replace('"', "\\\"")))
        })
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" AND "))
    }
}

/// MusicBrainz API client.
pub struct MusicBrainzClient {
    client: Client,
    base_url: String,
}

impl MusicBrainzClient {
    /// Create a new MusicBrainz client.
    pub fn new(config: MusicBrainzConfig) -> Result<Self, ImportError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ImportError::transport(PROVIDER, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of a release search.
    pub fn search_url(&self, query: &str, limit: u32) -> String {
        format!(
            "{}/release/?query={}&fmt=json&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        )
    }

    /// URL of a release lookup including recordings and artist credits.
    pub fn release_url(&self, mbid: &str) -> String {
        format!(
            "{}/release/{}?inc=recordings+artist-credits&fmt=json",
            self.base_url,
            urlencoding::encode(mbid)
        )
    }

    /// Search for releases by album and/or artist name.
    pub async fn search_releases(
        &self,
        album: Option<&str>,
        artist: Option<&str>,
        limit: u32,
    ) -> Result<RawEnvelope, ImportError> {
        let query = build_search_query(album, artist).ok_or_else(|| {
            ImportError::InvalidIdentifier("Please provide album name or artist name".to_string())
        })?;

        debug!("MusicBrainz search: query='{}', limit={}", query, limit);

        let url = self.search_url(&query, limit);
        self.get_json(&url, None).await
    }

    /// Get a specific release by MBID with its track list.
    pub async fn get_release(&self, mbid: &str) -> Result<RawEnvelope, ImportError> {
        debug!("MusicBrainz get release: mbid={}", mbid);

        let url = self.release_url(mbid);
        self.get_json(&url, Some(mbid)).await
    }

    /// GET a JSON body. A 404 is `NotFound` only for lookups that name an id.
    async fn get_json(
        &self,
        url: &str,
        lookup_id: Option<&str>,
    ) -> Result<RawEnvelope, ImportError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ImportError::transport(PROVIDER, e))?;

        let status = response.status();
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, lookup_id) {
            return Err(ImportError::NotFound {
                provider: PROVIDER,
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("MusicBrainz returned HTTP {} for {}", status.as_u16(), url);
            return Err(ImportError::Upstream {
                provider: PROVIDER,
                cause: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    truncate(&body, MAX_ERROR_BODY)
                ),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImportError::transport(PROVIDER, e))?;

        RawEnvelope::from_body(PROVIDER, &bytes)
    }
}

#[async_trait]
impl UpstreamClient for MusicBrainzClient {
    fn provider(&self) -> Provider {
        PROVIDER
    }

    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawEnvelope, ImportError> {
        match request {
            UpstreamRequest::SearchReleases {
                album,
                artist,
                limit,
            } => {
                self.search_releases(album.as_deref(), artist.as_deref(), *limit)
                    .await
            }
            UpstreamRequest::Release { id } => self.get_release(id).await,
            other => Err(unsupported(PROVIDER, other)),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MusicBrainzClient {
        MusicBrainzClient::new(MusicBrainzConfig {
            base_url: "https://mb.test/ws/2/".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_query_with_album_and_artist() {
        assert_eq!(
            build_search_query(Some(" Abbey Road "), Some("The Beatles")).as_deref(),
            Some("release:\"Abbey Road\" AND artist:\"The Beatles\"")
        );
    }

    #[test]
    fn test_query_with_single_term() {
        assert_eq!(
            build_search_query(None, Some("Björk")).as_deref(),
            Some("artist:\"Björk\"")
        );
        assert_eq!(
            build_search_query(Some("OK Computer"), Some("  ")).as_deref(),
            Some("release:\"OK Computer\"")
        );
    }

    #[test]
    fn test_query_requires_a_term() {
        assert_eq!(build_search_query(None, None), None);
        assert_eq!(build_search_query(Some(""), Some("   ")), None);
    }

    #[test]
    fn test_query_escapes_quotes() {
        assert_eq!(
            build_search_query(Some("The \"Blue\" Album"), None).as_deref(),
            Some("release:\"The \\\"Blue\\\" Album\"")
        );
    }

    #[test]
    fn test_search_url_is_percent_encoded() {
        let url = client().search_url("release:\"Abbey Road\" AND artist:\"The Beatles\"", 10);
        assert_eq!(
            url,
            "https://mb.test/ws/2/release/?query=release%3A%22Abbey%20Road%22%20AND%20artist%3A%22The%20Beatles%22&fmt=json&limit=10"
        );
    }

    #[test]
    fn test_release_url() {
        assert_eq!(
            client().release_url("b84ee12a-09ef-421b-82de-0441a926375b"),
            "https://mb.test/ws/2/release/b84ee12a-09ef-421b-82de-0441a926375b?inc=recordings+artist-credits&fmt=json"
        );
    }

    #[test]
    fn test_release_url_encodes_path_segment() {
        assert_eq!(
            client().release_url("../artist/x"),
            "https://mb.test/ws/2/release/..%2Fartist%2Fx?inc=recordings+artist-credits&fmt=json"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("short", 100), "short");
    }
}
