//! NetEase Cloud Music album API client.
//!
//! The public album endpoint rejects requests that do not look like they come
//! from a browser on the site itself, so a browser User-Agent and the site
//! Referer are always sent. Business failures arrive as HTTP 200 with a
//! non-200 `code` field in the body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::json::JsonExt;
use super::{unsupported, ImportError, Provider, RawEnvelope, UpstreamClient, UpstreamRequest};

const PROVIDER: Provider = Provider::NetEase;

const SUCCESS_CODE: i64 = 200;

/// Response code NetEase uses when the request needs a logged-in session.
pub const AUTH_REQUIRED_CODE: i64 = -462;

/// NetEase client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetEaseConfig {
    /// Base URL of the site (default: https://music.163.com).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Browser-like User-Agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Referer header value.
    #[serde(default = "default_referer")]
    pub referer: String,
}

fn default_base_url() -> String {
    "https://music.163.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_referer() -> String {
    "https://music.163.com/".to_string()
}

impl Default for NetEaseConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            referer: default_referer(),
        }
    }
}

/// Translate the `code` field of a response body.
///
/// A missing code is treated as success.
pub fn check_response_code(body: &Value) -> Result<(), ImportError> {
    let Some(code) = body.field("code") else {
        return Ok(());
    };

    match code.as_i64() {
        Some(SUCCESS_CODE) => Ok(()),
        Some(AUTH_REQUIRED_CODE) => Err(ImportError::AuthRequired { provider: PROVIDER }),
        Some(code) => Err(ImportError::UpstreamCode {
            provider: PROVIDER,
            code,
        }),
        None => Err(ImportError::Upstream {
            provider: PROVIDER,
            cause: format!("unexpected response code {}", code),
        }),
    }
}

/// NetEase Cloud Music API client.
pub struct NetEaseClient {
    client: Client,
    base_url: String,
    referer: String,
}

impl NetEaseClient {
    /// Create a new NetEase client.
    pub fn new(config: NetEaseConfig) -> Result<Self, ImportError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ImportError::transport(PROVIDER, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            referer: config.referer,
        })
    }

    /// URL of an album lookup.
    pub fn album_url(&self, album_id: &str) -> String {
        format!(
            "{}/api/album/{}",
            self.base_url,
            urlencoding::encode(album_id)
        )
    }

    /// Get an album with its song list.
    pub async fn get_album(&self, album_id: &str) -> Result<RawEnvelope, ImportError> {
        let url = self.album_url(album_id);
        debug!("NetEase get album: id={}", album_id);

        let response = self
            .client
            .get(&url)
            .header(REFERER, &self.referer)
            .send()
            .await
            .map_err(|e| ImportError::transport(PROVIDER, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ImportError::NotFound {
                provider: PROVIDER,
                id: album_id.to_string(),
            });
        }
        if !status.is_success() {
            warn!("NetEase returned HTTP {} for album {}", status.as_u16(), album_id);
            return Err(ImportError::Upstream {
                provider: PROVIDER,
                cause: format!("HTTP {}", status.as_u16()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImportError::transport(PROVIDER, e))?;

        let envelope = RawEnvelope::from_body(PROVIDER, &bytes)?;
        if let Err(e) = check_response_code(&envelope.body) {
            warn!("NetEase album {} rejected: {}", album_id, e);
            return Err(e);
        }

        Ok(envelope)
    }
}

#[async_trait]
impl UpstreamClient for NetEaseClient {
    fn provider(&self) -> Provider {
        PROVIDER
    }

    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawEnvelope, ImportError> {
        match request {
            UpstreamRequest::Album { id } => self.get_album(id).await,
            other => Err(unsupported(PROVIDER, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_code() {
        assert!(check_response_code(&json!({ "code": 200, "album": {} })).is_ok());
    }

    #[test]
    fn test_missing_code_is_success() {
        assert!(check_response_code(&json!({ "album": {} })).is_ok());
        assert!(check_response_code(&Value::Null).is_ok());
    }

    #[test]
    fn test_auth_required_code() {
        let err = check_response_code(&json!({ "code": -462, "msg": "need login" })).unwrap_err();
        assert!(matches!(
            err,
            ImportError::AuthRequired {
                provider: Provider::NetEase
            }
        ));
    }

    #[test]
    fn test_other_codes_are_generic() {
        let err = check_response_code(&json!({ "code": 404 })).unwrap_err();
        assert!(matches!(err, ImportError::UpstreamCode { code: 404, .. }));

        let err = check_response_code(&json!({ "code": -460 })).unwrap_err();
        assert!(matches!(err, ImportError::UpstreamCode { code: -460, .. }));
    }

    #[test]
    fn test_non_numeric_code() {
        let err = check_response_code(&json!({ "code": "oops" })).unwrap_err();
        assert!(matches!(err, ImportError::Upstream { .. }));
    }

    #[test]
    fn test_album_url() {
        let client = NetEaseClient::new(NetEaseConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.album_url("3116013"), "http://127.0.0.1:9/api/album/3116013");
    }
}
