use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::import::{MusicBrainzConfig, NetEaseConfig};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub musicbrainz: MusicBrainzConfig,
    #[serde(default)]
    pub netease: NetEaseConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Import request behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Upper bound for a single upstream call, in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Search page size when the request gives none (default: 10)
    #[serde(default = "default_search_limit")]
    pub default_search_limit: u32,
}

impl ImportConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            default_search_limit: default_search_limit(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_search_limit() -> u32 {
    10
}
