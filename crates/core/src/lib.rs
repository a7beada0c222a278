pub mod config;
pub mod import;
pub mod metrics;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ImportConfig,
    ServerConfig,
};
pub use import::{
    ImportError, ImportErrorKind, ImportService, ImportedAlbum, Provider, SearchPage,
    SearchQuery, UpstreamClient,
};
