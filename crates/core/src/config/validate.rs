use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Import timeout and default search limit are positive
/// - Provider base URLs are absolute http(s) URLs
/// - Provider User-Agent strings are not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Import validation
    if config.import.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "import.request_timeout_secs must be positive".to_string(),
        ));
    }
    if config.import.default_search_limit == 0 {
        return Err(ConfigError::ValidationError(
            "import.default_search_limit must be positive".to_string(),
        ));
    }

    // Provider validation
    validate_base_url("musicbrainz.base_url", &config.musicbrainz.base_url)?;
    validate_base_url("netease.base_url", &config.netease.base_url)?;
    validate_not_blank("musicbrainz.user_agent", &config.musicbrainz.user_agent)?;
    validate_not_blank("netease.user_agent", &config.netease.user_agent)?;

    Ok(())
}

fn validate_base_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", key, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got '{}'",
            key,
            url.scheme()
        )));
    }

    Ok(())
}

fn validate_not_blank(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            key
        )));
    }
    Ok(())
}
