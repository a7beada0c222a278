use serde::Serialize;
use thiserror::Error;

use super::types::Provider;
use super::ImportStage;

/// Errors that can occur while importing album metadata.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The request input could not be turned into a usable identifier or query.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Transport failure or unexpected response from the provider.
    #[error("{provider} request failed: {cause}")]
    Upstream { provider: Provider, cause: String },

    /// The provider answered with a non-success business code.
    #[error("{provider} returned error code {code}")]
    UpstreamCode { provider: Provider, code: i64 },

    /// The provider refuses the request without a logged-in session.
    #[error(
        "{provider} requires a logged-in session for this request, please use {} instead",
        .provider.alternative()
    )]
    AuthRequired { provider: Provider },

    /// The provider responded but a required field is missing.
    #[error("{provider} response is missing required field '{field}'")]
    IncompleteSource { provider: Provider, field: String },

    /// The identifier is well formed but matches nothing.
    #[error("{provider} has no release with id '{id}'")]
    NotFound { provider: Provider, id: String },

    /// The provider succeeded but returned an empty body.
    #[error("{provider} returned an empty response")]
    EmptyResult { provider: Provider },
}

/// Coarse error category, for branching without matching on payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportErrorKind {
    InvalidIdentifier,
    UpstreamError,
    AuthRequired,
    IncompleteSource,
    NotFound,
    EmptyResult,
}

impl ImportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportErrorKind::InvalidIdentifier => "invalid_identifier",
            ImportErrorKind::UpstreamError => "upstream_error",
            ImportErrorKind::AuthRequired => "auth_required",
            ImportErrorKind::IncompleteSource => "incomplete_source",
            ImportErrorKind::NotFound => "not_found",
            ImportErrorKind::EmptyResult => "empty_result",
        }
    }
}

impl ImportError {
    pub(crate) fn transport(provider: Provider, err: reqwest::Error) -> Self {
        ImportError::Upstream {
            provider,
            cause: err.to_string(),
        }
    }

    pub(crate) fn incomplete(provider: Provider, field: impl Into<String>) -> Self {
        ImportError::IncompleteSource {
            provider,
            field: field.into(),
        }
    }

    pub fn kind(&self) -> ImportErrorKind {
        match self {
            ImportError::InvalidIdentifier(_) => ImportErrorKind::InvalidIdentifier,
            ImportError::Upstream { .. } | ImportError::UpstreamCode { .. } => {
                ImportErrorKind::UpstreamError
            }
            ImportError::AuthRequired { .. } => ImportErrorKind::AuthRequired,
            ImportError::IncompleteSource { .. } => ImportErrorKind::IncompleteSource,
            ImportError::NotFound { .. } => ImportErrorKind::NotFound,
            ImportError::EmptyResult { .. } => ImportErrorKind::EmptyResult,
        }
    }

    /// Provider involved, when the failure happened past input validation.
    pub fn provider(&self) -> Option<Provider> {
        match self {
            ImportError::InvalidIdentifier(_) => None,
            ImportError::Upstream { provider, .. }
            | ImportError::UpstreamCode { provider, .. }
            | ImportError::AuthRequired { provider }
            | ImportError::IncompleteSource { provider, .. }
            | ImportError::NotFound { provider, .. }
            | ImportError::EmptyResult { provider } => Some(*provider),
        }
    }

    /// Stage of the import at which this error is raised.
    pub fn stage(&self) -> ImportStage {
        match self.kind() {
            ImportErrorKind::InvalidIdentifier => ImportStage::ResolveInput,
            ImportErrorKind::UpstreamError
            | ImportErrorKind::AuthRequired
            | ImportErrorKind::NotFound => ImportStage::CallUpstream,
            ImportErrorKind::IncompleteSource | ImportErrorKind::EmptyResult => {
                ImportStage::Normalize
            }
        }
    }

    /// Whether repeating the same request might succeed.
    ///
    /// Only upstream failures qualify; the importer itself never retries.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ImportErrorKind::UpstreamError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_required_suggests_other_provider() {
        let err = ImportError::AuthRequired {
            provider: Provider::NetEase,
        };
        let message = err.to_string();
        assert!(message.contains("NetEase Cloud Music"));
        assert!(message.contains("MusicBrainz"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_upstream_code_is_upstream_kind() {
        let err = ImportError::UpstreamCode {
            provider: Provider::NetEase,
            code: 400,
        };
        assert_eq!(err.kind(), ImportErrorKind::UpstreamError);
        assert_eq!(err.kind().as_str(), "upstream_error");
        assert!(err.is_retryable());
        assert_eq!(err.stage(), ImportStage::CallUpstream);
    }

    #[test]
    fn test_invalid_identifier_has_no_provider() {
        let err = ImportError::InvalidIdentifier("empty input".to_string());
        assert_eq!(err.provider(), None);
        assert_eq!(err.stage(), ImportStage::ResolveInput);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ImportErrorKind::IncompleteSource).unwrap();
        assert_eq!(json, "\"incomplete_source\"");
    }
}
