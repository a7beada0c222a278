//! Album import API handlers for MusicBrainz and NetEase Cloud Music.

use std::sync::Arc;

use album_import_core::{
    ImportError, ImportErrorKind, ImportedAlbum, Provider, SearchPage, SearchQuery,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NetEaseParams {
    /// Album id or pasted album URL.
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ProviderAlbumParams {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ImportErrorKind,
}

/// An import failure rendered as `{"error", "kind"}`.
#[derive(Debug)]
pub struct ApiError(pub ImportError);

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ImportErrorKind) -> StatusCode {
    match kind {
        ImportErrorKind::InvalidIdentifier => StatusCode::BAD_REQUEST,
        ImportErrorKind::NotFound | ImportErrorKind::EmptyResult => StatusCode::NOT_FOUND,
        ImportErrorKind::IncompleteSource => StatusCode::UNPROCESSABLE_ENTITY,
        ImportErrorKind::AuthRequired => StatusCode::FORBIDDEN,
        ImportErrorKind::UpstreamError => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        (
            status_for(kind),
            Json(ErrorResponse {
                error: self.0.to_string(),
                kind,
            }),
        )
            .into_response()
    }
}

/// Unwrap query parameters, reporting malformed ones as an invalid identifier.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError(ImportError::InvalidIdentifier(rejection.body_text())))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/import/search?album=&artist=&limit=
///
/// Search MusicBrainz releases.
pub async fn search(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchPage>, ApiError> {
    let query = query_params(query)?;
    let page = state.import().search(&query).await?;
    Ok(Json(page))
}

/// GET /api/import/album/{mbid}
///
/// Import a MusicBrainz release.
pub async fn musicbrainz_album(
    State(state): State<Arc<AppState>>,
    Path(mbid): Path<String>,
) -> Result<Json<ImportedAlbum>, ApiError> {
    let album = state
        .import()
        .fetch_detail(Provider::MusicBrainz, &mbid)
        .await?;
    Ok(Json(album))
}

/// GET /api/import/netease?url=<id or url>
///
/// Import a NetEase Cloud Music album.
pub async fn netease_album(
    State(state): State<Arc<AppState>>,
    params: Result<Query<NetEaseParams>, QueryRejection>,
) -> Result<Json<ImportedAlbum>, ApiError> {
    let params = query_params(params)?;
    let album = state
        .import()
        .fetch_detail(Provider::NetEase, &params.url)
        .await?;
    Ok(Json(album))
}

/// GET /api/import/providers/{provider}/album?id=<id or url>
pub async fn provider_album(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    params: Result<Query<ProviderAlbumParams>, QueryRejection>,
) -> Result<Json<ImportedAlbum>, ApiError> {
    let params = query_params(params)?;
    let provider: Provider = provider.parse().map_err(ImportError::InvalidIdentifier)?;
    let album = state.import().fetch_detail(provider, &params.id).await?;
    Ok(Json(album))
}
