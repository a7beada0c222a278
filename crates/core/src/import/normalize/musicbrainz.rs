//! MusicBrainz release and search normalization.

use serde_json::Value;
use tracing::warn;

use super::release_year_from_date;
use crate::import::json::JsonExt;
use crate::import::{
    ArtistRef, ImportError, ImportedAlbum, Provider, SearchPage, SearchResultStub, TrackStub,
};
use crate::metrics::SEARCH_RESULTS_SKIPPED;

const PROVIDER: Provider = Provider::MusicBrainz;

/// Map a `release/<mbid>?inc=recordings+artist-credits` response.
pub fn normalize_release(release: &Value) -> Result<ImportedAlbum, ImportError> {
    let title = release
        .text_field("title")
        .ok_or_else(|| ImportError::incomplete(PROVIDER, "title"))?;

    let date = release.string_field("date");
    let release_year = date.as_deref().and_then(release_year_from_date);

    let artist = first_credited_artist(release).map(|artist| ArtistRef {
        name: artist.string_field("name"),
        external_id: artist.string_field("id"),
        photo_url: None,
    });

    let tracks = flatten_media(release)?;

    Ok(ImportedAlbum {
        provider: PROVIDER,
        external_id: release.string_field("id"),
        title,
        // Cover art is not resolved for MusicBrainz imports: the Cover Art
        // Archive is unreachable from some deployments.
        cover_url: None,
        description: None,
        release_year,
        date,
        country: release.string_field("country"),
        barcode: release.text_field("barcode"),
        artist,
        tracks,
    })
}

/// Map a `release/?query=...` response into a page of summaries.
///
/// Entries without an id or title are logged and skipped.
pub fn normalize_search_page(envelope: &Value) -> SearchPage {
    let results = envelope
        .array_field("releases")
        .iter()
        .enumerate()
        .filter_map(|(index, release)| match search_result(release) {
            Ok(stub) => Some(stub),
            Err(field) => {
                warn!(
                    "Skipping MusicBrainz search result #{}: missing '{}'",
                    index, field
                );
                SEARCH_RESULTS_SKIPPED
                    .with_label_values(&[PROVIDER.as_str()])
                    .inc();
                None
            }
        })
        .collect();

    SearchPage {
        results,
        count: envelope.u64_field("count"),
    }
}

fn search_result(release: &Value) -> Result<SearchResultStub, &'static str> {
    let external_id = release.id_field("id").ok_or("id")?;
    let title = release.text_field("title").ok_or("title")?;
    let artist = first_credited_artist(release);

    Ok(SearchResultStub {
        external_id,
        title,
        track_count: release
            .u64_field("track-count")
            .and_then(|n| u32::try_from(n).ok()),
        date: release.string_field("date"),
        country: release.string_field("country"),
        status: release.string_field("status"),
        artist_name: artist.and_then(|a| a.string_field("name")),
        artist_external_id: artist.and_then(|a| a.string_field("id")),
        primary_type: release
            .object_field("release-group")
            .and_then(|rg| rg.string_field("primary-type")),
    })
}

/// The `artist` object of the first artist credit, if any.
fn first_credited_artist(release: &Value) -> Option<&Value> {
    release
        .array_field("artist-credit")
        .first()
        .and_then(|credit| credit.object_field("artist"))
}

/// Flatten every medium's tracks into one list numbered from 1.
///
/// Per-medium positions in the source are ignored.
fn flatten_media(release: &Value) -> Result<Vec<TrackStub>, ImportError> {
    let mut tracks = Vec::new();

    for (medium_index, medium) in release.array_field("media").iter().enumerate() {
        for (track_index, track) in medium.array_field("tracks").iter().enumerate() {
            let title = track
                .text_field("title")
                .or_else(|| {
                    track
                        .object_field("recording")
                        .and_then(|recording| recording.text_field("title"))
                })
                .ok_or_else(|| {
                    ImportError::incomplete(
                        PROVIDER,
                        format!("media[{}].tracks[{}].title", medium_index, track_index),
                    )
                })?;

            let track_number = tracks.len() as u32 + 1;
            tracks.push(TrackStub::new(track_number, title, track.u64_field("length")));
        }
    }

    Ok(tracks)
}
