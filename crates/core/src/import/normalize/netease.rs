//! NetEase Cloud Music album normalization.

use serde_json::Value;

use super::release_year_from_millis;
use crate::import::json::JsonExt;
use crate::import::{ArtistRef, ImportError, ImportedAlbum, Provider, TrackStub};

const PROVIDER: Provider = Provider::NetEase;

/// Map an `api/album/<id>` response (`{code, album, songs}`).
pub fn normalize_album(envelope: &Value) -> Result<ImportedAlbum, ImportError> {
    let album = envelope
        .object_field("album")
        .ok_or_else(|| ImportError::incomplete(PROVIDER, "album"))?;

    let title = album
        .text_field("name")
        .ok_or_else(|| ImportError::incomplete(PROVIDER, "album.name"))?;

    // A present-but-null description becomes "", an absent one stays absent.
    let description = match album.get("description") {
        None => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => Some(String::new()),
    };

    let artist = album.object_field("artist").map(|artist| ArtistRef {
        name: artist.string_field("name"),
        external_id: artist.id_field("id"),
        photo_url: artist.string_field("picUrl"),
    });

    // Older responses carry songs at the top level, newer ones inside the album.
    let songs = if envelope.field("songs").is_some() {
        envelope.array_field("songs")
    } else {
        album.array_field("songs")
    };

    let tracks = songs
        .iter()
        .enumerate()
        .map(|(index, song)| {
            let title = song
                .text_field("name")
                .ok_or_else(|| ImportError::incomplete(PROVIDER, format!("songs[{}].name", index)))?;
            Ok(TrackStub::new(
                index as u32 + 1,
                title,
                song.u64_field("duration"),
            ))
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    Ok(ImportedAlbum {
        provider: PROVIDER,
        external_id: album.id_field("id"),
        title,
        cover_url: album.string_field("picUrl"),
        description,
        release_year: album
            .i64_field("publishTime")
            .and_then(release_year_from_millis),
        date: None,
        country: None,
        barcode: None,
        artist,
        tracks,
    })
}
