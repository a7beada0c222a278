//! Canonical import types shared by every provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// Provider
// ============================================================================

/// An external metadata catalog an album can be imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// MusicBrainz, the open discography database.
    MusicBrainz,
    /// NetEase Cloud Music, a commercial streaming catalog.
    NetEase,
}

impl Provider {
    /// Stable machine name, used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::MusicBrainz => "musicbrainz",
            Provider::NetEase => "netease",
        }
    }

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::MusicBrainz => "MusicBrainz",
            Provider::NetEase => "NetEase Cloud Music",
        }
    }

    /// The other provider, suggested to users when this one refuses a request.
    pub fn alternative(&self) -> Provider {
        match self {
            Provider::MusicBrainz => Provider::NetEase,
            Provider::NetEase => Provider::MusicBrainz,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = String;

    /// Parse a machine name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "musicbrainz" => Ok(Provider::MusicBrainz),
            "netease" => Ok(Provider::NetEase),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

// ============================================================================
// Imported album
// ============================================================================

/// A provider-independent album record, ready to be persisted by the caller.
///
/// Built fresh for every request by one of the normalizers. The track count is
/// not stored: it is always derived from `tracks`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedAlbum {
    /// Provider the record was imported from.
    pub provider: Provider,
    /// Provider identifier of the release (MBID or NetEase album id).
    pub external_id: Option<String>,
    /// Album title.
    pub title: String,
    /// Cover image URL.
    pub cover_url: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Four digit release year.
    pub release_year: Option<i32>,
    /// Raw release date as reported by the provider (YYYY-MM-DD or partial).
    pub date: Option<String>,
    /// Release country.
    pub country: Option<String>,
    /// Release barcode.
    pub barcode: Option<String>,
    /// Primary credited artist.
    pub artist: Option<ArtistRef>,
    /// Tracks in global order.
    pub tracks: Vec<TrackStub>,
}

impl ImportedAlbum {
    /// Number of tracks on the release.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Total running time in seconds, if every track has a duration.
    pub fn total_duration_seconds(&self) -> Option<u64> {
        let durations: Vec<u64> = self
            .tracks
            .iter()
            .filter_map(|t| t.duration_seconds)
            .collect();

        if durations.len() == self.tracks.len() && !durations.is_empty() {
            Some(durations.iter().sum())
        } else {
            None
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportedAlbumRepr<'a> {
    provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    barcode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artist: Option<&'a ArtistRef>,
    tracks: &'a [TrackStub],
    track_count: usize,
}

impl Serialize for ImportedAlbum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ImportedAlbumRepr {
            provider: self.provider,
            external_id: self.external_id.as_deref(),
            title: &self.title,
            cover_url: self.cover_url.as_deref(),
            description: self.description.as_deref(),
            release_year: self.release_year,
            date: self.date.as_deref(),
            country: self.country.as_deref(),
            barcode: self.barcode.as_deref(),
            artist: self.artist.as_ref(),
            tracks: &self.tracks,
            track_count: self.track_count(),
        }
        .serialize(serializer)
    }
}

/// Artist credited on an imported album.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A single track of an imported album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackStub {
    /// Position across the whole release, starting at 1.
    pub track_number: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u64>,
}

impl TrackStub {
    /// Build a track, deriving the display fields from a millisecond duration.
    pub fn new(track_number: u32, title: impl Into<String>, duration_ms: Option<u64>) -> Self {
        let duration_seconds = duration_ms.map(|ms| ms / 1000);
        Self {
            track_number,
            title: title.into(),
            duration_seconds,
            minutes: duration_seconds.map(|s| s / 60),
            seconds: duration_seconds.map(|s| s % 60),
        }
    }
}

// ============================================================================
// Search
// ============================================================================

/// Search parameters for a release lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Trimmed album name, if one was given.
    pub fn album_term(&self) -> Option<&str> {
        non_blank(self.album.as_deref())
    }

    /// Trimmed artist name, if one was given.
    pub fn artist_term(&self) -> Option<&str> {
        non_blank(self.artist.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A lightweight release summary returned by searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultStub {
    pub external_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_type: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub results: Vec<SearchResultStub>,
    /// Total number of matches reported by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl SearchPage {
    /// A page with no results.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("musicbrainz".parse::<Provider>(), Ok(Provider::MusicBrainz));
        assert_eq!("NetEase".parse::<Provider>(), Ok(Provider::NetEase));
        assert!("spotify".parse::<Provider>().is_err());
    }

    #[test]
    fn test_track_stub_derives_display_fields() {
        let track = TrackStub::new(3, "Something", Some(182_999));
        assert_eq!(track.duration_seconds, Some(182));
        assert_eq!(track.minutes, Some(3));
        assert_eq!(track.seconds, Some(2));
    }

    #[test]
    fn test_track_stub_minutes_and_seconds_recompose() {
        for ms in [0u64, 999, 1_000, 59_999, 60_000, 61_500, 3_599_999, 7_200_001] {
            let track = TrackStub::new(1, "t", Some(ms));
            let total = track.duration_seconds.unwrap();
            assert_eq!(total, ms / 1000);
            assert_eq!(track.minutes.unwrap() * 60 + track.seconds.unwrap(), total);
        }
    }

    #[test]
    fn test_track_stub_without_duration() {
        let track = TrackStub::new(1, "Intro", None);
        assert_eq!(track.duration_seconds, None);
        assert_eq!(track.minutes, None);
        assert_eq!(track.seconds, None);
    }

    #[test]
    fn test_imported_album_serializes_computed_track_count() {
        let album = ImportedAlbum {
            provider: Provider::MusicBrainz,
            external_id: Some("mbid-1".to_string()),
            title: "Abbey Road".to_string(),
            cover_url: None,
            description: None,
            release_year: Some(1969),
            date: Some("1969-09-26".to_string()),
            country: Some("GB".to_string()),
            barcode: None,
            artist: None,
            tracks: vec![
                TrackStub::new(1, "Come Together", Some(259_000)),
                TrackStub::new(2, "Something", None),
            ],
        };

        let json = serde_json::to_value(&album).unwrap();
        assert_eq!(json["trackCount"], 2);
        assert_eq!(json["releaseYear"], 1969);
        assert_eq!(json["provider"], "musicbrainz");
        assert_eq!(json["tracks"][0]["trackNumber"], 1);
        assert_eq!(json["tracks"][0]["durationSeconds"], 259);
        assert!(json.get("coverUrl").is_none());
        assert!(json["tracks"][1].get("minutes").is_none());
    }

    #[test]
    fn test_total_duration_requires_every_track() {
        let mut album = ImportedAlbum {
            provider: Provider::NetEase,
            external_id: None,
            title: "Test".to_string(),
            cover_url: None,
            description: None,
            release_year: None,
            date: None,
            country: None,
            barcode: None,
            artist: None,
            tracks: vec![
                TrackStub::new(1, "a", Some(100_000)),
                TrackStub::new(2, "b", Some(200_000)),
            ],
        };
        assert_eq!(album.total_duration_seconds(), Some(300));

        album.tracks.push(TrackStub::new(3, "c", None));
        assert_eq!(album.total_duration_seconds(), None);
    }

    #[test]
    fn test_search_query_terms_are_trimmed() {
        let query = SearchQuery {
            album: Some("  Abbey Road ".to_string()),
            artist: Some("   ".to_string()),
            limit: None,
        };
        assert_eq!(query.album_term(), Some("Abbey Road"));
        assert_eq!(query.artist_term(), None);
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(Provider::MusicBrainz.as_str(), "musicbrainz");
        assert_eq!(Provider::NetEase.to_string(), "NetEase Cloud Music");
        assert_eq!(Provider::NetEase.alternative(), Provider::MusicBrainz);

        let parsed: Provider = serde_json::from_str("\"netease\"").unwrap();
        assert_eq!(parsed, Provider::NetEase);
    }
}
