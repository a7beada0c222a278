//! Testing utilities for the import engine.
//!
//! [`MockUpstream`] stands in for a provider client, and [`fixtures`] builds
//! provider-shaped JSON bodies to feed it.
//!
//! # Example
//!
//! ```rust,ignore
//! use album_import_core::testing::{fixtures, MockUpstream};
//!
//! let musicbrainz = Arc::new(MockUpstream::new(Provider::MusicBrainz));
//! let netease = Arc::new(MockUpstream::new(Provider::NetEase));
//! netease.push_response(fixtures::netease_auth_required()).await;
//!
//! let service = ImportService::new(musicbrainz, netease, ImportConfig::default());
//! ```

mod mock_upstream;

pub use mock_upstream::MockUpstream;

/// Provider-shaped JSON bodies.
pub mod fixtures {
    use serde_json::{json, Value};

    /// A MusicBrainz release lookup body.
    ///
    /// `media` gives the track count of each medium. Tracks restart their
    /// `position` at 1 on every medium, as MusicBrainz does.
    pub fn musicbrainz_release(mbid: &str, title: &str, media: &[u32]) -> Value {
        let media: Vec<Value> = media
            .iter()
            .enumerate()
            .map(|(disc, &count)| {
                let tracks: Vec<Value> = (1..=count)
                    .map(|position| {
                        json!({
                            "position": position,
                            "title": format!("Disc {} Track {}", disc + 1, position),
                            "length": 180_000 + u64::from(position) * 1_000,
                        })
                    })
                    .collect();
                json!({ "position": disc + 1, "track-count": count, "tracks": tracks })
            })
            .collect();

        json!({
            "id": mbid,
            "title": title,
            "date": "1969-09-26",
            "country": "GB",
            "barcode": "077774644129",
            "artist-credit": [
                { "name": "The Beatles", "artist": { "id": "b10bbbfc-cf9e-42e0-be17-e2c3e1d2600d", "name": "The Beatles" } }
            ],
            "media": media,
        })
    }

    /// A MusicBrainz release search body from `(mbid, title)` pairs.
    pub fn musicbrainz_search(releases: &[(&str, &str)]) -> Value {
        let releases: Vec<Value> = releases
            .iter()
            .map(|(mbid, title)| {
                json!({
                    "id": mbid,
                    "title": title,
                    "status": "Official",
                    "date": "1969-09-26",
                    "country": "GB",
                    "track-count": 17,
                    "artist-credit": [
                        { "artist": { "id": "b10bbbfc-cf9e-42e0-be17-e2c3e1d2600d", "name": "The Beatles" } }
                    ],
                    "release-group": { "primary-type": "Album" },
                })
            })
            .collect();

        json!({ "count": releases.len(), "offset": 0, "releases": releases })
    }

    /// A successful NetEase album body from `(name, duration_ms)` songs.
    pub fn netease_album(id: u64, name: &str, songs: &[(&str, Option<u64>)]) -> Value {
        let songs: Vec<Value> = songs
            .iter()
            .enumerate()
            .map(|(index, (song, duration))| {
                json!({ "id": id * 100 + index as u64, "name": song, "duration": duration })
            })
            .collect();

        json!({
            "code": 200,
            "album": {
                "id": id,
                "name": name,
                "picUrl": format!("https://p1.music.126.net/{}.jpg", id),
                "description": "Debut studio album.",
                "publishTime": 1_000_000_000_000_i64,
                "artist": { "id": 6452, "name": "Jay Chou", "picUrl": "https://p1.music.126.net/6452.jpg" },
            },
            "songs": songs,
        })
    }

    /// A NetEase body rejecting an anonymous request.
    pub fn netease_auth_required() -> Value {
        json!({ "code": -462, "msg": "need login" })
    }

    /// A NetEase body with an arbitrary business error code.
    pub fn netease_error(code: i64) -> Value {
        json!({ "code": code, "msg": "error" })
    }
}
