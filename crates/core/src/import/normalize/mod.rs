//! Per-provider mapping of raw envelopes into [`ImportedAlbum`] records.
//!
//! Normalizers are total over arbitrary JSON: missing optional data never
//! fails, only a missing required field yields `IncompleteSource`.
//!
//! [`ImportedAlbum`]: super::ImportedAlbum

mod musicbrainz;
mod netease;

pub use musicbrainz::{normalize_release, normalize_search_page};
pub use netease::normalize_album;

use chrono::{Datelike, Local, TimeZone};

const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 9999;

fn plausible_year(year: i32) -> Option<i32> {
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

/// Release year from the first four characters of a date string.
///
/// `"1969-09-26"`, `"1969-09"` and `"1969"` all give 1969. Anything whose
/// first four characters are not all digits gives `None`.
pub fn release_year_from_date(date: &str) -> Option<i32> {
    let prefix = date.get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok().and_then(plausible_year)
}

/// Release year of a millisecond Unix timestamp in the server's local time zone.
pub fn release_year_from_millis(timestamp_ms: i64) -> Option<i32> {
    release_year_from_millis_in(timestamp_ms, &Local)
}

/// Release year of a millisecond Unix timestamp in the given time zone.
pub fn release_year_from_millis_in<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<i32> {
    tz.timestamp_millis_opt(timestamp_ms)
        .earliest()
        .map(|dt| dt.year())
        .and_then(plausible_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_year_from_full_and_partial_dates() {
        assert_eq!(release_year_from_date("1969-09-26"), Some(1969));
        assert_eq!(release_year_from_date("1969-09"), Some(1969));
        assert_eq!(release_year_from_date("1969"), Some(1969));
    }

    #[test]
    fn test_year_from_malformed_dates() {
        for date in ["", "196", "abcd-01-01", "19x9", "-969", " 1969", "０１２３4"] {
            assert_eq!(release_year_from_date(date), None, "date {:?}", date);
        }
    }

    #[test]
    fn test_year_out_of_range() {
        assert_eq!(release_year_from_date("0999-01-01"), None);
        assert_eq!(release_year_from_date("0000"), None);
        assert_eq!(release_year_from_date("1000"), Some(1000));
        assert_eq!(release_year_from_date("9999-12-31"), Some(9999));
    }

    #[test]
    fn test_year_is_always_in_range() {
        let samples = [
            "2024-01-01", "1", "12", "123", "1234", "99999", "????", "2x24", "۲۰۲۴",
        ];
        for date in samples {
            if let Some(year) = release_year_from_date(date) {
                assert!((1000..=9999).contains(&year));
            }
        }
    }

    #[test]
    fn test_year_from_millis_utc() {
        // 2019-12-31T23:30:00Z
        assert_eq!(release_year_from_millis_in(1_577_835_000_000, &Utc), Some(2019));
        // 1969-09-24T00:00:00Z
        assert_eq!(release_year_from_millis_in(-8_553_600_000, &Utc), Some(1969));
    }

    #[test]
    fn test_year_from_millis_depends_on_zone() {
        // 2019-12-31T23:30:00Z is already 2020 at UTC+8
        let beijing = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(release_year_from_millis_in(1_577_835_000_000, &beijing), Some(2020));
    }

    #[test]
    fn test_year_from_millis_out_of_range() {
        assert_eq!(release_year_from_millis_in(i64::MAX, &Utc), None);
    }
}
