//! Album identifier extraction from free-form user input.
//!
//! Accepts either a bare numeric id or a NetEase Cloud Music link in one of
//! the shapes users typically paste (desktop, mobile and share links).

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::ImportError;

/// URL shapes carrying an album id, in priority order.
static ALBUM_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // album?id=123, album/id/123
        r"album[?/]id[=/](\d+)",
        // album/123
        r"album/(\d+)",
        // any id=123 query fragment
        r"id=(\d+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Extract a numeric album id from a raw id or a recognized album URL.
pub fn resolve_album_id(input: &str) -> Result<String, ImportError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ImportError::InvalidIdentifier(
            "album id or URL is empty".to_string(),
        ));
    }

    if input.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(input.to_string());
    }

    ALBUM_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            ImportError::InvalidIdentifier(format!("not a recognized album URL: {}", input))
        })
}
