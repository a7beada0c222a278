//! Optional-field accessors over untyped provider JSON.
//!
//! Provider envelopes are kept as `serde_json::Value` trees. Every lookup goes
//! through these helpers so that a missing key, an explicit `null` and a value
//! of the wrong type are all treated the same way: as absent.

use serde_json::Value;

/// Tolerant field access for JSON objects.
pub trait JsonExt {
    /// Non-null value under `key`.
    fn field(&self, key: &str) -> Option<&Value>;

    /// Whether `key` is present at all, even with a `null` value.
    fn has_key(&self, key: &str) -> bool;

    /// String value under `key`.
    fn str_field(&self, key: &str) -> Option<&str>;

    /// Owned string value under `key`.
    fn string_field(&self, key: &str) -> Option<String> {
        self.str_field(key).map(str::to_string)
    }

    /// String value under `key` that is not blank.
    fn text_field(&self, key: &str) -> Option<String> {
        self.str_field(key)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }

    /// Non-negative integer under `key`. Fractional numbers are truncated.
    fn u64_field(&self, key: &str) -> Option<u64>;

    /// Signed integer under `key`.
    fn i64_field(&self, key: &str) -> Option<i64>;

    /// Identifier under `key`, accepting both strings and integers.
    fn id_field(&self, key: &str) -> Option<String>;

    /// Object under `key`.
    fn object_field(&self, key: &str) -> Option<&Value>;

    /// Array under `key`, or an empty slice.
    fn array_field(&self, key: &str) -> &[Value];
}

impl JsonExt for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }

    fn has_key(&self, key: &str) -> bool {
        self.as_object().is_some_and(|obj| obj.contains_key(key))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    fn u64_field(&self, key: &str) -> Option<u64> {
        let value = self.field(key)?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        })
    }

    fn i64_field(&self, key: &str) -> Option<i64> {
        self.field(key).and_then(Value::as_i64)
    }

    fn id_field(&self, key: &str) -> Option<String> {
        match self.field(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
            _ => None,
        }
    }

    fn object_field(&self, key: &str) -> Option<&Value> {
        self.field(key).filter(|v| v.is_object())
    }

    fn array_field(&self, key: &str) -> &[Value] {
        self.field(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_missing_are_absent() {
        let value = json!({ "title": null });
        assert!(value.field("title").is_none());
        assert!(value.field("missing").is_none());
        assert!(value.has_key("title"));
        assert!(!value.has_key("missing"));
    }

    #[test]
    fn test_wrong_types_are_absent() {
        let value = json!({ "length": "180000", "title": 42, "media": {} });
        assert_eq!(value.u64_field("length"), None);
        assert_eq!(value.str_field("title"), None);
        assert!(value.array_field("media").is_empty());
    }

    #[test]
    fn test_u64_field_rejects_negatives_and_truncates_floats() {
        let value = json!({ "a": -5, "b": 1234.9, "c": 7 });
        assert_eq!(value.u64_field("a"), None);
        assert_eq!(value.u64_field("b"), Some(1234));
        assert_eq!(value.u64_field("c"), Some(7));
    }

    #[test]
    fn test_id_field_accepts_numbers() {
        let value = json!({ "id": 12345, "mbid": "b1a9c0e9", "empty": "" });
        assert_eq!(value.id_field("id").as_deref(), Some("12345"));
        assert_eq!(value.id_field("mbid").as_deref(), Some("b1a9c0e9"));
        assert_eq!(value.id_field("empty"), None);
    }

    #[test]
    fn test_text_field_skips_blank() {
        let value = json!({ "name": "  ", "other": "x" });
        assert_eq!(value.text_field("name"), None);
        assert_eq!(value.text_field("other").as_deref(), Some("x"));
    }

    #[test]
    fn test_accessors_on_non_objects() {
        let value = json!([1, 2, 3]);
        assert!(value.field("x").is_none());
        assert!(!value.has_key("x"));
        assert!(Value::Null.array_field("releases").is_empty());
    }
}
