//! Text sanitization
//!
//! Post datasets are scraped text and routinely carry unpaired UTF-16
//! surrogates, either as JSON escapes (`"\ud83d"` with its partner lost to
//! truncation) or as generalized-UTF-8 bytes (`ED A0 BD`). A Rust `String`
//! cannot hold either, so every sanitizer here works at the boundary where
//! such data becomes a string and replaces each offending unit with U+FFFD.
//!
//! All functions are total and idempotent.

use serde_json::{Map, Value};
use std::borrow::Cow;

const REPLACEMENT_UTF8: &[u8] = "\u{FFFD}".as_bytes();
const REPLACEMENT_ESCAPE: &str = "\\ufffd";

/// Decode bytes as UTF-8, replacing anything that is not.
///
/// Strictly valid input is returned unchanged. Otherwise each 3-byte encoded
/// surrogate is replaced first, then any remaining invalid sequence is
/// replaced by lossy decoding.
pub fn sanitize_bytes(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_owned();
    }

    let mut cleaned = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if is_encoded_surrogate(&bytes[i..]) {
            cleaned.extend_from_slice(REPLACEMENT_UTF8);
            i += 3;
        } else {
            cleaned.push(bytes[i]);
            i += 1;
        }
    }

    match String::from_utf8(cleaned) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn is_encoded_surrogate(bytes: &[u8]) -> bool {
    matches!(bytes, [0xED, 0xA0..=0xBF, 0x80..=0xBF, ..])
}

/// Decode UTF-16 code units, replacing unpaired surrogates
pub fn sanitize_utf16(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Rewrite unpaired surrogate escapes in JSON text.
///
/// A `\uD800`-`\uDBFF` escape immediately followed by a `\uDC00`-`\uDFFF`
/// escape is a valid pair and kept. Any other surrogate escape becomes
/// `\ufffd`, so strict JSON decoding of the result cannot fail on it.
/// Escaped backslashes (`\\u...`) are not escapes and are left alone.
pub fn sanitize_json_text(text: &str) -> Cow<'_, str> {
    if !text.contains("\\u") {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let Some(unit) = escape_at(bytes, i) else {
            // Some other escape; skip the escaped character too
            i += 2;
            continue;
        };

        if is_high_surrogate(unit) {
            if escape_at(bytes, i + 6).is_some_and(is_low_surrogate) {
                i += 12;
                continue;
            }
        } else if !is_low_surrogate(unit) {
            i += 6;
            continue;
        }

        out.push_str(&text[copied_to..i]);
        out.push_str(REPLACEMENT_ESCAPE);
        i += 6;
        copied_to = i;
    }

    if copied_to == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[copied_to..]);
    Cow::Owned(out)
}

/// Code unit of a `\uXXXX` escape starting at `start`
fn escape_at(bytes: &[u8], start: usize) -> Option<u16> {
    let escape = bytes.get(start..start + 6)?;
    if escape[0] != b'\\' || escape[1] != b'u' {
        return None;
    }
    let digits = &escape[2..];
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let digits = std::str::from_utf8(digits).ok()?;
    u16::from_str_radix(digits, 16).ok()
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Sanitize a string value.
///
/// `str` is guaranteed valid Unicode, so nothing can need replacing; this
/// exists so callers treat strings like every other value.
pub fn sanitize_str(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

/// Sanitize a JSON value recursively.
///
/// Object keys and values are both sanitized with their association kept,
/// arrays keep their order, numbers, booleans and null pass through.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(text) => {
            if let Cow::Owned(cleaned) = sanitize_str(&text) {
                return Value::String(cleaned);
            }
            Value::String(text)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(fields) => Value::Object(sanitize_map(fields)),
        other => other,
    }
}

/// Sanitize every key and value of a JSON object
pub fn sanitize_map(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (sanitize_str(&key).into_owned(), sanitize_value(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_valid_utf8_unchanged() {
        assert_eq!(sanitize_bytes("héllo wörld 👋".as_bytes()), "héllo wörld 👋");
    }

    #[test]
    fn test_encoded_surrogate_replaced() {
        // "a" + lone high surrogate U+D83D in generalized UTF-8 + "b"
        let bytes = [b'a', 0xED, 0xA0, 0xBD, b'b'];
        assert_eq!(sanitize_bytes(&bytes), "a\u{FFFD}b");
    }

    #[test]
    fn test_other_invalid_bytes_replaced() {
        let bytes = [b'o', b'k', 0xFF, 0xFE];
        let cleaned = sanitize_bytes(&bytes);
        assert!(cleaned.starts_with("ok"));
        assert!(cleaned.contains('\u{FFFD}'));
    }

    #[test]
    fn test_truncated_surrogate_bytes_at_end() {
        let bytes = [b'x', 0xED, 0xA0];
        let cleaned = sanitize_bytes(&bytes);
        assert!(cleaned.starts_with('x'));
        assert!(cleaned.contains('\u{FFFD}'));
    }

    #[test]
    fn test_utf16_lone_surrogates() {
        let units = [0x0048, 0xD83D, 0x0069, 0xDC4B];
        assert_eq!(sanitize_utf16(&units), "H\u{FFFD}i\u{FFFD}");

        let pair: Vec<u16> = "👋".encode_utf16().collect();
        assert_eq!(sanitize_utf16(&pair), "👋");
    }

    #[test]
    fn test_json_lone_high_surrogate() {
        let text = r#"{"text": "hi \ud83d there"}"#;
        let cleaned = sanitize_json_text(text);
        assert_eq!(cleaned, r#"{"text": "hi \ufffd there"}"#);
        let value: Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(value["text"], "hi \u{FFFD} there");
    }

    #[test]
    fn test_json_lone_low_surrogate() {
        let cleaned = sanitize_json_text(r#""\uDC4B""#);
        assert_eq!(cleaned, r#""\ufffd""#);
    }

    #[test]
    fn test_json_valid_pair_kept() {
        let text = r#""\ud83d\udc4b""#;
        assert!(matches!(sanitize_json_text(text), Cow::Borrowed(_)));
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(value, "👋");
    }

    #[test]
    fn test_json_high_followed_by_pair() {
        let cleaned = sanitize_json_text(r#""\ud83d\ud83d\udc4b""#);
        assert_eq!(cleaned, r#""\ufffd\ud83d\udc4b""#);
    }

    #[test]
    fn test_json_escaped_backslash_ignored() {
        let text = r#""C:\\ud800""#;
        assert!(matches!(sanitize_json_text(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_json_non_surrogate_escapes_untouched() {
        let text = r#""caf\u00e9 \n \"quoted\"""#;
        assert!(matches!(sanitize_json_text(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_json_trailing_backslash() {
        assert_eq!(sanitize_json_text("abc\\u"), "abc\\u");
        assert_eq!(sanitize_json_text("abc\\"), "abc\\");
    }

    #[test]
    fn test_sanitize_value_preserves_structure() {
        let value = json!({
            "text": "Bonjour à tous",
            "engagement": 42,
            "nested": {"items": ["a", "b", null, true]},
        });
        assert_eq!(sanitize_value(value.clone()), value);
    }

    proptest! {
        #[test]
        fn test_bytes_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let once = sanitize_bytes(&bytes);
            let twice = sanitize_bytes(once.as_bytes());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_utf16_idempotent(units in proptest::collection::vec(any::<u16>(), 0..64)) {
            let once = sanitize_utf16(&units);
            let reencoded: Vec<u16> = once.encode_utf16().collect();
            prop_assert_eq!(sanitize_utf16(&reencoded), once);
        }

        #[test]
        fn test_json_text_idempotent(text in r"(\\u(d8|db|dc|df|00)[0-9a-f]{2}|[a-z \\])*") {
            let once = sanitize_json_text(&text).into_owned();
            let twice = sanitize_json_text(&once).into_owned();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_value_idempotent(text in ".*", key in "[a-z]{1,8}") {
            let mut fields = Map::new();
            fields.insert(key, json!([text, 1, null]));
            let value = Value::Object(fields);
            let once = sanitize_value(value);
            prop_assert_eq!(sanitize_value(once.clone()), once);
        }
    }
}
