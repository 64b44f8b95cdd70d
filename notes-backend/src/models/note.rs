//! Note entity and the tag-normalization codec.
//!
//! Tags arrive as a list, a JSON-encoded string, or a comma-separated string
//! and are canonicalized to a JSON array for storage. Decoding tolerates
//! malformed stored data by wrapping it as a single tag instead of erroring.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// A stored note row. `tags` holds the canonical JSON-array encoding
/// produced by [`encode_tags`]; decoding happens at serialization time.
#[derive(Debug, Clone)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JSON response shape for a note.
#[derive(Debug, Serialize)]
pub struct NoteView {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

impl Note {
    /// Serialize for JSON responses: tags decoded, timestamps as UTC ISO-8601.
    pub fn to_representation(&self) -> NoteView {
        NoteView {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            tags: decode_tags(self.tags.as_deref()),
            created_at: format_timestamp(&self.created_at),
            updated_at: format_timestamp(&self.updated_at),
        }
    }
}

/// UTC ISO-8601 with a `Z` suffix, microsecond precision. Also the stored
/// column format, so timestamps sort lexicographically.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Inbound tags as clients may send them: a list, a plain or JSON-encoded
/// string, or any other JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum TagsInput {
    List(Vec<Value>),
    Text(String),
    Other(Value),
}

/// String form of a JSON value: strings verbatim, everything else as its
/// compact JSON text.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn stringify_all(items: &[Value]) -> Vec<String> {
    items.iter().map(value_to_string).collect()
}

/// Canonicalize inbound tags to the stored JSON-array encoding.
pub fn encode_tags(input: Option<&TagsInput>) -> Option<String> {
    let input = input?;
    let tags = match input {
        TagsInput::List(items) => stringify_all(items),
        TagsInput::Text(raw) => {
            let trimmed = raw.trim();
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Array(items)) => stringify_all(&items),
                // Valid JSON but not a list: the whole string is one tag
                Ok(_) => vec![trimmed.to_string()],
                // Not JSON: comma-separated tags
                Err(_) => trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect(),
            }
        }
        TagsInput::Other(value) => vec![value_to_string(value)],
    };
    Some(Value::from(tags).to_string())
}

/// Decode the stored form back to an ordered tag sequence. Malformed stored
/// data degrades to a single-element sequence wrapping the raw text.
pub fn decode_tags(stored: Option<&str>) -> Option<Vec<String>> {
    let stored = stored?;
    Some(match serde_json::from_str::<Value>(stored) {
        Ok(Value::Array(items)) => stringify_all(&items),
        Ok(other) => vec![value_to_string(&other)],
        Err(_) => vec![stored.to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(raw: &str) -> TagsInput {
        TagsInput::Text(raw.to_string())
    }

    #[test]
    fn test_encode_none_is_none() {
        assert_eq!(encode_tags(None), None);
        assert_eq!(decode_tags(None), None);
    }

    #[test]
    fn test_encode_list_preserves_order() {
        let input = TagsInput::List(vec![json!("x"), json!("y")]);
        let stored = encode_tags(Some(&input)).unwrap();
        assert_eq!(stored, r#"["x","y"]"#);
        assert_eq!(decode_tags(Some(&stored)), Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_encode_list_stringifies_non_strings() {
        let input = TagsInput::List(vec![json!(1), json!(true), json!("a")]);
        let decoded = decode_tags(encode_tags(Some(&input)).as_deref()).unwrap();
        assert_eq!(decoded, vec!["1", "true", "a"]);
    }

    #[test]
    fn test_encode_comma_separated_string() {
        let stored = encode_tags(Some(&text("a, b, ,c"))).unwrap();
        assert_eq!(stored, r#"["a","b","c"]"#);
    }

    #[test]
    fn test_encode_json_encoded_string() {
        let stored = encode_tags(Some(&text("[\"p\",\"q\"]"))).unwrap();
        assert_eq!(stored, r#"["p","q"]"#);
    }

    #[test]
    fn test_encode_json_non_list_is_single_tag() {
        // Parses as a JSON number, so the whole string is one tag
        let stored = encode_tags(Some(&text("42"))).unwrap();
        assert_eq!(stored, r#"["42"]"#);
    }

    #[test]
    fn test_encode_empty_string_is_empty_sequence() {
        assert_eq!(encode_tags(Some(&text(""))).unwrap(), "[]");
        assert_eq!(encode_tags(Some(&text(" , , "))).unwrap(), "[]");
    }

    #[test]
    fn test_encode_other_wraps_single_element() {
        let stored = encode_tags(Some(&TagsInput::Other(json!(7)))).unwrap();
        assert_eq!(stored, r#"["7"]"#);
    }

    #[test]
    fn test_encode_is_idempotent_after_first_pass() {
        let stored = encode_tags(Some(&text("a, b, ,c"))).unwrap();
        // Re-encoding the canonical form as a text input yields itself
        let again = encode_tags(Some(&text(&stored))).unwrap();
        assert_eq!(stored, again);
    }

    #[test]
    fn test_decode_corrupt_data_falls_back_to_raw_text() {
        assert_eq!(
            decode_tags(Some("not json at all")),
            Some(vec!["not json at all".to_string()])
        );
    }

    #[test]
    fn test_decode_non_list_json_wraps_value() {
        assert_eq!(decode_tags(Some("\"solo\"")), Some(vec!["solo".to_string()]));
        assert_eq!(decode_tags(Some("3")), Some(vec!["3".to_string()]));
    }

    #[test]
    fn test_representation_decodes_tags_and_formats_timestamps() {
        let now = Utc::now();
        let note = Note {
            id: 1,
            title: "t".to_string(),
            content: None,
            tags: Some(r#"["a","b"]"#.to_string()),
            created_at: now,
            updated_at: now,
        };
        let view = note.to_representation();
        assert_eq!(view.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(view.created_at.ends_with('Z'));
        assert_eq!(view.created_at, view.updated_at);
    }
}
