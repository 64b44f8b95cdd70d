//! Inbound payload validation for note create/update.
//!
//! Validation returns a structured result instead of raising: either the
//! normalized fields or the first violated rule's message. Tags are type
//! checked here but normalized later by the codec, at persistence time.

use serde_json::Value;

use crate::models::TagsInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// Fields that were present and valid in the payload. Keys never supplied
/// stay `None`, so updates can tell "not provided" from "provided".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NormalizedNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<TagsInput>,
}

const TITLE_MAX_CHARS: usize = 200;

/// Validate a raw JSON payload for note creation or update.
/// JSON `null` counts as the field being absent.
pub fn validate_note_payload(
    payload: &Value,
    mode: ValidationMode,
) -> Result<NormalizedNote, String> {
    let Some(fields) = payload.as_object() else {
        return Err("Invalid JSON body.".to_string());
    };

    let mut normalized = NormalizedNote::default();

    match fields.get("title").filter(|v| !v.is_null()) {
        None => {
            if mode == ValidationMode::Create {
                return Err("Field 'title' is required.".to_string());
            }
        }
        Some(value) => {
            let Some(title) = value.as_str() else {
                return Err("Field 'title' must be a string.".to_string());
            };
            let title = title.trim();
            let length = title.chars().count();
            if length < 1 || length > TITLE_MAX_CHARS {
                return Err(
                    "Field 'title' length must be between 1 and 200 characters.".to_string()
                );
            }
            normalized.title = Some(title.to_string());
        }
    }

    if let Some(value) = fields.get("content").filter(|v| !v.is_null()) {
        let Some(content) = value.as_str() else {
            return Err("Field 'content' must be a string.".to_string());
        };
        normalized.content = Some(content.to_string());
    }

    if let Some(value) = fields.get("tags").filter(|v| !v.is_null()) {
        normalized.tags = Some(match value {
            Value::Array(items) => TagsInput::List(items.clone()),
            Value::String(raw) => TagsInput::Text(raw.clone()),
            _ => {
                return Err(
                    "Field 'tags' must be a list of strings or a comma-separated string."
                        .to_string(),
                );
            }
        });
    }

    Ok(normalized)
}
