//! Encoding and decoding of tooth-status payloads inside note text.
//!
//! Wire shape of an encoded note:
//!
//! ```text
//! <free text>
//! [ToothStatus]: {"T11":"normal","T26":"cavity"}
//! ```
//!
//! Notes written before the marker existed may hold the bare JSON object, so decoding falls
//! back to parsing the whole note when the marker is absent.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Literal marker separating free text from the serialised status map.
pub const TOOTH_STATUS_MARKER: &str = "[ToothStatus]:";

/// Mapping from tooth identifier (`T26`) to a free-text status label.
pub type ToothStatusMap = BTreeMap<String, String>;

/// Result of classifying a stored note for display.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedNote {
    /// The note carries a tooth-status payload with at least one tooth key.
    ToothChart {
        /// Entries whose key is a tooth identifier.
        teeth: ToothStatusMap,
        /// Text preceding the marker, trimmed. Empty when the marker was absent.
        free_text: String,
        /// Payload keys that are not tooth identifiers.
        other_fields: Map<String, Value>,
    },

    /// Well-formed JSON object or array without any tooth key.
    StructuredText {
        value: Value,
        /// Text preceding the marker, trimmed. Empty when the marker was absent.
        free_text: String,
    },

    /// Anything else, preserved exactly as stored.
    PlainText(String),
}

impl DecodedNote {
    /// Render the note as display text.
    ///
    /// Tooth charts become one `tooth: status` line per tooth, structured values are
    /// pretty-printed, and plain text is returned unchanged (line breaks included).
    pub fn render(&self) -> String {
        match self {
            DecodedNote::ToothChart {
                teeth,
                free_text,
                other_fields,
            } => {
                let mut lines = Vec::new();
                if !free_text.is_empty() {
                    lines.push(free_text.clone());
                }
                for cell in crate::chart_view(teeth) {
                    lines.push(format!("{}: {}", cell.tooth, cell.category.label()));
                }
                for (key, value) in other_fields {
                    lines.push(format!("{key}: {}", status_text(value.clone())));
                }
                lines.join("\n")
            }
            DecodedNote::StructuredText { value, free_text } => {
                let pretty =
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                if free_text.is_empty() {
                    pretty
                } else if is_empty_container(value) {
                    free_text.clone()
                } else {
                    format!("{free_text}\n{pretty}")
                }
            }
            DecodedNote::PlainText(text) => text.clone(),
        }
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Returns true when `key` matches `^T\d+$`, ignoring case.
pub fn is_tooth_key(key: &str) -> bool {
    tooth_number(key).is_some()
}

/// Numeric part of a tooth key, or `None` when the key is not a tooth identifier.
pub(crate) fn tooth_number(key: &str) -> Option<u32> {
    let digits = key.strip_prefix('T').or_else(|| key.strip_prefix('t'))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Absurdly long digit runs are still tooth keys; they just sort last.
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// Append a serialised status map to `free_text`.
///
/// Keys are written exactly as supplied. The payload is a flat JSON object.
pub fn encode(map: &ToothStatusMap, free_text: &str) -> String {
    encode_payload(map, &Map::new(), free_text)
}

/// Serialise tooth entries together with non-tooth fields carried over from a decoded note.
///
/// A tooth entry replaces an extra field stored under the same key.
pub(crate) fn encode_payload(
    teeth: &ToothStatusMap,
    other_fields: &Map<String, Value>,
    free_text: &str,
) -> String {
    let mut payload = other_fields.clone();
    for (tooth, status) in teeth {
        payload.insert(tooth.clone(), Value::String(status.clone()));
    }

    format!(
        "{free_text}\n{TOOTH_STATUS_MARKER} {}",
        Value::Object(payload)
    )
}

/// Classify a stored note. Never fails.
///
/// The payload follows the last marker whose remainder parses as JSON, so free text that
/// itself quotes the marker still decodes.
pub fn decode(note: &str) -> DecodedNote {
    let parsed = if note.contains(TOOTH_STATUS_MARKER) {
        note.rmatch_indices(TOOTH_STATUS_MARKER)
            .find_map(|(idx, _)| {
                let payload = &note[idx + TOOTH_STATUS_MARKER.len()..];
                serde_json::from_str::<Value>(payload)
                    .ok()
                    .map(|value| (note[..idx].trim(), value))
            })
    } else {
        serde_json::from_str::<Value>(note).ok().map(|value| ("", value))
    };

    let Some((free_text, value)) = parsed else {
        return DecodedNote::PlainText(note.to_owned());
    };

    match value {
        Value::Object(fields) if fields.keys().any(|k| is_tooth_key(k)) => {
            let mut teeth = ToothStatusMap::new();
            let mut other_fields = Map::new();
            for (key, value) in fields {
                if is_tooth_key(&key) {
                    teeth.insert(key, status_text(value));
                } else {
                    other_fields.insert(key, value);
                }
            }
            DecodedNote::ToothChart {
                teeth,
                free_text: free_text.to_owned(),
                other_fields,
            }
        }
        value @ (Value::Object(_) | Value::Array(_)) => DecodedNote::StructuredText {
            value,
            free_text: free_text.to_owned(),
        },
        // Bare scalars ("42", "true") are prose as far as a reader is concerned.
        _ => DecodedNote::PlainText(note.to_owned()),
    }
}

fn status_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
