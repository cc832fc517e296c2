//! Ordered probes that locate text payloads inside arbitrary tool output

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

/// A text payload and the metadata found next to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    pub text: String,
    /// `(key, value)` pairs in `date`, `accession`, `url` order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<(String, String)>,
}

impl TextEntry {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta: Vec::new(),
        }
    }
}

type Probe = fn(&Map<String, Value>) -> Vec<TextEntry>;

/// Probes in priority order; every probe runs and all hits are kept
const PROBES: [(&str, Probe); 4] = [
    ("structured_content_result", structured_content_result),
    ("content_blocks", content_blocks),
    ("top_level_result", top_level_result),
    ("containers", containers),
];

const CONTAINER_KEYS: [&str; 4] = ["structured", "data", "structuredContent", "structured_result"];
const ITEM_TEXT_KEYS: [&str; 3] = ["snippet", "text", "body"];
const ITEM_META_KEYS: [&str; 3] = ["date", "accession", "url"];

/// Collect every text payload in `structured`
///
/// Falls back to the whole value rendered as JSON when no probe matches,
/// unless the value is itself empty.
pub fn collect_text_entries(structured: &Value) -> Vec<TextEntry> {
    let mut entries = Vec::new();

    if let Some(map) = structured.as_object() {
        for (name, probe) in PROBES {
            let found = probe(map);
            trace!(probe = name, hits = found.len(), "probed structured result");
            entries.extend(found);
        }
    }

    if entries.is_empty() {
        if let Some(text) = stringify(structured) {
            trace!("no probe matched, using whole value");
            entries.push(TextEntry::plain(text));
        }
    }

    entries
}

/// `structuredContent.result` when it is a string
fn structured_content_result(map: &Map<String, Value>) -> Vec<TextEntry> {
    map.get("structuredContent")
        .and_then(|sc| sc.get("result"))
        .and_then(Value::as_str)
        .map(TextEntry::plain)
        .into_iter()
        .collect()
}

/// `content[]` blocks tagged `"type": "text"`
fn content_blocks(map: &Map<String, Value>) -> Vec<TextEntry> {
    let Some(blocks) = map.get("content").and_then(Value::as_array) else {
        return Vec::new();
    };
    blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .map(TextEntry::plain)
        .collect()
}

/// A bare top-level `result` string
fn top_level_result(map: &Map<String, Value>) -> Vec<TextEntry> {
    map.get("result")
        .and_then(Value::as_str)
        .map(TextEntry::plain)
        .into_iter()
        .collect()
}

/// Conventional container keys holding a string, a list, or a map
fn containers(map: &Map<String, Value>) -> Vec<TextEntry> {
    let mut entries = Vec::new();
    for key in CONTAINER_KEYS {
        match map.get(key) {
            Some(Value::String(text)) => entries.push(TextEntry::plain(text.as_str())),
            Some(Value::Array(items)) => entries.extend(items.iter().filter_map(list_item)),
            Some(Value::Object(inner)) => {
                // structuredContent.result was already taken by the first probe
                let keys: &[&str] = if key == "structuredContent" {
                    &["snippet", "text"]
                } else {
                    &["snippet", "text", "result"]
                };
                if let Some(text) = first_text(inner, keys) {
                    entries.push(TextEntry::plain(text));
                }
            }
            _ => {}
        }
    }
    entries
}

fn list_item(item: &Value) -> Option<TextEntry> {
    match item {
        Value::String(text) => Some(TextEntry::plain(text.as_str())),
        Value::Object(fields) => {
            let text = first_text(fields, &ITEM_TEXT_KEYS)?;
            let meta = ITEM_META_KEYS
                .iter()
                .filter_map(|&k| fields.get(k).map(|v| (k.to_string(), display_value(v))))
                .collect();
            Some(TextEntry {
                text: text.to_string(),
                meta,
            })
        }
        _ => None,
    }
}

/// First non-empty string among `keys`
fn first_text<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| fields.get(*k).and_then(Value::as_str))
        .find(|text| !text.is_empty())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(value: &Value) -> Vec<String> {
        collect_text_entries(value).into_iter().map(|e| e.text).collect()
    }

    #[test]
    fn test_probe_priority_and_collection() {
        let value = json!({
            "data": "from data",
            "result": "top level",
            "content": [
                { "type": "text", "text": "block one" },
                { "type": "image", "text": "ignored" },
                { "type": "text", "text": "block two" }
            ],
            "structuredContent": { "result": "wrapped" }
        });
        assert_eq!(
            texts(&value),
            vec!["wrapped", "block one", "block two", "top level", "from data"]
        );
    }

    #[test]
    fn test_structured_content_not_duplicated() {
        let value = json!({ "structuredContent": { "result": "only once" } });
        assert_eq!(texts(&value), vec!["only once"]);
    }

    #[test]
    fn test_list_items_with_meta() {
        let value = json!({
            "structured": [
                { "snippet": "Notes converted.", "date": "2024-02-01", "accession": "0001", "url": "http://x" },
                { "text": "", "body": "body text", "date": null },
                { "title": "no text here" },
                "plain string",
                42
            ]
        });
        let entries = collect_text_entries(&value);
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].meta,
            vec![
                ("date".to_string(), "2024-02-01".to_string()),
                ("accession".to_string(), "0001".to_string()),
                ("url".to_string(), "http://x".to_string()),
            ]
        );
        assert_eq!(entries[1].text, "body text");
        assert_eq!(entries[1].meta, vec![("date".to_string(), "null".to_string())]);
        assert_eq!(entries[2], TextEntry::plain("plain string"));
    }

    #[test]
    fn test_container_map() {
        let value = json!({ "data": { "text": "nested text" } });
        assert_eq!(texts(&value), vec!["nested text"]);
    }

    #[test]
    fn test_fallback_stringifies() {
        let value = json!({ "ticker": "ACME", "count": 2 });
        let found = texts(&value);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains(r#""ticker":"ACME""#));
        assert!(found[0].contains(r#""count":2"#));
        assert_eq!(texts(&json!("bare string")), vec!["bare string"]);
    }

    #[test]
    fn test_empty_values_yield_nothing() {
        assert!(collect_text_entries(&json!({})).is_empty());
        assert!(collect_text_entries(&Value::Null).is_empty());
        assert!(collect_text_entries(&json!([])).is_empty());
        assert!(collect_text_entries(&json!("  ")).is_empty());
    }
}
