//! Delta text extraction from upstream `data:` lines.

use std::borrow::Cow;

use serde_json::{Map, Value};

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// Shape of `choices[0].delta.content` in an upstream chunk.
#[derive(Debug, PartialEq)]
pub enum DeltaContent<'a> {
    Plain(&'a str),
    Parts(Vec<ContentPart<'a>>),
    Structured(Option<Cow<'a, str>>),
    Absent,
}

/// One element of an array-valued `content`.
#[derive(Debug, PartialEq)]
pub enum ContentPart<'a> {
    Text(&'a str),
    Object(Option<Cow<'a, str>>),
    Other,
}

impl<'a> DeltaContent<'a> {
    pub fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::String(s)) => DeltaContent::Plain(s),
            Some(Value::Array(parts)) => {
                DeltaContent::Parts(parts.iter().map(ContentPart::from_value).collect())
            }
            Some(Value::Object(map)) => DeltaContent::Structured(text_field(map)),
            _ => DeltaContent::Absent,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            DeltaContent::Plain(s) => s.to_string(),
            DeltaContent::Parts(parts) => parts.into_iter().map(ContentPart::into_text).collect(),
            DeltaContent::Structured(text) => text.map(Cow::into_owned).unwrap_or_default(),
            DeltaContent::Absent => String::new(),
        }
    }
}

impl<'a> ContentPart<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(s) => ContentPart::Text(s),
            Value::Object(map) => ContentPart::Object(text_field(map)),
            _ => ContentPart::Other,
        }
    }

    fn into_text(self) -> Cow<'a, str> {
        match self {
            ContentPart::Text(s) => Cow::Borrowed(s),
            ContentPart::Object(text) => text.unwrap_or_default(),
            ContentPart::Other => Cow::Borrowed(""),
        }
    }
}

/// The `text` field of a content object, rendered as text.
///
/// Strings are used as-is; non-zero numbers and `true` are stringified.
/// Falsy scalars, nested objects and arrays yield nothing.
fn text_field(map: &Map<String, Value>) -> Option<Cow<'_, str>> {
    match map.get("text")? {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
            Some(Cow::Owned(n.to_string()))
        }
        Value::Bool(true) => Some(Cow::Borrowed("true")),
        _ => None,
    }
}

/// Extract delta text from one upstream line.
///
/// Returns `None` for lines that carry no text: non-`data:` lines, empty
/// payloads, the `[DONE]` sentinel, malformed JSON, and empty deltas.
pub fn extract_delta(line: &str) -> Option<String> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() || payload == DONE_SENTINEL {
        return None;
    }

    let chunk: Value = serde_json::from_str(payload).ok()?;
    let text = DeltaContent::from_value(chunk.pointer("/choices/0/delta/content")).into_text();

    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_content() {
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#).as_deref(),
            Some("Hello")
        );
    }

    #[test]
    fn test_no_space_after_prefix() {
        assert_eq!(
            extract_delta(r#"data:{"choices":[{"delta":{"content":"x"}}]}"#).as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_parts_content() {
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":[{"text":"x"},"y"]}}]}"#)
                .as_deref(),
            Some("xy")
        );
    }

    #[test]
    fn test_parts_skip_textless_entries() {
        let value = json!([{"type": "image"}, 7, null, "a", {"text": "b"}]);
        assert_eq!(DeltaContent::from_value(Some(&value)).into_text(), "ab");
    }

    #[test]
    fn test_structured_content() {
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":{"text":"z"}}}]}"#).as_deref(),
            Some("z")
        );
        let value = json!({"type": "text"});
        assert_eq!(
            DeltaContent::from_value(Some(&value)),
            DeltaContent::Structured(None)
        );
    }

    #[test]
    fn test_skipped_lines() {
        assert_eq!(extract_delta(""), None);
        assert_eq!(extract_delta(": keep-alive"), None);
        assert_eq!(extract_delta("event: message"), None);
        assert_eq!(extract_delta("data:"), None);
        assert_eq!(extract_delta("data: [DONE]"), None);
        assert_eq!(extract_delta("data: {not json"), None);
        assert_eq!(extract_delta(r#"data: {"choices":[]}"#), None);
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":""}}]}"#),
            None
        );
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":null}}]}"#),
            None
        );
    }

    #[test]
    fn test_scalar_text_fields_are_stringified() {
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":[{"text":5},{"text":0},"!"]}}]}"#)
                .as_deref(),
            Some("5!")
        );
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":{"text":1.5}}}]}"#).as_deref(),
            Some("1.5")
        );
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":[{"text":true},{"text":false}]}}]}"#)
                .as_deref(),
            Some("true")
        );
        assert_eq!(
            extract_delta(r#"data: {"choices":[{"delta":{"content":{"text":null}}}]}"#),
            None
        );
    }

    #[test]
    fn test_only_first_choice_is_used() {
        assert_eq!(
            extract_delta(
                r#"data: {"choices":[{"delta":{"content":"a"}},{"delta":{"content":"b"}}]}"#
            )
            .as_deref(),
            Some("a")
        );
    }
}
