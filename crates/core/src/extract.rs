//! Recover a JSON object from free-form model output

use serde_json::Value as JsonValue;

/// Extract a JSON value from text that may wrap it in prose or code fences.
///
/// Tries the greedy span from the first `{` to the last `}` first, then
/// the whole trimmed text. Returns `None` when neither parses.
pub fn extract_json(text: &str) -> Option<JsonValue> {
    if let Some(span) = brace_span(text) {
        if let Ok(value) = serde_json::from_str(span) {
            return Some(value);
        }
    }

    serde_json::from_str(text.trim()).ok()
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_json_is_returned_unchanged() {
        let value = json!({"conditions": [{"name": "A", "likelihood": 90}], "urgent": false});
        assert_eq!(extract_json(&value.to_string()), Some(value.clone()));
        assert_eq!(
            extract_json(&serde_json::to_string_pretty(&value).unwrap()),
            Some(value)
        );
    }

    #[test]
    fn prose_and_fences_are_stripped() {
        let text = "Sure! Here is the diagnosis:\n```json\n{\"urgent\": true}\n```\nHope this helps.";
        assert_eq!(extract_json(text), Some(json!({"urgent": true})));
    }

    #[test]
    fn greedy_span_covers_nested_objects() {
        let text = "result: {\"a\": {\"b\": 1}, \"c\": [{\"d\": 2}]} done";
        assert_eq!(extract_json(text), Some(json!({"a": {"b": 1}, "c": [{"d": 2}]})));
    }

    #[test]
    fn whole_text_is_tried_when_span_fails() {
        assert_eq!(extract_json("  [1, 2, 3]\n"), Some(json!([1, 2, 3])));
        assert_eq!(extract_json(" 42 "), Some(json!(42)));
    }

    #[test]
    fn garbage_yields_none() {
        assert_eq!(extract_json("hello world"), None);
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("} backwards {"), None);
        assert_eq!(extract_json("{first} and {second}"), None);
    }
}
