//! Field probing helpers over `serde_json::Value`.
//!
//! Source documents carry many aliases for the same field; these helpers pick
//! the first usable candidate so the typed model can be built in one pass.

use serde_json::Value;

/// First non-blank string among `keys`.
pub(crate) fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

/// First non-null value among `keys`.
pub(crate) fn first_value<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| !v.is_null())
}

/// Type tag of a node: `_type`, then `type`.
pub(crate) fn type_tag(value: &Value) -> Option<&str> {
    first_str(value, &["_type", "type"])
}

/// A slug stored either as a plain string or as `{ current: "..." }`.
pub(crate) fn slug_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
        Value::Object(_) => first_str(value, &["current", "slug"]),
        _ => None,
    }
}

/// A display name stored either as a string or as `{ name | title: "..." }`.
pub(crate) fn display_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim()),
        Value::Object(_) => first_str(value, &["name", "title", "label"]).map(str::trim),
        _ => None,
    }
}

/// Collect display names from a string, an object, or an array of either.
pub(crate) fn display_names(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(display_name)
            .map(str::to_string)
            .collect(),
        other => display_name(other).map(str::to_string).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_str_skips_blank_and_non_string() {
        let value = json!({ "title": "  ", "name": 7, "label": "Found" });
        assert_eq!(first_str(&value, &["title", "name", "label"]), Some("Found"));
        assert_eq!(first_str(&value, &["missing"]), None);
    }

    #[test]
    fn test_slug_shapes() {
        assert_eq!(slug_str(&json!("hello")), Some("hello"));
        assert_eq!(slug_str(&json!({ "current": "world" })), Some("world"));
        assert_eq!(slug_str(&json!({ "_type": "slug" })), None);
        assert_eq!(slug_str(&json!(42)), None);
    }

    #[test]
    fn test_display_names() {
        let value = json!(["Ada", { "name": "Grace" }, { "title": "Linus" }, 3]);
        assert_eq!(display_names(&value), vec!["Ada", "Grace", "Linus"]);
        assert_eq!(display_names(&json!({ "name": "Solo" })), vec!["Solo"]);
        assert!(display_names(&json!(null)).is_empty());
    }
}
