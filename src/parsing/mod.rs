pub(crate) mod path;

use path::SourcePath;
use serde_json::{Map, Value};

/// Resolves a dotted path against a JSON object.
///
/// Object segments are looked up by key, array segments by decimal index.
/// Returns `None` as soon as a segment cannot be applied.
pub(crate) fn lookup<'a>(json: &'a Map<String, Value>, path: &SourcePath) -> Option<&'a Value> {
    let mut segments = path.segments();
    let first = segments.next()?;
    let mut current = json.get(first)?;

    for segment in segments {
        current = descend(current, segment)?;
    }

    Some(current)
}

fn descend<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(arr) => {
            let index = segment.parse::<usize>().ok()?;
            arr.get(index)
        }
        _ => None, // Scalars and nulls can not be indexed
    }
}

/// Human readable name of a JSON value kind, used in error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_lookup_top_level_key() {
        let input = object(json!({ "username": "alice", "age": 30 }));

        assert_eq!(
            lookup(&input, &SourcePath::new("username")),
            Some(&json!("alice"))
        );
        assert_eq!(lookup(&input, &SourcePath::new("age")), Some(&json!(30)));
    }

    #[test]
    fn test_lookup_nested_path() {
        let input = object(json!({
            "_links": {
                "profile": { "href": "http://x/alice" }
            }
        }));

        assert_eq!(
            lookup(&input, &SourcePath::new("_links.profile.href")),
            Some(&json!("http://x/alice"))
        );
        assert_eq!(
            lookup(&input, &SourcePath::new("_links.profile")),
            Some(&json!({ "href": "http://x/alice" }))
        );
    }

    #[test]
    fn test_lookup_array_index() {
        let input = object(json!({
            "friends": [
                { "username": "bob" },
                { "username": "carol" }
            ]
        }));

        assert_eq!(
            lookup(&input, &SourcePath::new("friends.1.username")),
            Some(&json!("carol"))
        );
        assert_eq!(lookup(&input, &SourcePath::new("friends.2.username")), None);
        assert_eq!(lookup(&input, &SourcePath::new("friends.first")), None);
    }

    #[test]
    fn test_lookup_misses() {
        let input = object(json!({
            "username": "alice",
            "profile": null
        }));

        // Missing key
        assert_eq!(lookup(&input, &SourcePath::new("email")), None);
        // Segment applied to a scalar
        assert_eq!(lookup(&input, &SourcePath::new("username.length")), None);
        // Segment applied to null
        assert_eq!(lookup(&input, &SourcePath::new("profile.location")), None);
    }

    #[test]
    fn test_lookup_returns_null_leaf() {
        let input = object(json!({ "profile": null }));
        assert_eq!(
            lookup(&input, &SourcePath::new("profile")),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of(&json!(null)), "null");
        assert_eq!(kind_of(&json!(true)), "boolean");
        assert_eq!(kind_of(&json!(1.5)), "number");
        assert_eq!(kind_of(&json!("foo")), "string");
        assert_eq!(kind_of(&json!([])), "array");
        assert_eq!(kind_of(&json!({})), "object");
    }
}
