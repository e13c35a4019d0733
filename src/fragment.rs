//! Canonical JSON Schema (draft-07) fragments.
//!
//! Pure builders, one per shape. Inputs are always well-formed so nothing here
//! can fail. Key order is part of the output (`serde_json` is built with
//! `preserve_order`).
use serde_json::{Map, Value, json};

pub type Fragment = Map<String, Value>;

pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

fn object(v: Value) -> Fragment {
    match v {
        Value::Object(map) => map,
        _ => Fragment::new(),
    }
}

// ------------------------------ Primitives -------------------------------- //

pub fn empty() -> Fragment { Fragment::new() }
pub fn never() -> Fragment { object(json!({ "not": {} })) }
pub fn string() -> Fragment { object(json!({ "type": "string" })) }
pub fn integer() -> Fragment { object(json!({ "type": "integer" })) }
pub fn number() -> Fragment { object(json!({ "type": "number" })) }
pub fn boolean() -> Fragment { object(json!({ "type": "boolean" })) }
pub fn null() -> Fragment { object(json!({ "type": "null" })) }

// ------------------------------ Wrappers ---------------------------------- //

pub fn nullable(inner: Fragment) -> Fragment {
    object(json!({ "anyOf": [inner, { "type": "null" }] }))
}

pub fn array(inner: Fragment) -> Fragment {
    object(json!({ "items": inner, "type": "array" }))
}

pub fn tuple(items: Vec<Fragment>) -> Fragment {
    let len = items.len();
    object(json!({
        "items": items,
        "type": "array",
        "minItems": len,
        "maxItems": len
    }))
}

pub fn dict(inner: Fragment) -> Fragment {
    object(json!({ "type": "object", "additionalProperties": inner }))
}

pub fn any_of(variants: Vec<Fragment>) -> Fragment {
    object(json!({ "anyOf": variants }))
}

/// Object schema. `required` is omitted entirely when no field is required.
pub fn record(properties: Fragment, additional_properties: bool, required: Vec<String>) -> Fragment {
    let mut o = object(json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": additional_properties
    }));
    if !required.is_empty() {
        o.insert("required".into(), Value::from(required));
    }
    o
}

// ------------------------------ Constants --------------------------------- //

pub fn string_const(value: &str) -> Fragment {
    object(json!({ "type": "string", "const": value }))
}

pub fn integer_const(value: i64) -> Fragment {
    object(json!({ "type": "integer", "const": value }))
}

/// Caller guarantees `value` is finite.
pub fn number_const(value: f64) -> Fragment {
    object(json!({ "type": "number", "const": value }))
}

pub fn boolean_const(value: bool) -> Fragment {
    object(json!({ "type": "boolean", "const": value }))
}

// ------------------------------ Metadata ---------------------------------- //

pub fn deprecated() -> Fragment { object(json!({ "deprecated": true })) }

pub fn deprecated_with_message(message: &str) -> Fragment {
    object(json!({ "deprecated": true, "description": message }))
}

pub fn default_value(value: Value) -> Fragment {
    object(json!({ "default": value }))
}

/// `$schema` header followed by the root fragment. The header always wins.
pub fn document(root: Fragment) -> Fragment {
    let mut doc = object(json!({ "$schema": DRAFT_07 }));
    merge(&mut doc, root);
    doc.insert("$schema".into(), Value::from(DRAFT_07));
    doc
}

// -------------------------------- Merge ----------------------------------- //

/// Shallow merge: top-level keys of `patch` overwrite `base`. Existing keys keep
/// their position, new keys are appended. Nested values are replaced, not merged.
pub fn merge(base: &mut Fragment, patch: Fragment) {
    for (k, v) in patch {
        base.insert(k, v);
    }
}

pub fn merged(mut base: Fragment, patch: Fragment) -> Fragment {
    merge(&mut base, patch);
    base
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(f: Fragment) -> Value { Value::Object(f) }

    #[test]
    fn record_omits_empty_required() {
        let props = object(json!({ "a": { "type": "string" } }));
        let schema = v(record(props, false, vec![]));
        assert_eq!(schema, json!({
            "type": "object",
            "properties": { "a": { "type": "string" } },
            "additionalProperties": false
        }));
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn record_lists_required_names_in_order() {
        let props = object(json!({ "b": {}, "a": {} }));
        let schema = v(record(props, true, vec!["b".into(), "a".into()]));
        assert_eq!(schema["required"], json!(["b", "a"]));
        assert_eq!(schema["additionalProperties"], json!(true));
    }

    #[test]
    fn tuple_pins_arity() {
        let schema = v(tuple(vec![string(), integer()]));
        assert_eq!(schema, json!({
            "items": [{ "type": "string" }, { "type": "integer" }],
            "type": "array",
            "minItems": 2,
            "maxItems": 2
        }));
    }

    #[test]
    fn nullable_appends_null_arm() {
        assert_eq!(v(nullable(boolean())), json!({ "anyOf": [{ "type": "boolean" }, { "type": "null" }] }));
    }

    #[test]
    fn merge_is_shallow_and_patch_wins() {
        let base = object(json!({ "type": "object", "properties": { "a": {} }, "description": "old" }));
        let patch = object(json!({ "properties": { "b": {} }, "description": "new", "title": "T" }));
        let out = merged(base, patch);
        assert_eq!(v(out.clone()), json!({
            "type": "object",
            "properties": { "b": {} },
            "description": "new",
            "title": "T"
        }));
        assert_eq!(out.keys().collect::<Vec<_>>(), ["type", "properties", "description", "title"]);
    }

    #[test]
    fn document_puts_dialect_first() {
        let doc = document(string());
        assert_eq!(doc.keys().next().map(String::as_str), Some("$schema"));
        assert_eq!(v(doc), json!({ "$schema": DRAFT_07, "type": "string" }));
    }
}
