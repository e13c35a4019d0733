//! Encode a decoded value through a struct back into plain JSON.
//!
//! Used for defaults: the value attached with `with_default` is pushed through
//! the struct's own shape so the schema carries exactly what the struct would
//! emit. Metadata on nested structs is not consulted here.
use std::fmt;

use serde_json::{Map, Value};

use crate::error::Path;
use crate::ir::{Literal, Shape, Struct, UnknownKeys};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError {
    pub path: Vec<String>,
    pub reason: String,
}

impl EncodeError {
    fn new(reason: impl Into<String>) -> Self {
        Self { path: Vec::new(), reason: reason.into() }
    }

    fn at(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    fn mismatch(expected: &Struct, received: &Value) -> Self {
        Self::new(format!("Expected {}, received {received}", expected.name()))
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed serializing at {}. Reason: {}", Path(&self.path), self.reason)
    }
}

impl std::error::Error for EncodeError {}

/// Serialize `value` with the encoding of `s`.
pub fn serialize_default(value: &Value, s: &Struct) -> Result<Value, EncodeError> {
    encode(value, s)
}

fn encode(value: &Value, s: &Struct) -> Result<Value, EncodeError> {
    match s.shape() {
        Shape::Unknown => Ok(value.clone()),
        Shape::Never => Err(EncodeError::mismatch(s, value)),
        Shape::Date => Err(EncodeError::new("The Date struct is not supported")),
        Shape::String => accept_if(value.is_string(), value, s),
        Shape::Int => accept_if(value.as_i64().is_some(), value, s),
        Shape::Float => accept_if(value.is_number(), value, s),
        Shape::Bool => accept_if(value.is_boolean(), value, s),
        Shape::Literal(lit) => accept_if(literal_matches(lit, value), value, s),
        Shape::Option(inner) | Shape::Nullable(inner) => match value {
            Value::Null => Ok(Value::Null),
            _ => encode(value, inner),
        },
        Shape::Array(inner) => {
            let Value::Array(items) = value else { return Err(EncodeError::mismatch(s, value)) };
            items
                .iter()
                .enumerate()
                .map(|(i, item)| encode(item, inner).map_err(|e| e.at(i.to_string())))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Shape::Tuple(structs) => {
            let Value::Array(items) = value else { return Err(EncodeError::mismatch(s, value)) };
            if items.len() != structs.len() {
                return Err(EncodeError::new(format!(
                    "Expected Tuple with {} items, received {}",
                    structs.len(),
                    items.len()
                )));
            }
            items
                .iter()
                .zip(structs)
                .enumerate()
                .map(|(i, (item, st))| encode(item, st).map_err(|e| e.at(i.to_string())))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Shape::Dict(inner) => {
            let Value::Object(map) = value else { return Err(EncodeError::mismatch(s, value)) };
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), encode(v, inner).map_err(|e| e.at(k.clone()))?);
            }
            Ok(Value::Object(out))
        }
        Shape::Object { fields, unknown_keys } => {
            let Value::Object(map) = value else { return Err(EncodeError::mismatch(s, value)) };
            let mut out = Map::new();
            for (name, field) in fields {
                let input = map.get(name).unwrap_or(&NULL);
                let encoded = encode(input, field).map_err(|e| e.at(name.clone()))?;
                if encoded.is_null() && matches!(field.shape(), Shape::Option(_)) {
                    continue;
                }
                out.insert(name.clone(), encoded);
            }
            for (k, v) in map.iter().filter(|(k, _)| !fields.contains_key(k.as_str())) {
                match unknown_keys {
                    UnknownKeys::Strict => {
                        return Err(EncodeError::new(format!(
                            "Encountered disallowed excess key \"{k}\" on an object"
                        )));
                    }
                    UnknownKeys::Strip => {}
                    UnknownKeys::Passthrough => {
                        out.insert(k.clone(), v.clone());
                    }
                }
            }
            Ok(Value::Object(out))
        }
        Shape::Union(variants) => variants
            .iter()
            .find_map(|variant| encode(value, variant).ok())
            .ok_or_else(|| EncodeError::new(format!("Invalid union: no variant accepts {value}"))),
    }
}

static NULL: Value = Value::Null;

fn accept_if(ok: bool, value: &Value, s: &Struct) -> Result<Value, EncodeError> {
    if ok { Ok(value.clone()) } else { Err(EncodeError::mismatch(s, value)) }
}

fn literal_matches(lit: &Literal, value: &Value) -> bool {
    match lit {
        Literal::Null => value.is_null(),
        Literal::EmptyOption | Literal::NaN => false,
        Literal::String(x) => value.as_str() == Some(x.as_str()),
        Literal::Int(x) => value.as_i64() == Some(*x),
        Literal::Float(x) => value.as_f64() == Some(x.0),
        Literal::Bool(x) => value.as_bool() == Some(*x),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn primitives_pass_when_types_agree() {
        assert_eq!(serialize_default(&json!("a"), &Struct::string()), Ok(json!("a")));
        assert_eq!(serialize_default(&json!(3), &Struct::int()), Ok(json!(3)));
        assert_eq!(serialize_default(&json!(1.5), &Struct::float()), Ok(json!(1.5)));
        assert_eq!(serialize_default(&json!({ "x": [1] }), &Struct::unknown()), Ok(json!({ "x": [1] })));
    }

    #[test]
    fn int_rejects_fractional_numbers() {
        let err = serialize_default(&json!(1.5), &Struct::int()).unwrap_err();
        assert_eq!(err.to_string(), "Failed serializing at root. Reason: Expected Int, received 1.5");
    }

    #[test]
    fn object_drops_absent_options_and_strips_unknown_keys() {
        let s = Struct::object([("a", Struct::int()), ("b", Struct::option(Struct::string()))]);
        let out = serialize_default(&json!({ "a": 1, "extra": true }), &s).unwrap();
        assert_eq!(out, json!({ "a": 1 }));
    }

    #[test]
    fn passthrough_keeps_unknown_keys() {
        let s = Struct::object([("a", Struct::int())]).passthrough();
        let out = serialize_default(&json!({ "extra": true, "a": 1 }), &s).unwrap();
        assert_eq!(out, json!({ "a": 1, "extra": true }));
    }

    #[test]
    fn strict_rejects_unknown_keys() {
        let s = Struct::object([("a", Struct::int())]).strict();
        let err = serialize_default(&json!({ "a": 1, "b": 2 }), &s).unwrap_err();
        assert_eq!(err.reason, "Encountered disallowed excess key \"b\" on an object");
    }

    #[test]
    fn nested_failures_carry_their_path() {
        let s = Struct::object([("xs", Struct::array(Struct::tuple([Struct::int(), Struct::bool()])))]);
        let err = serialize_default(&json!({ "xs": [[1, true], [2, "no"]] }), &s).unwrap_err();
        assert_eq!(err.path, ["xs", "1", "1"]);
        assert_eq!(
            err.to_string(),
            r#"Failed serializing at ["xs"]["1"]["1"]. Reason: Expected Bool, received "no""#
        );
    }

    #[test]
    fn tuple_arity_must_match() {
        let s = Struct::tuple([Struct::int(), Struct::int()]);
        assert!(serialize_default(&json!([1]), &s).is_err());
    }

    #[test]
    fn union_takes_first_accepting_variant() {
        let s = Struct::union([Struct::int(), Struct::string()]);
        assert_eq!(serialize_default(&json!("x"), &s), Ok(json!("x")));
        assert!(serialize_default(&json!(true), &s).is_err());
    }

    #[test]
    fn literals_must_match_exactly() {
        let s = Struct::literal(Literal::String("on".into()));
        assert_eq!(serialize_default(&json!("on"), &s), Ok(json!("on")));
        assert!(serialize_default(&json!("off"), &s).is_err());
        assert_eq!(serialize_default(&Value::Null, &Struct::literal(Literal::Null)), Ok(Value::Null));
    }
}
