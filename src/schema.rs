//! Front API: struct → draft-07 document, plus the annotations that feed it.
use once_cell::sync::Lazy;
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::{ConversionError, ErrorCode};
use crate::fragment::{self, Fragment};
use crate::ir::Struct;
use crate::lower::build_node;
use crate::metadata::MetadataId;

/// Where [`raw`] keeps its override on a struct.
pub static RAW_SCHEMA_ID: Lazy<MetadataId> = Lazy::new(|| MetadataId::new("json-struct-schema", "raw"));

/// Convert `s` into a JSON Schema document, rendering any failure to text.
pub fn make(s: &Struct) -> Result<Value, String> {
    make_with(s, &Config::default()).map_err(|e| e.to_string())
}

pub fn make_with(s: &Struct, config: &Config) -> Result<Value, ConversionError> {
    tracing::debug!(kind = s.shape().kind(), "converting struct to JSON schema");
    let result = build_node(s, config).and_then(|node| {
        if node.is_required {
            Ok(Value::Object(fragment::document(node.raw_schema)))
        } else {
            Err(ErrorCode::UnsupportedRootOptional.into())
        }
    });
    if let Err(err) = &result {
        tracing::debug!(path = %err.path_string(), code = %err.code, "conversion failed");
    }
    result
}

/// New struct whose raw override is the existing one with `patch` merged on top.
pub fn raw(s: &Struct, patch: Fragment) -> Struct {
    let merged = match s.annotation(&RAW_SCHEMA_ID) {
        Some(Value::Object(existing)) => fragment::merged(existing.clone(), patch),
        _ => patch,
    };
    s.clone().with_annotation((*RAW_SCHEMA_ID).clone(), Value::Object(merged))
}

pub fn description(s: &Struct, text: &str) -> Struct {
    let mut patch = Fragment::new();
    patch.insert("description".into(), json!(text));
    raw(s, patch)
}

// ------------------------------- Tests ------------------------------------ //
