//! Lower a [`Struct`] to a JSON Schema fragment.
//!
//! Depth-first over the declared shape, first error wins. After the structural
//! fragment is built, metadata is folded in, always in this order:
//! deprecation, default, raw override.
use serde_json::Value;

use crate::codec;
use crate::config::Config;
use crate::error::{ConversionError, ErrorCode};
use crate::fragment::{self, Fragment};
use crate::ir::{Literal, Shape, Struct, UnknownKeys};
use crate::metadata::Deprecation;
use crate::schema::RAW_SCHEMA_ID;

/// One lowered struct. `is_required == false` is only legal for object fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub raw_schema: Fragment,
    pub is_required: bool,
}

impl SchemaNode {
    fn required(raw_schema: Fragment) -> Self {
        Self { raw_schema, is_required: true }
    }
}

pub fn build_node(s: &Struct, config: &Config) -> Result<SchemaNode, ConversionError> {
    Lowering { max_depth: config.max_depth }.node(s, 0)
}

struct Lowering {
    max_depth: usize,
}

impl Lowering {
    fn node(&self, s: &Struct, depth: usize) -> Result<SchemaNode, ConversionError> {
        if depth > self.max_depth {
            return Err(ErrorCode::NestingTooDeep(self.max_depth).into());
        }
        tracing::trace!(depth, kind = s.shape().kind(), "lowering struct");
        let node = self.structural(s, depth)?;
        let node = apply_deprecation(node, s);
        let node = apply_default(node, s)?;
        Ok(apply_raw_override(node, s))
    }

    fn structural(&self, s: &Struct, depth: usize) -> Result<SchemaNode, ConversionError> {
        let depth = depth + 1;
        let raw_schema = match s.shape() {
            Shape::Never => fragment::never(),
            Shape::Unknown => fragment::empty(),
            Shape::String => fragment::string(),
            Shape::Int => fragment::integer(),
            Shape::Float => fragment::number(),
            Shape::Bool => fragment::boolean(),
            Shape::Date => return Err(unsupported(s)),
            Shape::Literal(lit) => match lit {
                Literal::Null => fragment::null(),
                Literal::EmptyOption | Literal::NaN => return Err(unsupported(s)),
                Literal::String(x) => fragment::string_const(x),
                Literal::Int(x) => fragment::integer_const(*x),
                Literal::Float(x) if x.0.is_finite() => fragment::number_const(x.0),
                Literal::Float(_) => return Err(unsupported(s)),
                Literal::Bool(x) => fragment::boolean_const(*x),
            },
            Shape::Option(inner) => {
                let node = self.node(inner, depth)?;
                if !node.is_required {
                    return Err(ErrorCode::UnsupportedNestedOptional.into());
                }
                return Ok(SchemaNode { raw_schema: node.raw_schema, is_required: false });
            }
            Shape::Nullable(inner) => fragment::nullable(self.item(inner, depth, "Null")?),
            Shape::Array(inner) => fragment::array(self.item(inner, depth, "Array")?),
            Shape::Dict(inner) => fragment::dict(self.item(inner, depth, "Dict")?),
            Shape::Tuple(items) => fragment::tuple(self.items(items, depth, "Array")?),
            Shape::Union(variants) => fragment::any_of(self.items(variants, depth, "Union")?),
            Shape::Object { fields, unknown_keys } => {
                let mut properties = Fragment::new();
                let mut required = Vec::new();
                for (name, field) in fields {
                    let node = self.node(field, depth).map_err(|e| e.prepend(name.as_str()))?;
                    if node.is_required {
                        required.push(name.clone());
                    }
                    properties.insert(name.clone(), Value::Object(node.raw_schema));
                }
                let additional = *unknown_keys == UnknownKeys::Passthrough;
                fragment::record(properties, additional, required)
            }
        };
        Ok(SchemaNode::required(raw_schema))
    }

    /// A single container element; it must not be optional.
    fn item(&self, inner: &Struct, depth: usize, container: &'static str) -> Result<Fragment, ConversionError> {
        let node = self.node(inner, depth)?;
        if node.is_required {
            Ok(node.raw_schema)
        } else {
            Err(ErrorCode::UnsupportedOptionalItem(container).into())
        }
    }

    /// Positional elements; failures are tagged with the element index.
    fn items(&self, structs: &[Struct], depth: usize, container: &'static str) -> Result<Vec<Fragment>, ConversionError> {
        structs
            .iter()
            .enumerate()
            .map(|(idx, st)| self.item(st, depth, container).map_err(|e| e.prepend(idx.to_string())))
            .collect()
    }
}

fn unsupported(s: &Struct) -> ConversionError {
    ErrorCode::UnsupportedStruct(s.name()).into()
}

// ------------------------------ Metadata ---------------------------------- //

fn apply_deprecation(mut node: SchemaNode, s: &Struct) -> SchemaNode {
    let patch = match s.deprecation() {
        None => return node,
        Some(Deprecation::Flagged) => fragment::deprecated(),
        Some(Deprecation::WithMessage(message)) => fragment::deprecated_with_message(message),
    };
    fragment::merge(&mut node.raw_schema, patch);
    node
}

/// A default always makes the node optional.
fn apply_default(node: SchemaNode, s: &Struct) -> Result<SchemaNode, ConversionError> {
    let Some(value) = s.default_value() else { return Ok(node) };
    let encoded = codec::serialize_default(value, s)
        .map_err(|e| ErrorCode::DefaultDestructingFailed(e.to_string()))?;
    Ok(SchemaNode {
        raw_schema: fragment::merged(node.raw_schema, fragment::default_value(encoded)),
        is_required: false,
    })
}

fn apply_raw_override(mut node: SchemaNode, s: &Struct) -> SchemaNode {
    match s.annotation(&RAW_SCHEMA_ID) {
        None => {}
        Some(Value::Object(patch)) => fragment::merge(&mut node.raw_schema, patch.clone()),
        Some(other) => {
            tracing::warn!(id = %RAW_SCHEMA_ID.to_string(), value = %other, "ignoring non-object raw schema override");
        }
    }
    node
}

// ------------------------------- Tests ------------------------------------ //
