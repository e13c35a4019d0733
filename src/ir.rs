//! Immutable struct algebra: the typed description the converter walks.
//!
//! A [`Struct`] is a [`Shape`] plus attached [`Metadata`]. Nothing here is
//! mutated in place; every annotation consumes the value and hands back a new one.
use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metadata::{Deprecation, Metadata, MetadataId};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    shape: Shape,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "camelCase")]
pub enum Shape {
    Never,
    Unknown,
    String,
    Int,
    Float,
    Bool,
    Date,
    Literal(Literal),
    Option(Box<Struct>),
    Nullable(Box<Struct>),
    Array(Box<Struct>),
    Tuple(Vec<Struct>),
    Object {
        fields: IndexMap<String, Struct>, // declaration order
        #[serde(default, rename = "unknownKeys")]
        unknown_keys: UnknownKeys,
    },
    Union(Vec<Struct>),
    Dict(Box<Struct>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Literal {
    Null,
    EmptyOption,
    #[serde(rename = "nan")]
    NaN,
    String(String),
    Int(i64),
    Float(OrderedFloat<f64>),
    Bool(bool),
}

/// What an object does with keys it did not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownKeys {
    /// reject
    Strict,
    /// accept and drop
    #[default]
    Strip,
    /// accept and keep
    Passthrough,
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl From<Shape> for Struct {
    fn from(shape: Shape) -> Self {
        Self { shape, metadata: Metadata::default() }
    }
}

impl Struct {
    pub fn never() -> Self { Shape::Never.into() }
    pub fn unknown() -> Self { Shape::Unknown.into() }
    pub fn string() -> Self { Shape::String.into() }
    pub fn int() -> Self { Shape::Int.into() }
    pub fn float() -> Self { Shape::Float.into() }
    pub fn bool() -> Self { Shape::Bool.into() }
    pub fn date() -> Self { Shape::Date.into() }
    pub fn literal(value: Literal) -> Self { Shape::Literal(value).into() }
    pub fn option(inner: Struct) -> Self { Shape::Option(Box::new(inner)).into() }
    pub fn nullable(inner: Struct) -> Self { Shape::Nullable(Box::new(inner)).into() }
    pub fn array(inner: Struct) -> Self { Shape::Array(Box::new(inner)).into() }
    pub fn tuple(items: impl IntoIterator<Item = Struct>) -> Self {
        Shape::Tuple(items.into_iter().collect()).into()
    }
    pub fn union(variants: impl IntoIterator<Item = Struct>) -> Self {
        Shape::Union(variants.into_iter().collect()).into()
    }
    pub fn dict(inner: Struct) -> Self { Shape::Dict(Box::new(inner)).into() }

    /// Object with fields in the given order and the default unknown-key policy.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Struct)>,
    {
        Shape::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            unknown_keys: UnknownKeys::default(),
        }
        .into()
    }

    /// Change the unknown-key policy. No-op on anything but an object.
    pub fn with_unknown_keys(mut self, policy: UnknownKeys) -> Self {
        if let Shape::Object { unknown_keys, .. } = &mut self.shape {
            *unknown_keys = policy;
        }
        self
    }

    pub fn strict(self) -> Self { self.with_unknown_keys(UnknownKeys::Strict) }
    pub fn passthrough(self) -> Self { self.with_unknown_keys(UnknownKeys::Passthrough) }
}

// ————————————————————————————————————————————————————————————————————————————
// ANNOTATIONS
// ————————————————————————————————————————————————————————————————————————————

impl Struct {
    pub fn deprecated(mut self) -> Self {
        self.metadata.deprecation = Some(Deprecation::Flagged);
        self
    }

    pub fn deprecated_with_message(mut self, message: impl Into<String>) -> Self {
        self.metadata.deprecation = Some(Deprecation::WithMessage(message.into()));
        self
    }

    pub fn with_default_value(mut self, value: Value) -> Self {
        self.metadata.default = Some(value);
        self
    }

    /// Attach a default from any serializable value.
    pub fn with_default<T: Serialize>(self, value: T) -> Result<Self, serde_json::Error> {
        Ok(self.with_default_value(serde_json::to_value(value)?))
    }

    pub fn with_annotation(mut self, id: MetadataId, value: Value) -> Self {
        self.metadata.annotations.insert(id, value);
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CLASSIFICATION
// ————————————————————————————————————————————————————————————————————————————

impl Struct {
    pub fn shape(&self) -> &Shape { &self.shape }
    pub fn metadata(&self) -> &Metadata { &self.metadata }
    pub fn deprecation(&self) -> Option<&Deprecation> { self.metadata.deprecation.as_ref() }
    pub fn default_value(&self) -> Option<&Value> { self.metadata.default.as_ref() }
    pub fn annotation(&self, id: &MetadataId) -> Option<&Value> { self.metadata.annotations.get(id) }

    /// Human label, used in error messages.
    pub fn name(&self) -> String {
        match &self.shape {
            Shape::Never => "Never".into(),
            Shape::Unknown => "Unknown".into(),
            Shape::String => "String".into(),
            Shape::Int => "Int".into(),
            Shape::Float => "Float".into(),
            Shape::Bool => "Bool".into(),
            Shape::Date => "Date".into(),
            Shape::Literal(lit) => format!("Literal({lit})"),
            Shape::Option(inner) => format!("Option({})", inner.name()),
            Shape::Nullable(inner) => format!("Null({})", inner.name()),
            Shape::Array(inner) => format!("Array({})", inner.name()),
            Shape::Dict(inner) => format!("Dict({})", inner.name()),
            Shape::Tuple(items) => format!("Tuple({})", join_names(items, ", ")),
            Shape::Union(items) => format!("Union({})", join_names(items, " | ")),
            Shape::Object { .. } => "Object".into(),
        }
    }
}

impl Shape {
    /// Variant tag without nested detail.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Never => "never",
            Shape::Unknown => "unknown",
            Shape::String => "string",
            Shape::Int => "int",
            Shape::Float => "float",
            Shape::Bool => "bool",
            Shape::Date => "date",
            Shape::Literal(_) => "literal",
            Shape::Option(_) => "option",
            Shape::Nullable(_) => "nullable",
            Shape::Array(_) => "array",
            Shape::Tuple(_) => "tuple",
            Shape::Object { .. } => "object",
            Shape::Union(_) => "union",
            Shape::Dict(_) => "dict",
        }
    }
}

fn join_names(items: &[Struct], sep: &str) -> String {
    items.iter().map(Struct::name).collect::<Vec<_>>().join(sep)
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::EmptyOption => f.write_str("EmptyOption"),
            Literal::NaN => f.write_str("NaN"),
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{}", x.0),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
