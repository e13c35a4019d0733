//! Metadata attached to a [`Struct`](crate::ir::Struct), independent of its shape.
//!
//! The struct algebra owns deprecation and defaults. Anything else lives in a
//! side table keyed by a namespaced [`MetadataId`] so separate consumers never
//! step on each other's keys.
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// `namespace:name` key into [`Metadata::annotations`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MetadataId {
    namespace: String,
    name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("metadata id `{0}` must have the form `namespace:name`")]
pub struct InvalidMetadataId(String);

impl MetadataId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), name: name.into() }
    }
    pub fn namespace(&self) -> &str { &self.namespace }
    pub fn name(&self) -> &str { &self.name }
}

impl fmt::Display for MetadataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for MetadataId {
    type Err = InvalidMetadataId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((ns, name)) if !ns.is_empty() && !name.is_empty() => Ok(Self::new(ns, name)),
            _ => Err(InvalidMetadataId(s.to_string())),
        }
    }
}

impl From<MetadataId> for String {
    fn from(id: MetadataId) -> Self { id.to_string() }
}

impl TryFrom<String> for MetadataId {
    type Error = InvalidMetadataId;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

/// Deprecation marker. Absence is modelled as `Option<Deprecation>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Deprecation {
    Flagged,
    WithMessage(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<Deprecation>,
    /// Default value in its decoded form; encoded through the struct on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<MetadataId, Value>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.deprecation.is_none() && self.default.is_none() && self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_id_round_trips_through_text() {
        let id: MetadataId = "json-struct-schema:raw".parse().unwrap();
        assert_eq!(id.namespace(), "json-struct-schema");
        assert_eq!(id.name(), "raw");
        assert_eq!(id.to_string(), "json-struct-schema:raw");
    }

    #[test]
    fn metadata_id_rejects_missing_namespace() {
        assert!("raw".parse::<MetadataId>().is_err());
        assert!(":raw".parse::<MetadataId>().is_err());
        assert!("ns:".parse::<MetadataId>().is_err());
    }

    #[test]
    fn empty_metadata_serializes_to_empty_object() {
        let m = Metadata::default();
        assert!(m.is_empty());
        assert_eq!(serde_json::to_value(&m).unwrap(), serde_json::json!({}));
    }
}
