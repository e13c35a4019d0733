use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("at JSON path {path} → {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_load_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_load_error)
}

fn into_load_error(err: serde_path_to_error::Error<serde_json::Error>) -> LoadError {
    let path = err.path().to_string();
    LoadError::Parse { path, source: err.into_inner() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Struct;

    #[test]
    fn struct_definitions_report_the_failing_field() {
        let src = br#"{"shape": {"kind": "object", "of": {"fields": {"a": {"shape": {"kind": "strnig"}}}}}}"#;
        let err = from_slice_with_path::<Struct>(src).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("at JSON path "), "{msg}");
        assert!(msg.contains("fields.a"), "{msg}");
    }

    #[test]
    fn valid_definitions_load() {
        let s: Struct = from_str_with_path(r#"{"shape": {"kind": "array", "of": {"shape": {"kind": "bool"}}}}"#).unwrap();
        assert_eq!(s, Struct::array(Struct::bool()));
    }
}
