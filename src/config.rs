use serde::Deserialize;

/// Deep enough for any hand-written struct, shallow enough to stay well inside
/// the default thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Maximum struct nesting the engine will descend into.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Config {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg: Config = crate::path_de::from_str_with_path("{}").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn bad_values_are_reported_with_path() {
        let err = crate::path_de::from_str_with_path::<Config>(r#"{"maxDepth": "deep"}"#).unwrap_err();
        assert!(err.to_string().contains("maxDepth"), "{err}");
    }
}
