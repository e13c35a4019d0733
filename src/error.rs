//! Conversion failures: a reason code plus the path from the root to the
//! offending struct.
use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("The {0} struct is not supported")]
    UnsupportedStruct(String),
    /// Carries the container label (`Array`, `Union`, `Dict`, `Null`).
    #[error("Optional struct is not supported as {0} item")]
    UnsupportedOptionalItem(&'static str),
    #[error("Optional struct is not supported inside the Option struct")]
    UnsupportedNestedOptional,
    #[error("Optional struct is not supported at root")]
    UnsupportedRootOptional,
    #[error("Couldn't destruct default value. Error: {0}")]
    DefaultDestructingFailed(String),
    #[error("Struct nesting exceeds the maximum depth of {0}")]
    NestingTooDeep(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub code: ErrorCode,
    /// Root-to-leaf; segments are pushed on the front while unwinding.
    pub path: VecDeque<String>,
}

impl ConversionError {
    pub fn new(code: ErrorCode) -> Self {
        Self { code, path: VecDeque::new() }
    }

    pub fn prepend(mut self, segment: impl Into<String>) -> Self {
        self.path.push_front(segment.into());
        self
    }

    pub fn path_string(&self) -> String {
        Path(&self.path).to_string()
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed converting at {}. Reason: {}.", Path(&self.path), self.code)
    }
}

impl std::error::Error for ConversionError {}

impl From<ErrorCode> for ConversionError {
    fn from(code: ErrorCode) -> Self { Self::new(code) }
}

/// `root` when empty, otherwise `["a"]["0"]…`.
pub(crate) struct Path<'a, I>(pub &'a I);

impl<'a, I> fmt::Display for Path<'a, I>
where
    &'a I: IntoIterator,
    <&'a I as IntoIterator>::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut empty = true;
        for segment in self.0 {
            empty = false;
            write!(f, "[\"{segment}\"]")?;
        }
        if empty {
            f.write_str("root")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_renders_as_root() {
        let err = ConversionError::new(ErrorCode::UnsupportedRootOptional);
        assert_eq!(err.to_string(), "Failed converting at root. Reason: Optional struct is not supported at root.");
    }

    #[test]
    fn prepended_segments_read_root_to_leaf() {
        let err = ConversionError::new(ErrorCode::UnsupportedOptionalItem("Array"))
            .prepend("1")
            .prepend("items");
        assert_eq!(err.path_string(), r#"["items"]["1"]"#);
        assert_eq!(
            err.to_string(),
            r#"Failed converting at ["items"]["1"]. Reason: Optional struct is not supported as Array item."#
        );
    }

    #[test]
    fn reasons_follow_fixed_templates() {
        assert_eq!(ErrorCode::UnsupportedStruct("Date".into()).to_string(), "The Date struct is not supported");
        assert_eq!(
            ErrorCode::UnsupportedNestedOptional.to_string(),
            "Optional struct is not supported inside the Option struct"
        );
        assert_eq!(
            ErrorCode::DefaultDestructingFailed("boom".into()).to_string(),
            "Couldn't destruct default value. Error: boom"
        );
        assert_eq!(ErrorCode::NestingTooDeep(4).to_string(), "Struct nesting exceeds the maximum depth of 4");
    }
}
