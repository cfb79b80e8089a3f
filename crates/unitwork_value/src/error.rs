//! Error types for the value crate.

use thiserror::Error;

/// Result type for value operations.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors that can occur while reading, writing or converting values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A property path is malformed.
    #[error("invalid property path \"{path}\": {message}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why the path was rejected.
        message: String,
    },

    /// An entity does not expose the named property.
    #[error("unknown property \"{property}\"")]
    UnknownProperty {
        /// The property name.
        property: String,
    },

    /// A value had a different shape than expected.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected shape.
        expected: &'static str,
        /// Actual shape.
        actual: &'static str,
    },

    /// Floating point numbers are not part of the value model.
    #[error("float values are not supported")]
    FloatUnsupported,
}

impl ValueError {
    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown property error.
    pub fn unknown_property(property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            property: property.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }
}
