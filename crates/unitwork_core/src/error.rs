//! Error types for the unit of work.

use thiserror::Error;
use unitwork_value::ValueError;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in unit of work operations.
///
/// All of these are configuration or usage errors. A handler rejecting a
/// command during commit is not an error; it is reported through
/// [`CommitOutcome`](crate::CommitOutcome).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Value conversion or property write failed.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The caller passed something that cannot be tracked.
    #[error("{message}")]
    InvalidInput {
        /// Description of the problem.
        message: String,
    },

    /// No class metadata exists for the entity's runtime type.
    #[error("Class \"{type_name}\" does not have definition.")]
    UndefinedType {
        /// Name of the runtime type.
        type_name: &'static str,
    },

    /// A declared identity or observed property cannot be read from an instance.
    #[error("{message}")]
    InvalidPropertyPath {
        /// Description of the unresolved path.
        message: String,
    },

    /// The entity was never registered in this unit of work.
    #[error("Object need to be registered first in the Unit of Work.")]
    NotRegistered,

    /// Removal of an entity that is neither registered nor persisted.
    #[error("Unit of Work can't remove not persisted entities.")]
    CannotRemoveTransient,

    /// A property value nests deeper than the configured snapshot limit.
    #[error("property \"{property}\" of \"{type_name}\" nests {depth} levels deep, limit is {max_depth}")]
    SnapshotTooDeep {
        /// Name of the runtime type.
        type_name: &'static str,
        /// Offending top-level property.
        property: String,
        /// Actual depth.
        depth: usize,
        /// Configured limit.
        max_depth: usize,
    },
}

impl CoreError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for an identity path that does not resolve.
    pub fn identity_path(type_name: &str, path: &str) -> Self {
        Self::InvalidPropertyPath {
            message: format!(
                "Cant access identifier in \"{type_name}\" using \"{path}\" property path."
            ),
        }
    }

    /// Creates an error for an observed property that does not resolve.
    pub fn property_path(type_name: &str, path: &str) -> Self {
        Self::InvalidPropertyPath {
            message: format!("Cant access property in \"{type_name}\" using \"{path}\" property path."),
        }
    }

    /// Whether this error comes from metadata that does not match the entity.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UndefinedType { .. } | Self::InvalidPropertyPath { .. } | Self::SnapshotTooDeep { .. }
        )
    }
}
