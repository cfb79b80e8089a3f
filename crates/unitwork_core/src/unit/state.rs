//! Entity state.

use crate::command::CommandKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a registered entity.
///
/// Derived on demand from removal marks, identity and the baseline;
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityState {
    /// No identity assigned yet.
    New,
    /// Identity assigned and equal to the baseline.
    Persisted,
    /// Identity assigned and an observed property differs from the baseline.
    Edited,
    /// Marked for removal.
    Removed,
}

impl EntityState {
    /// Whether commit produces a command for this state.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        !matches!(self, Self::Persisted)
    }

    /// The command commit dispatches for this state.
    #[must_use]
    pub const fn command_kind(self) -> Option<CommandKind> {
        match self {
            Self::New => Some(CommandKind::New),
            Self::Edited => Some(CommandKind::Edit),
            Self::Removed => Some(CommandKind::Remove),
            Self::Persisted => None,
        }
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::Persisted => "persisted",
            Self::Edited => "edited",
            Self::Removed => "removed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_states() {
        assert!(EntityState::New.is_pending());
        assert!(EntityState::Edited.is_pending());
        assert!(EntityState::Removed.is_pending());
        assert!(!EntityState::Persisted.is_pending());
        assert_eq!(EntityState::Persisted.command_kind(), None);
        assert_eq!(EntityState::Edited.command_kind(), Some(CommandKind::Edit));
    }

    #[test]
    fn display() {
        assert_eq!(EntityState::Edited.to_string(), "edited");
    }
}
