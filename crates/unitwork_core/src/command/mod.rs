//! Commands dispatched on commit.
//!
//! Every entity that changed state produces exactly one command during
//! [`UnitOfWork::commit`](crate::UnitOfWork::commit). Commands carry the
//! live entity plus its position among commands of the same kind, so a
//! handler can batch or order backend writes.

mod handler;

pub use handler::{CommandFailure, CommandHandler, CommandResult, Handlers};

use crate::changes::ChangeSet;
use crate::entity::SharedEntity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Insert a new entity.
    New,
    /// Update an edited entity.
    Edit,
    /// Delete a removed entity.
    Remove,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::Edit => "edit",
            Self::Remove => "remove",
        })
    }
}

/// Instruction to persist a new entity.
#[derive(Debug, Clone)]
pub struct NewCommand {
    entity: SharedEntity,
    index: usize,
    total: usize,
}

impl NewCommand {
    pub(crate) fn new(entity: SharedEntity, index: usize, total: usize) -> Self {
        Self {
            entity,
            index,
            total,
        }
    }

    /// Returns the live entity.
    #[must_use]
    pub fn entity(&self) -> &SharedEntity {
        &self.entity
    }

    /// Position among new entities in this commit, starting at zero.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of new entities in this commit.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Instruction to persist changes of an edited entity.
#[derive(Debug, Clone)]
pub struct EditCommand {
    entity: SharedEntity,
    changes: ChangeSet,
    index: usize,
    total: usize,
}

impl EditCommand {
    pub(crate) fn new(entity: SharedEntity, changes: ChangeSet, index: usize, total: usize) -> Self {
        Self {
            entity,
            changes,
            index,
            total,
        }
    }

    /// Returns the live entity.
    #[must_use]
    pub fn entity(&self) -> &SharedEntity {
        &self.entity
    }

    /// Observed properties that differ from the baseline.
    #[must_use]
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Position among edited entities in this commit, starting at zero.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of edited entities in this commit.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Instruction to delete a removed entity.
#[derive(Debug, Clone)]
pub struct RemoveCommand {
    entity: SharedEntity,
    index: usize,
    total: usize,
}

impl RemoveCommand {
    pub(crate) fn new(entity: SharedEntity, index: usize, total: usize) -> Self {
        Self {
            entity,
            index,
            total,
        }
    }

    /// Returns the live entity.
    #[must_use]
    pub fn entity(&self) -> &SharedEntity {
        &self.entity
    }

    /// Position among removed entities in this commit, starting at zero.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of removed entities in this commit.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Any command.
#[derive(Debug, Clone)]
pub enum Command {
    /// A new entity.
    New(NewCommand),
    /// An edited entity.
    Edit(EditCommand),
    /// A removed entity.
    Remove(RemoveCommand),
}

impl Command {
    /// Returns the command kind.
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::New(_) => CommandKind::New,
            Self::Edit(_) => CommandKind::Edit,
            Self::Remove(_) => CommandKind::Remove,
        }
    }

    /// Returns the live entity.
    #[must_use]
    pub fn entity(&self) -> &SharedEntity {
        match self {
            Self::New(c) => c.entity(),
            Self::Edit(c) => c.entity(),
            Self::Remove(c) => c.entity(),
        }
    }
}
