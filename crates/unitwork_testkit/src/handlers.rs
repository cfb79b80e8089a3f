//! Command handlers for tests.
//!
//! [`RecordingHandler`] keeps a log of every command it receives and can
//! be installed for all three command kinds at once. [`FailingHandler`]
//! rejects commands, optionally after letting a number of them through.

use crate::fixtures::Person;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use unitwork_core::{
    with_entity_mut, ChangeSet, ClassDefinition, CommandFailure, CommandHandler, CommandKind,
    CommandResult, EditCommand, NewCommand, RemoveCommand, SharedEntity,
};
use unitwork_value::Value;

/// One command as seen by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    /// Kind of command.
    pub kind: CommandKind,
    /// Position among commands of the same kind.
    pub index: usize,
    /// Number of commands of the same kind.
    pub total: usize,
    /// Identity of the entity when the command was handled.
    pub identity: Value,
    /// Change set, for edit commands.
    pub changes: Option<ChangeSet>,
}

/// Records every command it handles.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingHandler {
    /// Creates a handler with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs this handler for every command kind of `definition`.
    #[must_use]
    pub fn install(&self, definition: ClassDefinition) -> ClassDefinition {
        definition
            .new_handler(self.clone())
            .edit_handler(self.clone())
            .remove_handler(self.clone())
    }

    /// Returns a copy of the log.
    pub fn recorded(&self) -> Vec<Recorded> {
        self.log.lock().clone()
    }

    /// Returns the kinds of recorded commands, in dispatch order.
    pub fn kinds(&self) -> Vec<CommandKind> {
        self.log.lock().iter().map(|r| r.kind).collect()
    }

    /// Returns the number of recorded commands.
    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    /// Clears the log.
    pub fn clear(&self) {
        self.log.lock().clear();
    }

    fn record(
        &self,
        kind: CommandKind,
        entity: &SharedEntity,
        index: usize,
        total: usize,
        changes: Option<ChangeSet>,
    ) -> CommandResult {
        let identity = entity.read().property("id").unwrap_or_default();
        self.log.lock().push(Recorded {
            kind,
            index,
            total,
            identity,
            changes,
        });
        Ok(())
    }
}

impl CommandHandler<NewCommand> for RecordingHandler {
    fn handle(&self, command: &NewCommand) -> CommandResult {
        self.record(
            CommandKind::New,
            command.entity(),
            command.index(),
            command.total(),
            None,
        )
    }
}

impl CommandHandler<EditCommand> for RecordingHandler {
    fn handle(&self, command: &EditCommand) -> CommandResult {
        self.record(
            CommandKind::Edit,
            command.entity(),
            command.index(),
            command.total(),
            Some(command.changes().clone()),
        )
    }
}

impl CommandHandler<RemoveCommand> for RecordingHandler {
    fn handle(&self, command: &RemoveCommand) -> CommandResult {
        self.record(
            CommandKind::Remove,
            command.entity(),
            command.index(),
            command.total(),
            None,
        )
    }
}

/// Rejects commands with a fixed reason.
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    reason: String,
    allowed: usize,
    seen: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// Rejects every command.
    pub fn new(reason: impl Into<String>) -> Self {
        Self::after(0, reason)
    }

    /// Accepts the first `allowed` commands, then rejects the rest.
    pub fn after(allowed: usize, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            allowed,
            seen: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the number of commands received, accepted or not.
    pub fn seen(&self) -> usize {
        self.seen.load(Ordering::SeqCst)
    }

    fn check(&self) -> CommandResult {
        if self.seen.fetch_add(1, Ordering::SeqCst) < self.allowed {
            Ok(())
        } else {
            Err(CommandFailure::new(self.reason.clone()))
        }
    }
}

impl CommandHandler<NewCommand> for FailingHandler {
    fn handle(&self, _: &NewCommand) -> CommandResult {
        self.check()
    }
}

impl CommandHandler<EditCommand> for FailingHandler {
    fn handle(&self, _: &EditCommand) -> CommandResult {
        self.check()
    }
}

impl CommandHandler<RemoveCommand> for FailingHandler {
    fn handle(&self, _: &RemoveCommand) -> CommandResult {
        self.check()
    }
}

/// Assigns sequential identities to new [`Person`]s, like a backend
/// returning generated keys.
#[derive(Debug)]
pub struct IdAssigner {
    next: AtomicI64,
}

impl IdAssigner {
    /// Starts assigning at `first`.
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl CommandHandler<NewCommand> for IdAssigner {
    fn handle(&self, command: &NewCommand) -> CommandResult {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        with_entity_mut(command.entity(), |person: &mut Person| person.id = Some(id))
            .ok_or_else(|| CommandFailure::new("not a person"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_handler_counts_down() {
        let handler = FailingHandler::after(2, "quota");
        assert!(handler.check().is_ok());
        assert!(handler.check().is_ok());
        let err = handler.check().unwrap_err();
        assert_eq!(err.reason(), "quota");
        assert_eq!(handler.seen(), 3);
    }

    #[test]
    fn recording_clones_share_log() {
        let handler = RecordingHandler::new();
        let clone = handler.clone();
        let entity: SharedEntity = crate::fixtures::norbert();

        clone
            .record(CommandKind::New, &entity, 0, 1, None)
            .unwrap();

        assert_eq!(handler.kinds(), [CommandKind::New]);
        assert_eq!(handler.recorded()[0].identity, Value::Null);
        handler.clear();
        assert!(clone.is_empty());
    }
}
