//! Command handlers.

use super::{Command, EditCommand, NewCommand, RemoveCommand};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A handler rejected a command.
///
/// This is a business outcome, not a configuration error: the unit of
/// work rolls back and reports it as the commit result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command rejected: {reason}")]
pub struct CommandFailure {
    reason: String,
}

impl CommandFailure {
    /// Creates a failure with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Result of handling one command.
pub type CommandResult = Result<(), CommandFailure>;

/// Acts on one kind of command, typically by writing to a backend.
pub trait CommandHandler<C>: Send + Sync {
    /// Handles the command. An error aborts the commit.
    fn handle(&self, command: &C) -> CommandResult;
}

impl<C, F> CommandHandler<C> for F
where
    F: Fn(&C) -> CommandResult + Send + Sync,
{
    fn handle(&self, command: &C) -> CommandResult {
        self(command)
    }
}

/// Optional handlers of one entity type, one per command kind.
///
/// A missing handler means the transition has no side effect.
#[derive(Clone, Default)]
pub struct Handlers {
    /// Handler for new entities.
    pub new: Option<Arc<dyn CommandHandler<NewCommand>>>,
    /// Handler for edited entities.
    pub edit: Option<Arc<dyn CommandHandler<EditCommand>>>,
    /// Handler for removed entities.
    pub remove: Option<Arc<dyn CommandHandler<RemoveCommand>>>,
}

impl Handlers {
    /// Dispatches a command to the matching handler.
    ///
    /// Returns `None` when no handler is configured for its kind.
    pub fn dispatch(&self, command: &Command) -> Option<CommandResult> {
        match command {
            Command::New(c) => self.new.as_ref().map(|h| h.handle(c)),
            Command::Edit(c) => self.edit.as_ref().map(|h| h.handle(c)),
            Command::Remove(c) => self.remove.as_ref().map(|h| h.handle(c)),
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("new", &self.new.is_some())
            .field("edit", &self.edit.is_some())
            .field("remove", &self.remove.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use crate::entity::{shared, Entity, SharedEntity};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use unitwork_value::{Value, ValueError, ValueResult};

    #[derive(Debug)]
    struct Row;

    impl Entity for Row {
        fn property(&self, _: &str) -> Option<Value> {
            None
        }

        fn set_property(&mut self, name: &str, _: Value) -> ValueResult<()> {
            Err(ValueError::unknown_property(name))
        }
    }

    struct Counter(AtomicUsize);

    impl CommandHandler<RemoveCommand> for Counter {
        fn handle(&self, _: &RemoveCommand) -> CommandResult {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn row() -> SharedEntity {
        shared(Row)
    }

    #[test]
    fn missing_handler_dispatches_nothing() {
        let handlers = Handlers::default();
        let command = Command::New(NewCommand::new(row(), 0, 1));
        assert!(handlers.dispatch(&command).is_none());
    }

    #[test]
    fn closures_are_handlers() {
        let handler = |c: &NewCommand| {
            if c.total() > 1 {
                Err(CommandFailure::new("batch too large"))
            } else {
                Ok(())
            }
        };
        let handlers = Handlers {
            new: Some(Arc::new(handler)),
            ..Handlers::default()
        };

        let ok = Command::New(NewCommand::new(row(), 0, 1));
        let too_many = Command::New(NewCommand::new(row(), 0, 2));
        assert_eq!(handlers.dispatch(&ok), Some(Ok(())));
        assert_eq!(
            handlers.dispatch(&too_many),
            Some(Err(CommandFailure::new("batch too large")))
        );
    }

    #[test]
    fn handler_sees_only_its_kind() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let handlers = Handlers {
            remove: Some(counter.clone()),
            ..Handlers::default()
        };

        handlers.dispatch(&Command::Remove(RemoveCommand::new(row(), 0, 1)));
        handlers.dispatch(&Command::New(NewCommand::new(row(), 0, 1)));

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(
            Command::Remove(RemoveCommand::new(row(), 0, 1)).kind(),
            CommandKind::Remove
        );
    }
}
