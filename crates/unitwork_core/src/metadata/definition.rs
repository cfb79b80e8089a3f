//! Class definitions.

use crate::command::{
    CommandHandler, CommandResult, EditCommand, Handlers, NewCommand, RemoveCommand,
};
use crate::entity::{Entity, EntityType};
use crate::error::{CoreError, CoreResult};
use std::collections::HashSet;
use std::sync::Arc;
use unitwork_value::PropertyPath;

/// Declaration of how an entity type is tracked.
///
/// Definitions are plain declarations; they are checked when handed to
/// [`MetadataRegistry::new`](crate::MetadataRegistry::new).
///
/// # Example
///
/// ```rust,ignore
/// let definition = ClassDefinition::of::<Person>("id")
///     .observe(["firstName", "lastName", "items"])
///     .on_new(|command| store.insert(command));
/// ```
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    entity_type: EntityType,
    identity: String,
    observed: Vec<String>,
    handlers: Handlers,
}

impl ClassDefinition {
    /// Starts a definition for `T` with the given identity path.
    #[must_use]
    pub fn of<T: Entity + 'static>(identity: impl Into<String>) -> Self {
        Self {
            entity_type: EntityType::of::<T>(),
            identity: identity.into(),
            observed: Vec::new(),
            handlers: Handlers::default(),
        }
    }

    /// Adds observed properties, in declaration order.
    #[must_use]
    pub fn observe<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.observed.extend(properties.into_iter().map(Into::into));
        self
    }

    /// Handles new entities with a closure.
    #[must_use]
    pub fn on_new<F>(self, handler: F) -> Self
    where
        F: Fn(&NewCommand) -> CommandResult + Send + Sync + 'static,
    {
        self.new_handler(handler)
    }

    /// Handles edited entities with a closure.
    #[must_use]
    pub fn on_edit<F>(self, handler: F) -> Self
    where
        F: Fn(&EditCommand) -> CommandResult + Send + Sync + 'static,
    {
        self.edit_handler(handler)
    }

    /// Handles removed entities with a closure.
    #[must_use]
    pub fn on_remove<F>(self, handler: F) -> Self
    where
        F: Fn(&RemoveCommand) -> CommandResult + Send + Sync + 'static,
    {
        self.remove_handler(handler)
    }

    /// Sets the handler for new entities.
    #[must_use]
    pub fn new_handler(mut self, handler: impl CommandHandler<NewCommand> + 'static) -> Self {
        self.handlers.new = Some(Arc::new(handler));
        self
    }

    /// Sets the handler for edited entities.
    #[must_use]
    pub fn edit_handler(mut self, handler: impl CommandHandler<EditCommand> + 'static) -> Self {
        self.handlers.edit = Some(Arc::new(handler));
        self
    }

    /// Sets the handler for removed entities.
    #[must_use]
    pub fn remove_handler(mut self, handler: impl CommandHandler<RemoveCommand> + 'static) -> Self {
        self.handlers.remove = Some(Arc::new(handler));
        self
    }

    /// Returns the entity type this definition describes.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Checks the definition and produces immutable metadata.
    pub(crate) fn validate(self) -> CoreResult<ClassMetadata> {
        let malformed = |reason: String| {
            CoreError::invalid_input(format!(
                "Each element of class definitions collection must be a well-formed class definition: {} {reason}.",
                self.entity_type
            ))
        };

        let identity = PropertyPath::parse(&self.identity)
            .map_err(|e| malformed(format!("has an invalid identity path ({e})")))?;

        let mut seen = HashSet::new();
        let mut observed = Vec::with_capacity(self.observed.len());
        for raw in &self.observed {
            let path = PropertyPath::parse(raw)
                .map_err(|e| malformed(format!("has an invalid observed property ({e})")))?;
            if !seen.insert(raw.as_str()) {
                return Err(malformed(format!("observes \"{raw}\" more than once")));
            }
            observed.push(path);
        }

        let mut tracked: Vec<String> = Vec::new();
        for root in std::iter::once(identity.root()).chain(observed.iter().map(PropertyPath::root)) {
            if !tracked.iter().any(|t| t == root) {
                tracked.push(root.to_string());
            }
        }

        Ok(ClassMetadata {
            entity_type: self.entity_type,
            identity,
            observed,
            tracked,
            handlers: self.handlers,
        })
    }
}

/// Validated, immutable metadata for one entity type.
#[derive(Debug)]
pub struct ClassMetadata {
    entity_type: EntityType,
    identity: PropertyPath,
    observed: Vec<PropertyPath>,
    tracked: Vec<String>,
    handlers: Handlers,
}

impl ClassMetadata {
    /// Returns the entity type.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Returns the identity path.
    #[must_use]
    pub fn identity(&self) -> &PropertyPath {
        &self.identity
    }

    /// Returns observed properties in declaration order.
    #[must_use]
    pub fn observed(&self) -> &[PropertyPath] {
        &self.observed
    }

    /// Top-level properties captured by snapshots.
    ///
    /// The identity root comes first, followed by the roots of observed
    /// paths in declaration order, without duplicates.
    #[must_use]
    pub fn tracked(&self) -> &[String] {
        &self.tracked
    }

    /// Returns the command handlers.
    #[must_use]
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }
}
