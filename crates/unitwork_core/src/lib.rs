//! # Unitwork Core
//!
//! Change tracking for in-memory business objects.
//!
//! A [`UnitOfWork`] remembers the state of every entity registered with
//! it, classifies each one as new, persisted, edited or removed, and on
//! [`commit`](UnitOfWork::commit) hands one command per changed entity to
//! the handlers declared in its [`ClassDefinition`]. If any handler
//! rejects its command, every tracked entity is restored in place.
//!
//! This crate provides:
//! - Entity metadata: identity path, observed properties, command handlers
//! - Snapshots and property-level change sets
//! - The unit of work engine with commit and rollback
//! - Hooks for substituting entities and observing commits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use unitwork_core::{shared, ClassDefinition, MetadataRegistry, UnitOfWork};
//!
//! let registry = MetadataRegistry::new([ClassDefinition::of::<Person>("id")
//!     .observe(["firstName", "lastName"])
//!     .on_edit(|command| repository.update(command))])?;
//!
//! let mut uow = UnitOfWork::new(registry);
//! let person = shared(repository.load(1)?);
//! uow.register(&person)?;
//!
//! person.write().first_name = "Michal".into();
//! let outcome = uow.commit()?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod changes;
mod command;
mod config;
mod entity;
mod error;
mod hooks;
mod identity;
mod metadata;
mod snapshot;
mod unit;

pub use changes::{Change, ChangeSet, Comparer};
pub use command::{
    Command, CommandFailure, CommandHandler, CommandKind, CommandResult, EditCommand, Handlers,
    NewCommand, RemoveCommand,
};
pub use config::Config;
pub use entity::{
    shared, with_entity, with_entity_mut, AsAny, Entity, EntityType, InstanceKey,
    PropertySource, SharedEntity, Trackable,
};
pub use error::{CoreError, CoreResult};
pub use hooks::{Hooks, PostCommitHook, PreCommitHook, SubstituteHook};
pub use identity::IdentityResolver;
pub use metadata::{ClassDefinition, ClassMetadata, MetadataRegistry};
pub use snapshot::{Snapshot, SnapshotMaker};
pub use unit::{CommitOutcome, CommitReport, EntityState, UnitOfWork, UnitOfWorkId};
pub use unitwork_value::{PropertyPath, Segment, Value, ValueError, ValueResult};
