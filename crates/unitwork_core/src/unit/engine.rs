//! Unit of work engine.

use super::state::EntityState;
use super::tables::{RegistrationTables, Tracked};
use crate::changes::{ChangeSet, Comparer};
use crate::command::{
    Command, CommandFailure, CommandKind, EditCommand, NewCommand, RemoveCommand,
};
use crate::config::Config;
use crate::entity::{InstanceKey, SharedEntity, Trackable};
use crate::error::{CoreError, CoreResult};
use crate::hooks::Hooks;
use crate::identity::IdentityResolver;
use crate::metadata::MetadataRegistry;
use crate::snapshot::SnapshotMaker;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, info_span, trace, warn};
use unitwork_value::Value;
use uuid::Uuid;

/// Identifier of one unit of work, used to correlate log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitOfWorkId(Uuid);

impl UnitOfWorkId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UnitOfWorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uow:{}", self.0)
    }
}

/// Counts of commands dispatched by a successful commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// New entities.
    pub created: usize,
    /// Edited entities.
    pub updated: usize,
    /// Removed entities, now forgotten.
    pub removed: usize,
}

/// Result of a commit that ran to a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Every command was handled; baselines now match the live entities.
    Committed(CommitReport),
    /// A handler rejected a command; every entity was restored from its
    /// baseline and removal marks were dropped.
    RolledBack {
        /// Kind of the rejected command.
        kind: CommandKind,
        /// Why the handler rejected it.
        failure: CommandFailure,
    },
}

impl CommitOutcome {
    /// Whether the commit succeeded.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// Returns the handler failure of a rolled back commit.
    #[must_use]
    pub fn failure(&self) -> Option<&CommandFailure> {
        match self {
            Self::Committed(_) => None,
            Self::RolledBack { failure, .. } => Some(failure),
        }
    }
}

/// Per-kind counters.
#[derive(Debug, Default)]
struct Tally {
    new: usize,
    edit: usize,
    remove: usize,
}

impl Tally {
    fn slot(&mut self, kind: CommandKind) -> &mut usize {
        match kind {
            CommandKind::New => &mut self.new,
            CommandKind::Edit => &mut self.edit,
            CommandKind::Remove => &mut self.remove,
        }
    }

    /// Increments the counter of `kind`, returning its previous value.
    fn bump(&mut self, kind: CommandKind) -> usize {
        let slot = self.slot(kind);
        let previous = *slot;
        *slot += 1;
        previous
    }

    fn get(&self, kind: CommandKind) -> usize {
        match kind {
            CommandKind::New => self.new,
            CommandKind::Edit => self.edit,
            CommandKind::Remove => self.remove,
        }
    }
}

/// Tracks entities and commits their changes as one unit.
///
/// A unit of work is meant for a single logical transaction: register
/// what you load, mutate freely, then [`commit`](Self::commit). It does no
/// I/O; every side effect goes through the command handlers declared in
/// the metadata.
///
/// Operations take `&mut self` and run synchronously. Sharing a unit of
/// work across threads requires external locking around the whole
/// register-to-commit sequence. Callers must not hold a lock guard on a
/// tracked entity while calling into the unit of work.
///
/// # Example
///
/// ```rust,ignore
/// let mut uow = UnitOfWork::new(registry);
/// let person = shared(Person::new(None, "Norbert"));
///
/// uow.register(&person)?;
/// person.write().first_name = "Michal".into();
///
/// match uow.commit()? {
///     CommitOutcome::Committed(report) => println!("{} created", report.created),
///     CommitOutcome::RolledBack { failure, .. } => println!("rejected: {failure}"),
/// }
/// ```
pub struct UnitOfWork {
    id: UnitOfWorkId,
    registry: Arc<MetadataRegistry>,
    snapshots: SnapshotMaker,
    hooks: Hooks,
    config: Config,
    tables: RegistrationTables,
}

impl UnitOfWork {
    /// Creates a unit of work with default configuration and no hooks.
    pub fn new(registry: impl Into<Arc<MetadataRegistry>>) -> Self {
        Self::with_config(registry, Config::default(), Hooks::default())
    }

    /// Creates a unit of work with explicit configuration and hooks.
    pub fn with_config(
        registry: impl Into<Arc<MetadataRegistry>>,
        config: Config,
        hooks: Hooks,
    ) -> Self {
        Self {
            id: UnitOfWorkId::new(),
            registry: registry.into(),
            snapshots: SnapshotMaker::new(config.max_snapshot_depth),
            hooks,
            config,
            tables: RegistrationTables::default(),
        }
    }

    /// Returns the identifier of this unit of work.
    #[must_use]
    pub fn id(&self) -> UnitOfWorkId {
        self.id
    }

    /// Returns the metadata registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<MetadataRegistry> {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no entity is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.len() == 0
    }

    /// Starts tracking an entity and records its baseline.
    ///
    /// Registering an instance that is already tracked replaces its
    /// baseline with the current state.
    pub fn register(&mut self, entity: &impl Trackable) -> CoreResult<()> {
        self.track(entity.to_shared()).map(|_| ())
    }

    /// Whether the instance is tracked.
    #[must_use]
    pub fn is_registered(&self, entity: &impl Trackable) -> bool {
        self.tables.contains(InstanceKey::of(&entity.to_shared()))
    }

    /// Classifies a tracked entity.
    ///
    /// Removal marks win, then a missing identity means new, then any
    /// observed difference from the baseline means edited.
    pub fn get_entity_state(&self, entity: &impl Trackable) -> CoreResult<EntityState> {
        let entity = self.hooks.before_get_state(entity.to_shared());
        let key = InstanceKey::of(&entity);
        let tracked = self.tables.get(key).ok_or(CoreError::NotRegistered)?;
        self.classify(key, tracked)
    }

    /// Marks an entity for removal at the next commit.
    ///
    /// An untracked entity with an assigned identity is registered first.
    /// An untracked entity without identity cannot be removed.
    pub fn remove(&mut self, entity: &impl Trackable) -> CoreResult<()> {
        let entity = self.hooks.before_remove(entity.to_shared());
        let mut key = InstanceKey::of(&entity);

        if !self.tables.contains(key) {
            let persisted = {
                let guard = entity.read();
                let metadata = self.registry.get_definition(&*guard)?;
                IdentityResolver::is_persisted_with(metadata, &*guard)?
            };
            if !persisted {
                return Err(CoreError::CannotRemoveTransient);
            }
            key = self.track(entity)?;
        }

        self.tables.mark_removed(key);
        debug!(unit = %self.id, entity = %key, "marked entity for removal");
        Ok(())
    }

    /// Returns the observed changes of a tracked entity since its baseline.
    pub fn changes(&self, entity: &impl Trackable) -> CoreResult<ChangeSet> {
        let key = InstanceKey::of(&entity.to_shared());
        let tracked = self.tables.get(key).ok_or(CoreError::NotRegistered)?;
        let guard = tracked.entity.read();
        Comparer::changes_with(&tracked.metadata, &tracked.baseline, &*guard)
    }

    /// Returns the identity value of an entity.
    pub fn identity(&self, entity: &impl Trackable) -> CoreResult<Value> {
        let entity = entity.to_shared();
        let guard = entity.read();
        let metadata = self.registry.get_definition(&*guard)?;
        IdentityResolver::resolve(metadata, &*guard)
    }

    /// Dispatches one command per changed entity.
    ///
    /// Entities are visited in registration order. If a handler rejects a
    /// command, dispatch stops, every entity is rolled back and the
    /// outcome is [`CommitOutcome::RolledBack`]. Commands already handled
    /// are not undone; handlers own their side effects.
    ///
    /// On success, removed entities are forgotten and every surviving
    /// entity's baseline becomes its current state.
    ///
    /// The pre-commit hook runs before anything is classified, so entities
    /// it mutates are planned with their new state.
    ///
    /// Configuration errors found before dispatch leave everything as it
    /// was; those found later roll back like a rejected command and are
    /// returned as `Err`.
    pub fn commit(&mut self) -> CoreResult<CommitOutcome> {
        let span = info_span!("commit", unit = %self.id);
        let _entered = span.enter();

        self.hooks.before_commit();

        let mut totals = Tally::default();
        let mut plan = Vec::with_capacity(self.tables.len());
        for (key, tracked) in self.tables.iter() {
            if let Some(kind) = self.classify(key, tracked)?.command_kind() {
                totals.bump(kind);
                plan.push((key, kind));
            }
        }
        debug!(
            new = totals.new,
            edited = totals.edit,
            removed = totals.remove,
            "commit planned"
        );

        let mut indices = Tally::default();
        for (key, kind) in plan {
            let Some(tracked) = self.tables.get(key) else {
                continue;
            };
            let metadata = Arc::clone(&tracked.metadata);
            let command = match self.build_command(key, tracked, kind, indices.bump(kind), &totals)
            {
                Ok(command) => command,
                Err(err) => return Err(self.abort(err)),
            };

            match metadata.handlers().dispatch(&command) {
                None => trace!(entity = %key, %kind, "no handler configured"),
                Some(Ok(())) => trace!(entity = %key, %kind, "command handled"),
                Some(Err(failure)) => {
                    warn!(
                        entity = %key,
                        %kind,
                        reason = failure.reason(),
                        "command rejected, rolling back"
                    );
                    let restored = self.rollback();
                    self.hooks.after_commit(false);
                    restored?;
                    return Ok(CommitOutcome::RolledBack { kind, failure });
                }
            }
        }

        let baselines: CoreResult<Vec<_>> = self
            .tables
            .iter()
            .filter(|(key, _)| !self.tables.is_removed(*key))
            .map(|(key, tracked)| {
                let guard = tracked.entity.read();
                let captured = self.snapshots.capture(&tracked.metadata, &*guard);
                captured.map(|snapshot| (key, snapshot))
            })
            .collect();
        let baselines = match baselines {
            Ok(baselines) => baselines,
            Err(err) => return Err(self.abort(err)),
        };

        let removed = self.tables.purge_removed();
        for (key, baseline) in baselines {
            self.tables.set_baseline(key, baseline);
        }

        let report = CommitReport {
            created: totals.new,
            updated: totals.edit,
            removed,
        };
        info!(
            created = report.created,
            updated = report.updated,
            removed = report.removed,
            "commit succeeded"
        );
        self.hooks.after_commit(true);
        Ok(CommitOutcome::Committed(report))
    }

    /// Restores every tracked entity from its baseline, in place, and
    /// drops all removal marks.
    ///
    /// Handles held by the application stay valid and observe the
    /// restored values. An entity that refuses a restored value does not
    /// stop the others from being restored; the first refusal is returned
    /// once every entity has been visited and the marks are dropped.
    pub fn rollback(&mut self) -> CoreResult<()> {
        let mut first = None;
        for (key, tracked) in self.tables.iter() {
            let mut guard = tracked.entity.write();
            if let Err(err) = self.snapshots.restore(&tracked.baseline, &mut *guard) {
                warn!(unit = %self.id, entity = %key, error = %err, "entity not fully restored");
                first.get_or_insert(err);
            }
        }
        self.tables.clear_removed();
        debug!(unit = %self.id, entities = self.tables.len(), "rolled back");
        first.map_or(Ok(()), Err)
    }

    fn track(&mut self, entity: SharedEntity) -> CoreResult<InstanceKey> {
        if !self.registry.has_definition(&*entity.read()) {
            return Err(CoreError::invalid_input(
                "Only entities can be registered in Unit of Work.",
            ));
        }

        let entity = self.hooks.before_register(entity);
        let key = InstanceKey::of(&entity);
        let (metadata, baseline) = {
            let guard = entity.read();
            let metadata = Arc::clone(self.registry.get_definition(&*guard)?);
            let baseline = self.snapshots.capture(&metadata, &*guard)?;
            (metadata, baseline)
        };

        debug!(
            unit = %self.id,
            entity = %key,
            entity_type = %metadata.entity_type(),
            replaced = self.tables.contains(key),
            "registered entity"
        );
        self.tables.insert(
            key,
            Tracked {
                entity,
                metadata,
                baseline,
            },
        );
        Ok(key)
    }

    fn classify(&self, key: InstanceKey, tracked: &Tracked) -> CoreResult<EntityState> {
        if self.tables.is_removed(key) {
            return Ok(EntityState::Removed);
        }

        let guard = tracked.entity.read();
        if !IdentityResolver::is_persisted_with(&tracked.metadata, &*guard)? {
            return Ok(EntityState::New);
        }

        if Comparer::are_equal_with(&tracked.metadata, &tracked.baseline, &*guard)? {
            Ok(EntityState::Persisted)
        } else {
            Ok(EntityState::Edited)
        }
    }

    fn build_command(
        &self,
        key: InstanceKey,
        tracked: &Tracked,
        kind: CommandKind,
        index: usize,
        totals: &Tally,
    ) -> CoreResult<Command> {
        let entity = Arc::clone(&tracked.entity);
        let total = totals.get(kind);
        let command = match kind {
            CommandKind::New => Command::New(NewCommand::new(entity, index, total)),
            CommandKind::Remove => Command::Remove(RemoveCommand::new(entity, index, total)),
            CommandKind::Edit => {
                let changes = {
                    let guard = tracked.entity.read();
                    Comparer::changes_with(&tracked.metadata, &tracked.baseline, &*guard)?
                };
                if self.config.log_changes {
                    debug!(entity = %key, ?changes, "edit command");
                }
                Command::Edit(EditCommand::new(entity, changes, index, total))
            }
        };
        Ok(command)
    }

    /// Rolls back after a configuration error surfaced mid-commit.
    fn abort(&mut self, err: CoreError) -> CoreError {
        warn!(error = %err, "commit aborted, rolling back");
        if let Err(rollback_err) = self.rollback() {
            warn!(error = %rollback_err, "rollback after aborted commit failed");
        }
        self.hooks.after_commit(false);
        err
    }
}

impl fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("id", &self.id)
            .field("tracked", &self.tables.len())
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish()
    }
}
