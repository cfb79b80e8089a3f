//! Extension hooks.
//!
//! Hooks are synchronous callbacks invoked at fixed points of the unit of
//! work. The `pre_*` entity hooks receive the entity passed by the caller
//! and return the entity the operation should use from then on; returning
//! the argument unchanged is the identity behaviour.

use crate::entity::SharedEntity;
use std::fmt;
use std::sync::Arc;

/// Hook that may substitute the entity an operation works on.
pub type SubstituteHook = Arc<dyn Fn(SharedEntity) -> SharedEntity + Send + Sync>;

/// Hook invoked before a commit starts.
pub type PreCommitHook = Arc<dyn Fn() + Send + Sync>;

/// Hook invoked after a commit finished, with `true` on success.
pub type PostCommitHook = Arc<dyn Fn(bool) + Send + Sync>;

/// Callbacks registered on a unit of work.
///
/// # Example
///
/// ```rust,ignore
/// let hooks = Hooks::new()
///     .pre_register(|entity| proxies.unwrap(entity))
///     .post_commit(|ok| tracing::info!(ok, "unit of work finished"));
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    pre_register: Option<SubstituteHook>,
    pre_get_state: Option<SubstituteHook>,
    pre_remove: Option<SubstituteHook>,
    pre_commit: Option<PreCommitHook>,
    post_commit: Option<PostCommitHook>,
}

impl Hooks {
    /// Creates an empty set of hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs before an entity is registered.
    #[must_use]
    pub fn pre_register<F>(mut self, hook: F) -> Self
    where
        F: Fn(SharedEntity) -> SharedEntity + Send + Sync + 'static,
    {
        self.pre_register = Some(Arc::new(hook));
        self
    }

    /// Runs before an entity's state is read.
    #[must_use]
    pub fn pre_get_state<F>(mut self, hook: F) -> Self
    where
        F: Fn(SharedEntity) -> SharedEntity + Send + Sync + 'static,
    {
        self.pre_get_state = Some(Arc::new(hook));
        self
    }

    /// Runs before an entity is marked for removal.
    #[must_use]
    pub fn pre_remove<F>(mut self, hook: F) -> Self
    where
        F: Fn(SharedEntity) -> SharedEntity + Send + Sync + 'static,
    {
        self.pre_remove = Some(Arc::new(hook));
        self
    }

    /// Runs before a commit starts.
    #[must_use]
    pub fn pre_commit<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.pre_commit = Some(Arc::new(hook));
        self
    }

    /// Runs after a commit finished.
    #[must_use]
    pub fn post_commit<F>(mut self, hook: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.post_commit = Some(Arc::new(hook));
        self
    }

    pub(crate) fn before_register(&self, entity: SharedEntity) -> SharedEntity {
        substitute(self.pre_register.as_ref(), entity)
    }

    pub(crate) fn before_get_state(&self, entity: SharedEntity) -> SharedEntity {
        substitute(self.pre_get_state.as_ref(), entity)
    }

    pub(crate) fn before_remove(&self, entity: SharedEntity) -> SharedEntity {
        substitute(self.pre_remove.as_ref(), entity)
    }

    pub(crate) fn before_commit(&self) {
        if let Some(hook) = &self.pre_commit {
            hook();
        }
    }

    pub(crate) fn after_commit(&self, success: bool) {
        if let Some(hook) = &self.post_commit {
            hook(success);
        }
    }
}

fn substitute(hook: Option<&SubstituteHook>, entity: SharedEntity) -> SharedEntity {
    match hook {
        Some(hook) => hook(entity),
        None => entity,
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_register", &self.pre_register.is_some())
            .field("pre_get_state", &self.pre_get_state.is_some())
            .field("pre_remove", &self.pre_remove.is_some())
            .field("pre_commit", &self.pre_commit.is_some())
            .field("post_commit", &self.post_commit.is_some())
            .finish()
    }
}
