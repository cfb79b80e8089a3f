//! Tracked entities.
//!
//! An entity is any application type that exposes its properties as
//! [`Value`]s and accepts them back. The unit of work never looks at an
//! entity beyond that and its runtime type.

mod key;

pub use key::{EntityType, InstanceKey};

use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use unitwork_value::{PropertyPath, Value, ValueResult};

/// Runtime type access for entity trait objects.
///
/// Blanket-implemented for every `'static` type; there is no need to
/// implement it by hand.
pub trait AsAny {
    /// Returns `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as `&mut dyn Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the name of the concrete type.
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A business object participating in change tracking.
///
/// # Example
///
/// ```rust
/// use unitwork_core::Entity;
/// use unitwork_value::{Value, ValueError, ValueResult};
///
/// #[derive(Debug)]
/// struct Tag {
///     id: Option<i64>,
///     label: String,
/// }
///
/// impl Entity for Tag {
///     fn property(&self, name: &str) -> Option<Value> {
///         match name {
///             "id" => Some(self.id.into()),
///             "label" => Some(self.label.as_str().into()),
///             _ => None,
///         }
///     }
///
///     fn set_property(&mut self, name: &str, value: Value) -> ValueResult<()> {
///         match name {
///             "id" => self.id = value.try_into()?,
///             "label" => self.label = value.try_into()?,
///             _ => return Err(ValueError::unknown_property(name)),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Entity: AsAny + Send + Sync + fmt::Debug {
    /// Reads a top-level property.
    ///
    /// Returns `None` if the entity has no property with that name.
    fn property(&self, name: &str) -> Option<Value>;

    /// Writes a top-level property in place.
    ///
    /// Used by rollback to restore recorded state. Must accept every value
    /// previously returned by [`property`](Entity::property) for the same
    /// name.
    fn set_property(&mut self, name: &str, value: Value) -> ValueResult<()>;
}

/// A live entity shared between the application and the unit of work.
pub type SharedEntity = Arc<RwLock<dyn Entity>>;

/// Wraps an entity for registration.
///
/// Keep the returned handle to read and mutate the entity; pass a
/// reference to it to the unit of work.
pub fn shared<T: Entity + 'static>(entity: T) -> Arc<RwLock<T>> {
    Arc::new(RwLock::new(entity))
}

/// Anything the unit of work can take a shared entity handle from.
///
/// Implemented for typed handles returned by [`shared`] and for
/// [`SharedEntity`] itself.
pub trait Trackable {
    /// Returns a type-erased handle to the same allocation.
    fn to_shared(&self) -> SharedEntity;
}

impl<T: Entity + 'static> Trackable for Arc<RwLock<T>> {
    fn to_shared(&self) -> SharedEntity {
        self.clone()
    }
}

impl Trackable for SharedEntity {
    fn to_shared(&self) -> SharedEntity {
        Arc::clone(self)
    }
}

/// Runs `f` with the entity downcast to `T`.
///
/// Returns `None` if the entity is not a `T`.
pub fn with_entity<T: Entity + 'static, R>(
    entity: &SharedEntity,
    f: impl FnOnce(&T) -> R,
) -> Option<R> {
    let guard = entity.read();
    (*guard).as_any().downcast_ref::<T>().map(f)
}

/// Runs `f` with the entity downcast mutably to `T`.
///
/// Handlers use this to write back values produced by the backend, such
/// as a freshly assigned identity.
pub fn with_entity_mut<T: Entity + 'static, R>(
    entity: &SharedEntity,
    f: impl FnOnce(&mut T) -> R,
) -> Option<R> {
    let mut guard = entity.write();
    (*guard).as_any_mut().downcast_mut::<T>().map(f)
}

/// Something property paths can be read from.
///
/// Implemented by live entities and by their snapshots, so the same
/// comparison code serves both.
pub trait PropertySource {
    /// Reads the value at `path`, or `None` if it does not resolve.
    fn read(&self, path: &PropertyPath) -> Option<Value>;
}

impl PropertySource for dyn Entity + '_ {
    fn read(&self, path: &PropertyPath) -> Option<Value> {
        let root = self.property(path.root())?;
        if path.is_simple() {
            return Some(root);
        }
        root.resolve(path.tail()).cloned()
    }
}
