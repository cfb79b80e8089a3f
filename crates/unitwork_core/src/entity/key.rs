//! Entity keys.

use super::{AsAny, Entity, SharedEntity};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Stable key of one live entity instance.
///
/// The key is the address of the shared allocation. The unit of work
/// holds a strong reference to every instance it tracks, so the address
/// cannot be reused while the key is in its tables. Two distinct
/// instances get distinct keys even if they carry the same business
/// identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceKey(usize);

impl InstanceKey {
    /// Returns the key of a shared entity.
    #[must_use]
    pub fn of(entity: &SharedEntity) -> Self {
        Self(Arc::as_ptr(entity).cast::<()>() as usize)
    }
}

impl fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceKey({:#x})", self.0)
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Runtime type of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
}

impl EntityType {
    /// Returns the entity type of `T`.
    #[must_use]
    pub fn of<T: Entity + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the runtime type of an entity instance.
    #[must_use]
    pub fn of_entity(entity: &dyn Entity) -> Self {
        Self {
            id: entity.as_any().type_id(),
            name: AsAny::type_name(entity),
        }
    }

    /// Returns the type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::shared;
    use unitwork_value::{Value, ValueError, ValueResult};

    #[derive(Debug)]
    struct Marker(i64);

    impl Entity for Marker {
        fn property(&self, name: &str) -> Option<Value> {
            (name == "id").then(|| Value::Integer(self.0))
        }

        fn set_property(&mut self, name: &str, value: Value) -> ValueResult<()> {
            if name != "id" {
                return Err(ValueError::unknown_property(name));
            }
            self.0 = value.try_into()?;
            Ok(())
        }
    }

    #[test]
    fn same_instance_same_key() {
        let typed = shared(Marker(1));
        let a: SharedEntity = typed.clone();
        let b: SharedEntity = typed;
        assert_eq!(InstanceKey::of(&a), InstanceKey::of(&b));
    }

    #[test]
    fn equal_business_identity_distinct_keys() {
        let a: SharedEntity = shared(Marker(1));
        let b: SharedEntity = shared(Marker(1));
        assert_ne!(InstanceKey::of(&a), InstanceKey::of(&b));
    }

    #[test]
    fn runtime_type_matches_static_type() {
        let entity: SharedEntity = shared(Marker(1));
        let guard = entity.read();
        assert_eq!(EntityType::of_entity(&*guard), EntityType::of::<Marker>());
        assert!(EntityType::of::<Marker>().name().ends_with("Marker"));
    }
}
