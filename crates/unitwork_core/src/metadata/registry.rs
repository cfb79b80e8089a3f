//! Metadata registry.

use super::definition::{ClassDefinition, ClassMetadata};
use crate::entity::{Entity, EntityType};
use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps runtime entity types to their metadata.
///
/// Read-only after construction.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    by_type: HashMap<EntityType, Arc<ClassMetadata>>,
    /// Types in registration order.
    order: Vec<EntityType>,
}

impl MetadataRegistry {
    /// Builds a registry from class definitions.
    ///
    /// Fails with [`CoreError::InvalidInput`] if any definition is
    /// malformed or a type is defined twice.
    pub fn new<I>(definitions: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = ClassDefinition>,
    {
        let mut registry = Self::default();
        for definition in definitions {
            let metadata = definition.validate()?;
            let entity_type = metadata.entity_type();
            if registry.by_type.contains_key(&entity_type) {
                return Err(CoreError::invalid_input(format!(
                    "Each element of class definitions collection must be a well-formed class definition: {entity_type} is defined more than once."
                )));
            }
            registry.order.push(entity_type);
            registry.by_type.insert(entity_type, Arc::new(metadata));
        }
        Ok(registry)
    }

    /// Whether the entity's runtime type has metadata.
    #[must_use]
    pub fn has_definition(&self, entity: &dyn Entity) -> bool {
        self.by_type.contains_key(&EntityType::of_entity(entity))
    }

    /// Returns metadata for the entity's runtime type.
    pub fn get_definition(&self, entity: &dyn Entity) -> CoreResult<&Arc<ClassMetadata>> {
        let entity_type = EntityType::of_entity(entity);
        self.definition_for(entity_type)
            .ok_or(CoreError::UndefinedType {
                type_name: entity_type.name(),
            })
    }

    /// Returns metadata for a type, if registered.
    #[must_use]
    pub fn definition_for(&self, entity_type: EntityType) -> Option<&Arc<ClassMetadata>> {
        self.by_type.get(&entity_type)
    }

    /// Iterates metadata in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<ClassMetadata>> {
        self.order.iter().filter_map(|t| self.by_type.get(t))
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
