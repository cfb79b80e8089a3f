//! Identity resolution.

use crate::entity::{Entity, PropertySource};
use crate::error::{CoreError, CoreResult};
use crate::metadata::{ClassMetadata, MetadataRegistry};
use std::sync::Arc;
use unitwork_value::Value;

/// Reads entity identities through their declared identity paths.
///
/// An identity that resolves to an unassigned value (null, zero, empty)
/// marks the entity as new. A path that does not resolve at all is a
/// configuration error, never "unassigned".
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    registry: Arc<MetadataRegistry>,
}

impl IdentityResolver {
    /// Creates a resolver over the given metadata.
    pub fn new(registry: Arc<MetadataRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the raw identity value of an entity.
    pub fn identity_value(&self, entity: &dyn Entity) -> CoreResult<Value> {
        let metadata = self.registry.get_definition(entity)?;
        Self::resolve(metadata, entity)
    }

    /// Whether the entity carries an assigned identity.
    pub fn is_persisted(&self, entity: &dyn Entity) -> CoreResult<bool> {
        let metadata = self.registry.get_definition(entity)?;
        Self::is_persisted_with(metadata, entity)
    }

    /// Resolves the identity of `source` under known metadata.
    pub(crate) fn resolve<S>(metadata: &ClassMetadata, source: &S) -> CoreResult<Value>
    where
        S: PropertySource + ?Sized,
    {
        source.read(metadata.identity()).ok_or_else(|| {
            CoreError::identity_path(metadata.entity_type().name(), metadata.identity().as_str())
        })
    }

    pub(crate) fn is_persisted_with<S>(metadata: &ClassMetadata, source: &S) -> CoreResult<bool>
    where
        S: PropertySource + ?Sized,
    {
        Ok(!Self::resolve(metadata, source)?.is_unassigned())
    }
}
