//! Entity metadata.
//!
//! Each entity type taking part in a unit of work is described once by a
//! [`ClassDefinition`]: the path to its identity, the properties whose
//! changes matter, and the handlers that act on its transitions. The
//! [`MetadataRegistry`] validates definitions up front and answers type
//! lookups afterwards.

mod definition;
mod registry;

pub use definition::{ClassDefinition, ClassMetadata};
pub use registry::MetadataRegistry;
