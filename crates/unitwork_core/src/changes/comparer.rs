//! Structural comparison of entities.

use super::change_set::{Change, ChangeSet};
use crate::entity::{Entity, EntityType, PropertySource};
use crate::error::{CoreError, CoreResult};
use crate::metadata::{ClassMetadata, MetadataRegistry};
use std::sync::Arc;
use unitwork_value::{PropertyPath, Value};

/// Compares entities on their observed properties.
///
/// Comparison is structural: scalars by value, sequences element by
/// element, maps and nested records key by key. Properties that are not
/// observed, including the identity unless it is declared observed, are
/// ignored. Comparisons keep no state between calls.
#[derive(Debug, Clone)]
pub struct Comparer {
    registry: Arc<MetadataRegistry>,
}

impl Comparer {
    /// Creates a comparer over the given metadata.
    pub fn new(registry: Arc<MetadataRegistry>) -> Self {
        Self { registry }
    }

    /// Whether two entities are equal on every observed property.
    ///
    /// Entities of different runtime types are never equal. An observed
    /// path that resolves on neither entity is an error.
    pub fn are_equal(&self, a: &dyn Entity, b: &dyn Entity) -> CoreResult<bool> {
        let metadata = self.registry.get_definition(a)?;
        if EntityType::of_entity(b) != metadata.entity_type() {
            return Ok(false);
        }
        Self::are_equal_with(metadata, a, b)
    }

    /// Returns the observed properties that differ from `origin` to `current`.
    ///
    /// A path that resolves on one side only is a change to or from null.
    pub fn changes(&self, origin: &dyn Entity, current: &dyn Entity) -> CoreResult<ChangeSet> {
        let metadata = self.registry.get_definition(origin)?;
        Self::changes_with(metadata, origin, current)
    }

    pub(crate) fn are_equal_with<A, B>(
        metadata: &ClassMetadata,
        origin: &A,
        current: &B,
    ) -> CoreResult<bool>
    where
        A: PropertySource + ?Sized,
        B: PropertySource + ?Sized,
    {
        for path in metadata.observed() {
            let (before, after) = Self::read_pair(metadata, path, origin, current)?;
            if before != after {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(crate) fn changes_with<A, B>(
        metadata: &ClassMetadata,
        origin: &A,
        current: &B,
    ) -> CoreResult<ChangeSet>
    where
        A: PropertySource + ?Sized,
        B: PropertySource + ?Sized,
    {
        let mut changes = ChangeSet::new();
        for path in metadata.observed() {
            let (before, after) = Self::read_pair(metadata, path, origin, current)?;
            if before != after {
                changes.push(Change::new(
                    path.as_str(),
                    before.unwrap_or_default(),
                    after.unwrap_or_default(),
                ));
            }
        }
        Ok(changes)
    }

    fn read_pair<A, B>(
        metadata: &ClassMetadata,
        path: &PropertyPath,
        origin: &A,
        current: &B,
    ) -> CoreResult<(Option<Value>, Option<Value>)>
    where
        A: PropertySource + ?Sized,
        B: PropertySource + ?Sized,
    {
        match (origin.read(path), current.read(path)) {
            (None, None) => Err(CoreError::property_path(
                metadata.entity_type().name(),
                path.as_str(),
            )),
            pair => Ok(pair),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ClassDefinition;
    use unitwork_value::{ValueError, ValueResult};

    #[derive(Debug, Clone)]
    struct Contact {
        id: Option<i64>,
        first_name: String,
        last_name: String,
        phones: Vec<String>,
        address: Value,
    }

    impl Entity for Contact {
        fn property(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "firstName" => Some(self.first_name.as_str().into()),
                "lastName" => Some(self.last_name.as_str().into()),
                "phones" => Some(self.phones.clone().into()),
                "address" => Some(self.address.clone()),
                _ => None,
            }
        }

        fn set_property(&mut self, name: &str, _: Value) -> ValueResult<()> {
            Err(ValueError::unknown_property(name))
        }
    }

    fn contact() -> Contact {
        Contact {
            id: Some(1),
            first_name: "Norbert".into(),
            last_name: "Orzechowicz".into(),
            phones: vec!["555-0100".into()],
            address: Value::map([("city", Value::from("Krakow"))]),
        }
    }

    fn comparer(observed: &[&str]) -> Comparer {
        let registry = MetadataRegistry::new([
            ClassDefinition::of::<Contact>("id").observe(observed.iter().copied())
        ])
        .unwrap();
        Comparer::new(Arc::new(registry))
    }

    #[test]
    fn equal_copies() {
        let comparer = comparer(&["firstName", "phones", "address"]);
        let a = contact();
        let b = a.clone();
        assert!(comparer.are_equal(&a, &b).unwrap());
    }

    #[test]
    fn different_first_name() {
        let comparer = comparer(&["firstName"]);
        let a = contact();
        let mut b = a.clone();
        b.first_name = "new first name".into();
        assert!(!comparer.are_equal(&a, &b).unwrap());
    }

    #[test]
    fn unobserved_properties_are_ignored() {
        let comparer = comparer(&["firstName"]);
        let a = contact();
        let mut b = a.clone();
        b.last_name = "Someone".into();
        b.id = Some(42);
        assert!(comparer.are_equal(&a, &b).unwrap());
        assert!(comparer.changes(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn collection_and_nested_changes() {
        let comparer = comparer(&["phones", "address.city"]);
        let a = contact();
        let mut b = a.clone();
        b.phones.push("555-0199".into());
        b.address = Value::map([("city", Value::from("Warsaw"))]);

        let changes = comparer.changes(&a, &b).unwrap();
        assert_eq!(changes.count(), 2);
        assert_eq!(
            changes.change_for("address.city").unwrap().origin_value(),
            &Value::from("Krakow")
        );
    }

    #[test]
    fn single_change_with_origin_value() {
        let comparer = comparer(&["firstName"]);
        let origin = contact();
        let mut current = origin.clone();
        current.first_name = "Michal".into();

        let changes = comparer.changes(&origin, &current).unwrap();
        assert_eq!(changes.count(), 1);
        let change = changes.change_for("firstName").unwrap();
        assert_eq!(change.origin_value(), &Value::from("Norbert"));
        assert_eq!(change.current_value(), &Value::from("Michal"));
    }

    #[test]
    fn changes_follow_declaration_order() {
        let comparer = comparer(&["lastName", "firstName"]);
        let origin = contact();
        let mut current = origin.clone();
        current.first_name = "A".into();
        current.last_name = "B".into();

        let names: Vec<_> = comparer
            .changes(&origin, &current)
            .unwrap()
            .iter()
            .map(|c| c.property().to_string())
            .collect();
        assert_eq!(names, ["lastName", "firstName"]);
    }

    #[test]
    fn vanished_nested_value_is_a_change_to_null() {
        let comparer = comparer(&["address.city"]);
        let origin = contact();
        let mut current = origin.clone();
        current.address = Value::Null;

        let changes = comparer.changes(&origin, &current).unwrap();
        assert_eq!(
            changes.change_for("address.city").unwrap().current_value(),
            &Value::Null
        );
    }

    #[test]
    fn path_missing_on_both_sides_is_an_error() {
        let comparer = comparer(&["address.zip"]);
        let a = contact();
        let b = a.clone();

        let err = comparer.are_equal(&a, &b).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPropertyPath { .. }));
        assert!(err.to_string().contains("address.zip"));
        assert!(comparer.changes(&a, &b).is_err());
    }

    #[test]
    fn nested_value_appearing_is_a_change_from_null() {
        let comparer = comparer(&["address.zip"]);
        let origin = contact();
        let mut current = origin.clone();
        current.address = Value::map([
            ("city", Value::from("Krakow")),
            ("zip", Value::from("30-001")),
        ]);

        assert!(!comparer.are_equal(&origin, &current).unwrap());
        let changes = comparer.changes(&origin, &current).unwrap();
        let change = changes.change_for("address.zip").unwrap();
        assert_eq!(change.origin_value(), &Value::Null);
        assert_eq!(change.current_value(), &Value::from("30-001"));
    }
}
