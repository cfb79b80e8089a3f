//! Test fixtures.
//!
//! Provides a `Person` entity covering every value shape the unit of work
//! tracks: an optional identity, scalars, a sequence and a nested record.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use unitwork_core::{shared, ClassDefinition, Entity, MetadataRegistry, UnitOfWork};
use unitwork_value::{Value, ValueError, ValueResult};

/// Postal address, exposed by [`Person`] as a nested map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// City name.
    pub city: String,
    /// Street and number.
    pub street: String,
}

impl Address {
    /// Creates an address.
    pub fn new(city: impl Into<String>, street: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
        }
    }

    fn to_value(&self) -> Value {
        Value::map([
            ("city", Value::from(self.city.as_str())),
            ("street", Value::from(self.street.as_str())),
        ])
    }

    fn from_value(value: Value) -> ValueResult<Self> {
        let mut fields: BTreeMap<String, Value> = value.try_into()?;
        let mut take = |name: &str| -> ValueResult<String> {
            fields.remove(name).unwrap_or_default().try_into()
        };
        Ok(Self {
            city: take("city")?,
            street: take("street")?,
        })
    }
}

/// Person entity used across tests.
///
/// Property names follow the camel case a backend would use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    /// Identity; `None` until persisted.
    pub id: Option<i64>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Arbitrary tags.
    pub items: Vec<String>,
    /// Home address.
    pub address: Address,
}

impl Person {
    /// Creates a person with the given identity and first name.
    pub fn new(id: Option<i64>, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            ..Self::default()
        }
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    /// Sets the items.
    #[must_use]
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the address.
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }
}

impl Entity for Person {
    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "firstName" => Some(self.first_name.as_str().into()),
            "lastName" => Some(self.last_name.as_str().into()),
            "items" => Some(self.items.clone().into()),
            "address" => Some(self.address.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> ValueResult<()> {
        match name {
            "id" => self.id = value.try_into()?,
            "firstName" => self.first_name = value.try_into()?,
            "lastName" => self.last_name = value.try_into()?,
            "items" => self.items = value.try_into()?,
            "address" => self.address = Address::from_value(value)?,
            _ => return Err(ValueError::unknown_property(name)),
        }
        Ok(())
    }
}

/// Observed properties of [`Person`], in declaration order.
pub const PERSON_OBSERVED: [&str; 4] = ["firstName", "lastName", "items", "address"];

/// Class definition for [`Person`] without handlers.
pub fn person_definition() -> ClassDefinition {
    ClassDefinition::of::<Person>("id").observe(PERSON_OBSERVED)
}

/// Builds a unit of work over the given definitions.
///
/// Panics if the definitions are malformed.
pub fn unit_of_work<I>(definitions: I) -> UnitOfWork
where
    I: IntoIterator<Item = ClassDefinition>,
{
    UnitOfWork::new(MetadataRegistry::new(definitions).expect("Invalid class definitions"))
}

/// A transient person named Norbert.
pub fn norbert() -> Arc<RwLock<Person>> {
    shared(Person::new(None, "Norbert").with_last_name("Orzechowicz"))
}

/// A persisted person with every property populated.
pub fn persisted_person(id: i64) -> Arc<RwLock<Person>> {
    shared(
        Person::new(Some(id), "Michal")
            .with_last_name("Dabrowski")
            .with_items(["book", "pen"])
            .with_address(Address::new("Warsaw", "Marszalkowska 1")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_properties_restore_losslessly() {
        let original = persisted_person(1).read().clone();
        let mut copy = Person::default();

        for name in std::iter::once("id").chain(PERSON_OBSERVED) {
            let value = original.property(name).unwrap();
            copy.set_property(name, value).unwrap();
        }

        assert_eq!(copy, original);
    }

    #[test]
    fn rejects_unknown_and_mismatched() {
        let mut person = Person::default();
        assert!(matches!(
            person.set_property("age", Value::Integer(3)),
            Err(ValueError::UnknownProperty { .. })
        ));
        assert!(matches!(
            person.set_property("firstName", Value::Integer(3)),
            Err(ValueError::TypeMismatch { .. })
        ));
    }
}
