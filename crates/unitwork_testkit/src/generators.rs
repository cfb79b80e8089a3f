//! Property-based test generators using proptest.
//!
//! Provides strategies for generating persons and the mutations applied
//! to them between registration and commit.

use crate::fixtures::{Address, Person};
use proptest::prelude::*;

/// Strategy for generating names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{0,11}").expect("Invalid regex")
}

/// Strategy for generating item lists.
pub fn items_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 0..5)
}

/// Strategy for generating addresses.
pub fn address_strategy() -> impl Strategy<Value = Address> {
    (name_strategy(), "[A-Z][a-z]{2,10} [1-9][0-9]{0,2}")
        .prop_map(|(city, street)| Address::new(city, street))
}

/// Strategy for generating persons with an optional identity.
pub fn person_strategy() -> impl Strategy<Value = Person> {
    (
        prop::option::of(1..i64::MAX),
        name_strategy(),
        name_strategy(),
        items_strategy(),
        address_strategy(),
    )
        .prop_map(|(id, first_name, last_name, items, address)| Person {
            id,
            first_name,
            last_name,
            items,
            address,
        })
}

/// Strategy for generating persisted persons.
pub fn persisted_person_strategy() -> impl Strategy<Value = Person> {
    (1..i64::MAX, person_strategy()).prop_map(|(id, person)| Person {
        id: Some(id),
        ..person
    })
}

/// A change applied to a person after registration.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Replace the first name.
    FirstName(String),
    /// Replace the last name.
    LastName(String),
    /// Append an item.
    PushItem(String),
    /// Drop every item.
    ClearItems,
    /// Replace the city of the address.
    City(String),
    /// Replace or clear the identity.
    Id(Option<i64>),
}

impl Mutation {
    /// Applies the mutation.
    pub fn apply(&self, person: &mut Person) {
        match self {
            Mutation::FirstName(name) => person.first_name = name.clone(),
            Mutation::LastName(name) => person.last_name = name.clone(),
            Mutation::PushItem(item) => person.items.push(item.clone()),
            Mutation::ClearItems => person.items.clear(),
            Mutation::City(city) => person.address.city = city.clone(),
            Mutation::Id(id) => person.id = *id,
        }
    }

    /// Whether the mutation only touches observed properties.
    pub fn is_observed(&self) -> bool {
        !matches!(self, Mutation::Id(_))
    }
}

/// Strategy for generating single mutations.
pub fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        name_strategy().prop_map(Mutation::FirstName),
        name_strategy().prop_map(Mutation::LastName),
        "[a-z]{1,8}".prop_map(Mutation::PushItem),
        Just(Mutation::ClearItems),
        name_strategy().prop_map(Mutation::City),
        prop::option::of(0..1000i64).prop_map(Mutation::Id),
    ]
}

/// Strategy for generating mutation sequences.
pub fn mutations_strategy() -> impl Strategy<Value = Vec<Mutation>> {
    prop::collection::vec(mutation_strategy(), 0..8)
}
