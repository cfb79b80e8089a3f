//! Changes and change sets.

use serde::{Deserialize, Serialize};
use unitwork_value::Value;

/// A difference in one observed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    property: String,
    origin: Value,
    current: Value,
}

impl Change {
    /// Creates a change.
    pub fn new(property: impl Into<String>, origin: Value, current: Value) -> Self {
        Self {
            property: property.into(),
            origin,
            current,
        }
    }

    /// Returns the property path.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Returns the value recorded in the baseline.
    #[must_use]
    pub fn origin_value(&self) -> &Value {
        &self.origin
    }

    /// Returns the value on the live entity.
    #[must_use]
    pub fn current_value(&self) -> &Value {
        &self.current
    }
}

/// Changes of one entity, in observed-property declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Returns the number of changes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Whether the given property changed.
    #[must_use]
    pub fn has_change_for(&self, property: &str) -> bool {
        self.change_for(property).is_some()
    }

    /// Returns the change of the given property.
    #[must_use]
    pub fn change_for(&self, property: &str) -> Option<&Change> {
        self.changes.iter().find(|c| c.property == property)
    }

    /// Iterates changes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl FromIterator<Change> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_property() {
        let set: ChangeSet = [
            Change::new("firstName", "Norbert".into(), "Michal".into()),
            Change::new("items", Value::from(vec!["a"]), Value::from(vec!["a", "b"])),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.count(), 2);
        assert!(set.has_change_for("items"));
        assert!(!set.has_change_for("lastName"));
        assert_eq!(
            set.change_for("firstName").map(Change::origin_value),
            Some(&Value::from("Norbert"))
        );
    }

    #[test]
    fn serializes_for_handlers() {
        let set: ChangeSet = [Change::new("firstName", "a".into(), "b".into())]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["changes"][0]["property"], "firstName");
    }
}
