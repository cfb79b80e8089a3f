//! Entity snapshots.
//!
//! A snapshot is the baseline an entity is diffed against. It holds an
//! owned copy of every tracked top-level property, taken through the
//! entity's [`Entity::property`] accessor. Because [`Value`] owns its
//! contents, later mutation of the live entity is never visible through
//! the snapshot and vice versa.
//!
//! The copy boundary is the value an entity exposes: a sub-object is
//! copied as the nested map its parent returns for it. Sub-entities that
//! need a lifecycle of their own must be registered separately.

use crate::entity::{Entity, PropertySource};
use crate::error::{CoreError, CoreResult};
use crate::metadata::ClassMetadata;
use std::collections::BTreeMap;
use unitwork_value::{PropertyPath, Value};

/// Recorded state of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    properties: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Returns a recorded top-level property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Iterates recorded properties by name.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PropertySource for Snapshot {
    fn read(&self, path: &PropertyPath) -> Option<Value> {
        self.properties
            .get(path.root())?
            .resolve(path.tail())
            .cloned()
    }
}

/// Takes and restores snapshots.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotMaker {
    max_depth: usize,
}

impl SnapshotMaker {
    /// Creates a snapshot maker that copies values up to `max_depth` levels deep.
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Copies the tracked properties of `entity`.
    ///
    /// Fails if a tracked property does not exist on the instance or
    /// nests deeper than the configured limit.
    pub fn capture(&self, metadata: &ClassMetadata, entity: &dyn Entity) -> CoreResult<Snapshot> {
        let type_name = metadata.entity_type().name();
        let mut properties = BTreeMap::new();

        for name in metadata.tracked() {
            let value = entity.property(name).ok_or_else(|| {
                if name == metadata.identity().root() {
                    CoreError::identity_path(type_name, metadata.identity().as_str())
                } else {
                    CoreError::property_path(type_name, name)
                }
            })?;

            let depth = value.depth();
            if depth > self.max_depth {
                return Err(CoreError::SnapshotTooDeep {
                    type_name,
                    property: name.clone(),
                    depth,
                    max_depth: self.max_depth,
                });
            }

            properties.insert(name.clone(), value);
        }

        Ok(Snapshot { properties })
    }

    /// Writes every recorded property back into `entity`, in place.
    ///
    /// A property the entity refuses does not stop the others from being
    /// written; the first refusal is returned.
    pub fn restore(&self, snapshot: &Snapshot, entity: &mut dyn Entity) -> CoreResult<()> {
        let mut first = None;
        for (name, value) in &snapshot.properties {
            if let Err(err) = entity.set_property(name, value.clone()) {
                first.get_or_insert(err);
            }
        }
        first.map_or(Ok(()), |err| Err(err.into()))
    }
}

impl Default for SnapshotMaker {
    fn default() -> Self {
        Self::new(crate::Config::default().max_snapshot_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ClassDefinition;
    use unitwork_value::{ValueError, ValueResult};

    #[derive(Debug, Clone, PartialEq)]
    struct Basket {
        id: Option<i64>,
        items: Vec<String>,
        note: String,
        untracked: i64,
    }

    impl Entity for Basket {
        fn property(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "items" => Some(self.items.clone().into()),
                "note" => Some(self.note.as_str().into()),
                "untracked" => Some(self.untracked.into()),
                _ => None,
            }
        }

        fn set_property(&mut self, name: &str, value: Value) -> ValueResult<()> {
            match name {
                "id" => self.id = value.try_into()?,
                "items" => self.items = value.try_into()?,
                "note" => self.note = value.try_into()?,
                "untracked" => self.untracked = value.try_into()?,
                _ => return Err(ValueError::unknown_property(name)),
            }
            Ok(())
        }
    }

    fn metadata(observed: &[&str]) -> ClassMetadata {
        ClassDefinition::of::<Basket>("id")
            .observe(observed.iter().copied())
            .validate()
            .unwrap()
    }

    fn basket() -> Basket {
        Basket {
            id: Some(1),
            items: vec!["apple".into()],
            note: "fresh".into(),
            untracked: 7,
        }
    }

    #[test]
    fn capture_is_independent_of_live_entity() {
        let metadata = metadata(&["items"]);
        let mut live = basket();
        let snapshot = SnapshotMaker::default().capture(&metadata, &live).unwrap();

        live.items.push("pear".into());

        assert_eq!(
            snapshot.property("items"),
            Some(&Value::from(vec!["apple"]))
        );
    }

    #[test]
    fn captures_identity_and_observed_only() {
        let metadata = metadata(&["note"]);
        let snapshot = SnapshotMaker::default().capture(&metadata, &basket()).unwrap();

        let names: Vec<_> = snapshot.properties().map(|(n, _)| n).collect();
        assert_eq!(names, ["id", "note"]);
        assert!(snapshot.property("untracked").is_none());
    }

    #[test]
    fn restore_in_place() {
        let metadata = metadata(&["items", "note"]);
        let maker = SnapshotMaker::default();
        let mut live = basket();
        let snapshot = maker.capture(&metadata, &live).unwrap();

        live.id = None;
        live.items.clear();
        live.note = "stale".into();
        live.untracked = 99;

        maker.restore(&snapshot, &mut live).unwrap();

        assert_eq!(live.id, Some(1));
        assert_eq!(live.items, vec!["apple".to_string()]);
        assert_eq!(live.note, "fresh");
        assert_eq!(live.untracked, 99);
    }

    #[test]
    fn missing_property_is_reported() {
        let metadata = metadata(&["colour"]);
        let err = SnapshotMaker::default().capture(&metadata, &basket()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPropertyPath { .. }));
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn depth_limit() {
        let metadata = metadata(&["items"]);
        let err = SnapshotMaker::new(1).capture(&metadata, &basket()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SnapshotTooDeep { depth: 2, max_depth: 1, .. }
        ));
    }

    #[test]
    fn snapshot_reads_nested_paths() {
        let metadata = metadata(&["items"]);
        let snapshot = SnapshotMaker::default().capture(&metadata, &basket()).unwrap();
        let first = PropertyPath::parse("items.0").unwrap();
        assert_eq!(snapshot.read(&first), Some(Value::from("apple")));
    }

    #[test]
    fn restore_writes_past_a_refused_property() {
        let metadata = ClassDefinition::of::<Basket>("id")
            .observe(["note", "untracked"])
            .validate()
            .unwrap();
        let maker = SnapshotMaker::default();
        let mut live = basket();
        let mut snapshot = maker.capture(&metadata, &live).unwrap();
        snapshot.properties.insert("id".into(), Value::from("not a number"));

        live.note = "stale".into();
        live.untracked = 99;
        let err = maker.restore(&snapshot, &mut live).unwrap_err();

        assert!(matches!(err, CoreError::Value(_)));
        assert_eq!(live.note, "fresh");
        assert_eq!(live.untracked, 7);
    }
}
