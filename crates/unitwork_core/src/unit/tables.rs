//! Registration tables.

use crate::entity::{InstanceKey, SharedEntity};
use crate::metadata::ClassMetadata;
use crate::snapshot::Snapshot;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One tracked instance.
#[derive(Debug, Clone)]
pub(crate) struct Tracked {
    pub(crate) entity: SharedEntity,
    pub(crate) metadata: Arc<ClassMetadata>,
    pub(crate) baseline: Snapshot,
}

/// Live entities, their baselines and removal marks, owned by one unit
/// of work.
#[derive(Debug, Default)]
pub(crate) struct RegistrationTables {
    entries: HashMap<InstanceKey, Tracked>,
    /// Keys in registration order.
    order: Vec<InstanceKey>,
    removed: HashSet<InstanceKey>,
}

impl RegistrationTables {
    /// Tracks an instance. A key already tracked keeps its position and
    /// gets the new baseline.
    pub(crate) fn insert(&mut self, key: InstanceKey, tracked: Tracked) {
        if self.entries.insert(key, tracked).is_none() {
            self.order.push(key);
        }
    }

    pub(crate) fn get(&self, key: InstanceKey) -> Option<&Tracked> {
        self.entries.get(&key)
    }

    pub(crate) fn contains(&self, key: InstanceKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub(crate) fn mark_removed(&mut self, key: InstanceKey) {
        self.removed.insert(key);
    }

    pub(crate) fn is_removed(&self, key: InstanceKey) -> bool {
        self.removed.contains(&key)
    }

    pub(crate) fn clear_removed(&mut self) {
        self.removed.clear();
    }

    /// Iterates tracked instances in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (InstanceKey, &Tracked)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|t| (*key, t)))
    }

    pub(crate) fn set_baseline(&mut self, key: InstanceKey, baseline: Snapshot) {
        if let Some(tracked) = self.entries.get_mut(&key) {
            tracked.baseline = baseline;
        }
    }

    /// Forgets every instance marked for removal. Returns how many were dropped.
    pub(crate) fn purge_removed(&mut self) -> usize {
        let removed = std::mem::take(&mut self.removed);
        for key in &removed {
            self.entries.remove(key);
        }
        self.order.retain(|key| !removed.contains(key));
        removed.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{shared, Entity};
    use crate::metadata::ClassDefinition;
    use crate::snapshot::SnapshotMaker;
    use unitwork_value::{Value, ValueError, ValueResult};

    #[derive(Debug)]
    struct Item(i64);

    impl Entity for Item {
        fn property(&self, name: &str) -> Option<Value> {
            (name == "id").then(|| Value::Integer(self.0))
        }

        fn set_property(&mut self, name: &str, _: Value) -> ValueResult<()> {
            Err(ValueError::unknown_property(name))
        }
    }

    fn tracked(id: i64) -> (InstanceKey, Tracked) {
        let metadata = Arc::new(ClassDefinition::of::<Item>("id").validate().unwrap());
        let entity: SharedEntity = shared(Item(id));
        let baseline = SnapshotMaker::default()
            .capture(&metadata, &*entity.read())
            .unwrap();
        (
            InstanceKey::of(&entity),
            Tracked {
                entity,
                metadata,
                baseline,
            },
        )
    }

    #[test]
    fn keeps_registration_order_on_reinsert() {
        let mut tables = RegistrationTables::default();
        let (a, ta) = tracked(1);
        let (b, tb) = tracked(2);

        tables.insert(a, ta.clone());
        tables.insert(b, tb);
        tables.insert(a, ta);

        let keys: Vec<_> = tables.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, [a, b]);
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn purge_drops_removed_only() {
        let mut tables = RegistrationTables::default();
        let (a, ta) = tracked(1);
        let (b, tb) = tracked(2);
        tables.insert(a, ta);
        tables.insert(b, tb);

        tables.mark_removed(a);
        assert!(tables.is_removed(a));
        assert_eq!(tables.purge_removed(), 1);

        assert!(!tables.contains(a));
        assert!(tables.contains(b));
        assert!(!tables.is_removed(a));
        assert_eq!(tables.len(), 1);
    }
}
