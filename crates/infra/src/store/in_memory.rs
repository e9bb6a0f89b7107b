use std::collections::BTreeMap;
use std::sync::RwLock;

use marketplace_core::{DomainError, Entity};

use super::Store;

/// `RwLock<BTreeMap>` store for dev, tests and the demo server.
///
/// A poisoned lock reads as empty and rejects writes with an invariant error.
#[derive(Debug)]
pub struct InMemoryStore<V: Entity> {
    inner: RwLock<BTreeMap<V::Id, V>>,
}

impl<V: Entity> InMemoryStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<V: Entity> Default for InMemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> DomainError {
    DomainError::invariant("store lock poisoned")
}

impl<V> Store<V> for InMemoryStore<V>
where
    V: Entity + Clone + Send + Sync + 'static,
    V::Id: Send + Sync,
{
    fn get(&self, id: &V::Id) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn insert_unique(&self, value: V, conflicts: &dyn Fn(&V) -> bool) -> Result<(), DomainError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let id = value.id();
        if map.contains_key(&id) {
            return Err(DomainError::conflict(format!("id {id:?} already exists")));
        }
        if map.values().any(conflicts) {
            return Err(DomainError::conflict("a matching record already exists"));
        }
        map.insert(id, value);
        Ok(())
    }

    fn update(&self, id: &V::Id, f: &mut dyn FnMut(&mut V) -> Result<(), DomainError>) -> Result<V, DomainError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let current = map.get(id).ok_or(DomainError::NotFound)?;

        let mut next = current.clone();
        f(&mut next)?;
        map.insert(*id, next.clone());
        Ok(next)
    }

    fn remove(&self, id: &V::Id) -> Option<V> {
        let mut map = self.inner.write().ok()?;
        map.remove(id)
    }

    fn list(&self) -> Vec<V> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn find(&self, predicate: &dyn Fn(&V) -> bool) -> Vec<V> {
        match self.inner.read() {
            Ok(map) => map.values().filter(|&v| predicate(v)).cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn count(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    fn count_where(&self, predicate: &dyn Fn(&V) -> bool) -> usize {
        match self.inner.read() {
            Ok(map) => map.values().filter(|&v| predicate(v)).count(),
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        id: u64,
        title: &'static str,
    }

    impl Entity for Note {
        type Id = u64;

        fn id(&self) -> u64 {
            self.id
        }
    }

    fn note(id: u64, title: &'static str) -> Note {
        Note { id, title }
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = InMemoryStore::new();
        store.insert(note(3, "c")).unwrap();
        store.insert(note(1, "a")).unwrap();
        store.insert(note(2, "b")).unwrap();

        let ids: Vec<u64> = store.list().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let store = InMemoryStore::new();
        store.insert(note(1, "a")).unwrap();
        let err = store.insert(note(1, "b")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.get(&1).unwrap().title, "a");
    }

    #[test]
    fn insert_unique_checks_predicate() {
        let store = InMemoryStore::new();
        store.insert(note(1, "a")).unwrap();
        let err = store.insert_unique(note(2, "a"), &|n| n.title == "a").unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(store.get(&2).is_none());
    }

    #[test]
    fn failed_update_leaves_record_untouched() {
        let store = InMemoryStore::new();
        store.insert(note(1, "a")).unwrap();

        let err = store
            .update(&1, &mut |n| {
                n.title = "changed";
                Err(DomainError::validation("nope"))
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.get(&1).unwrap().title, "a");

        let updated = store
            .update(&1, &mut |n| {
                n.title = "b";
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.title, "b");
    }

    #[test]
    fn update_missing_is_not_found() {
        let store: InMemoryStore<Note> = InMemoryStore::new();
        assert_eq!(store.update(&9, &mut |_| Ok(())).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn find_and_count_where_agree() {
        let store = InMemoryStore::new();
        for (id, title) in [(1, "x"), (2, "y"), (3, "x")] {
            store.insert(note(id, title)).unwrap();
        }
        assert_eq!(store.find(&|n| n.title == "x").len(), 2);
        assert_eq!(store.count_where(&|n| n.title == "x"), 2);
        assert_eq!(store.find_one(&|n| n.title == "y").unwrap().id, 2);
        assert_eq!(store.remove(&2).unwrap().id, 2);
        assert_eq!(store.count(), 2);
    }
}
