//! Keyed entity storage.
//!
//! Stores are the persistence collaborator of the API: the domain never touches
//! them directly. Only the in-memory implementation ships.

pub mod in_memory;

use std::sync::Arc;

use marketplace_core::{DomainError, Entity};

pub use in_memory::InMemoryStore;

/// Entity store keyed by the entity's own id. Listing is ordered by id.
pub trait Store<V: Entity>: Send + Sync {
    fn get(&self, id: &V::Id) -> Option<V>;

    /// Insert a new entity. Fails with `Conflict` when the id is taken or any
    /// stored entity satisfies `conflicts`, checked under the same write lock.
    fn insert_unique(&self, value: V, conflicts: &dyn Fn(&V) -> bool) -> Result<(), DomainError>;

    /// Run `f` against a copy of the entity and write it back only if `f`
    /// succeeds. Missing ids yield `NotFound`.
    fn update(&self, id: &V::Id, f: &mut dyn FnMut(&mut V) -> Result<(), DomainError>) -> Result<V, DomainError>;

    fn remove(&self, id: &V::Id) -> Option<V>;

    fn list(&self) -> Vec<V>;

    fn find(&self, predicate: &dyn Fn(&V) -> bool) -> Vec<V>;

    fn count(&self) -> usize;

    fn count_where(&self, predicate: &dyn Fn(&V) -> bool) -> usize;

    fn insert(&self, value: V) -> Result<(), DomainError> {
        self.insert_unique(value, &|_| false)
    }

    fn find_one(&self, predicate: &dyn Fn(&V) -> bool) -> Option<V> {
        self.find(predicate).into_iter().next()
    }
}

impl<V, S> Store<V> for Arc<S>
where
    V: Entity,
    S: Store<V> + ?Sized,
{
    fn get(&self, id: &V::Id) -> Option<V> {
        (**self).get(id)
    }

    fn insert_unique(&self, value: V, conflicts: &dyn Fn(&V) -> bool) -> Result<(), DomainError> {
        (**self).insert_unique(value, conflicts)
    }

    fn update(&self, id: &V::Id, f: &mut dyn FnMut(&mut V) -> Result<(), DomainError>) -> Result<V, DomainError> {
        (**self).update(id, f)
    }

    fn remove(&self, id: &V::Id) -> Option<V> {
        (**self).remove(id)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }

    fn find(&self, predicate: &dyn Fn(&V) -> bool) -> Vec<V> {
        (**self).find(predicate)
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn count_where(&self, predicate: &dyn Fn(&V) -> bool) -> usize {
        (**self).count_where(predicate)
    }
}
