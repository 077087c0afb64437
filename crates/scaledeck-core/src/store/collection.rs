// ── Ordered entity collection ──
//
// Each collection is a single `watch` cell holding an immutable snapshot.
// Writers swap the whole snapshot; readers clone the `Arc` and never block.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::Identified;

pub(crate) type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// An ordered collection for a single entity type.
///
/// Order is the order the server returned.
pub(crate) struct EntityCollection<T: Identified + Send + Sync + 'static> {
    snapshot: watch::Sender<Snapshot<T>>,
}

impl<T: Identified + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { snapshot }
    }

    /// Replace the whole collection.
    ///
    /// Entries sharing a cache key collapse to one: the later entry wins
    /// but keeps the position of the first.
    pub(crate) fn replace_all(&self, entities: impl IntoIterator<Item = T>) {
        let mut by_key: IndexMap<String, Arc<T>> = IndexMap::new();
        for entity in entities {
            by_key.insert(entity.cache_key().to_owned(), Arc::new(entity));
        }
        let values: Vec<Arc<T>> = by_key.into_values().collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    /// Remove the entity with this cache key. Returns `true` if one was removed.
    pub(crate) fn remove_by_id(&self, id: &str) -> bool {
        self.remove_where(|e| e.cache_key() == id)
    }

    /// Remove every entity matching `pred`. Subscribers are only notified
    /// when something was actually removed.
    pub(crate) fn remove_where(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.snapshot.send_if_modified(|snap| {
            if !snap.iter().any(|e| pred(e)) {
                return false;
            }
            let kept: Vec<Arc<T>> = snap.iter().filter(|e| !pred(e)).cloned().collect();
            *snap = Arc::new(kept);
            true
        })
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn get_by_id(&self, id: &str) -> Option<Arc<T>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|e| e.cache_key() == id)
            .cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }
}
