use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use rdf_olap_model::{OlapError, OlapResult};
use std::hash::Hash;
use std::sync::Arc;

/// The items of a populated [DeferredList].
pub type Items<T> = Arc<[Arc<T>]>;

enum DeferredState<T> {
    Empty,
    Populating,
    Populated(Items<T>),
}

struct Slot<T> {
    state: DeferredState<T>,
    /// Incremented whenever a population starts or the list is reset. Populations that finish
    /// after their attempt has been superseded do not store their result.
    attempt: u64,
    /// The error of the most recent failed attempt. Handed to the threads that waited for it.
    failure: Option<(u64, OlapError)>,
}

/// A collection that is populated on first access.
///
/// At most one thread populates the list at a time. Threads that access the list during the
/// population block until it finishes and then observe its outcome. A failed population is
/// reported to every waiting thread and leaves the list empty, so the next access retries.
pub struct DeferredList<T> {
    slot: Mutex<Slot<T>>,
    finished: Condvar,
}

impl<T> DeferredList<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                state: DeferredState::Empty,
                attempt: 0,
                failure: None,
            }),
            finished: Condvar::new(),
        }
    }

    /// Returns the items, calling `populate` if the list has not been populated yet.
    pub fn get_or_populate(
        &self,
        populate: impl FnOnce() -> OlapResult<Vec<T>>,
    ) -> OlapResult<Items<T>> {
        let mut slot = self.slot.lock();
        loop {
            match &slot.state {
                DeferredState::Populated(items) => return Ok(Arc::clone(items)),
                DeferredState::Empty => break,
                DeferredState::Populating => {
                    let attempt = slot.attempt;
                    self.finished.wait_while(&mut slot, |s| {
                        matches!(s.state, DeferredState::Populating) && s.attempt == attempt
                    });
                    if let Some((failed, error)) = &slot.failure {
                        if *failed == attempt {
                            return Err(error.clone());
                        }
                    }
                }
            }
        }

        slot.attempt += 1;
        slot.state = DeferredState::Populating;
        let attempt = slot.attempt;
        drop(slot);

        let mut guard = PopulationGuard {
            list: self,
            attempt,
            completed: false,
        };
        let result = populate();
        guard.completed = true;

        let mut slot = self.slot.lock();
        let superseded = slot.attempt != attempt;
        let result = match result {
            Ok(items) => {
                let items: Items<T> = items.into_iter().map(Arc::new).collect();
                if !superseded {
                    slot.state = DeferredState::Populated(Arc::clone(&items));
                    slot.failure = None;
                }
                Ok(items)
            }
            Err(error) => {
                if !superseded {
                    slot.state = DeferredState::Empty;
                    slot.failure = Some((attempt, error.clone()));
                }
                Err(error)
            }
        };
        drop(slot);
        self.finished.notify_all();
        result
    }

    /// Returns the items if the list is populated.
    pub fn get(&self) -> Option<Items<T>> {
        match &self.slot.lock().state {
            DeferredState::Populated(items) => Some(Arc::clone(items)),
            DeferredState::Empty | DeferredState::Populating => None,
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.slot.lock().state, DeferredState::Populated(_))
    }

    /// Discards the items. A population that is in progress is superseded: its result is returned
    /// to its caller but not stored, and threads waiting for it start a new population.
    pub fn reset(&self) {
        let mut slot = self.slot.lock();
        slot.attempt += 1;
        slot.state = DeferredState::Empty;
        slot.failure = None;
        drop(slot);
        self.finished.notify_all();
    }
}

impl<T> Default for DeferredList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resets the list if the population panics.
struct PopulationGuard<'list, T> {
    list: &'list DeferredList<T>,
    attempt: u64,
    completed: bool,
}

impl<T> Drop for PopulationGuard<'_, T> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let mut slot = self.list.slot.lock();
        if slot.attempt == self.attempt {
            slot.state = DeferredState::Empty;
        }
        drop(slot);
        self.list.finished.notify_all();
    }
}

/// Deferred lists keyed by the object that contains them (e.g., the dimensions of each cube).
pub struct DeferredMap<K, T> {
    lists: DashMap<K, Arc<DeferredList<T>>>,
}

impl<K: Eq + Hash, T> DeferredMap<K, T> {
    pub fn new() -> Self {
        Self {
            lists: DashMap::new(),
        }
    }

    /// Returns the list for `key`, creating an empty one if necessary.
    pub fn list(&self, key: K) -> Arc<DeferredList<T>> {
        Arc::clone(self.lists.entry(key).or_default().value())
    }

    /// Drops all lists.
    pub fn clear(&self) {
        self.lists.clear();
    }
}

impl<K: Eq + Hash, T> Default for DeferredMap<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
