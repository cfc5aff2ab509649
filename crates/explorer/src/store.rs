//! The active-filter store.
//!
//! A page owns one [`FilterStore`]. Filter controls write to it, the page
//! and any other consumer read from it, and subscribers are told about each
//! change as it happens.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use explorer::FilterStore;
//!
//! let store = FilterStore::new();
//! let seen = Rc::new(Cell::new(0));
//! let counter = seen.clone();
//! let subscription = store.subscribe(move |_| counter.set(counter.get() + 1));
//!
//! store.set_filter("title", "alpha");
//! store.set_filter("title", "alpha"); // unchanged, no notification
//! subscription.unsubscribe();
//! store.clear_all();
//!
//! assert_eq!(seen.get(), 1);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use explorer_seeker::{ActiveFilters, FilterValue};
use tracing::trace;

type Listener = Rc<dyn Fn(&ActiveFilters)>;

#[derive(Default)]
struct Inner {
    filters: ActiveFilters,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Shared, single-threaded holder of the active filters.
///
/// Clones share the same state. No validation happens here; controls are
/// expected to produce values that fit their filter's operator.
#[derive(Clone, Default)]
pub struct FilterStore {
    inner: Rc<RefCell<Inner>>,
}

impl std::fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FilterStore")
            .field("filters", &inner.filters)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the current filters.
    pub fn get(&self) -> ActiveFilters {
        self.inner.borrow().filters.clone()
    }

    /// Reads the current filters without copying them.
    pub fn with<R>(&self, f: impl FnOnce(&ActiveFilters) -> R) -> R {
        f(&self.inner.borrow().filters)
    }

    /// Replaces the value for `field`. An empty value removes the entry.
    ///
    /// Returns whether the filters changed.
    pub fn set_filter(&self, field: impl Into<String>, value: impl Into<FilterValue>) -> bool {
        self.update(|filters| filters.set(field, value))
    }

    /// Removes the entry for `field`.
    pub fn remove_filter(&self, field: &str) -> bool {
        self.update(|filters| filters.remove(field))
    }

    /// Removes every entry.
    pub fn clear_all(&self) -> bool {
        self.update(ActiveFilters::clear)
    }

    /// Registers `listener`, called with the new filters after every
    /// change.
    pub fn subscribe(&self, listener: impl Fn(&ActiveFilters) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn update(&self, change: impl FnOnce(&mut ActiveFilters) -> bool) -> bool {
        let (filters, listeners) = {
            let mut inner = self.inner.borrow_mut();
            if !change(&mut inner.filters) {
                return false;
            }
            let listeners: Vec<Listener> =
                inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (inner.filters.clone(), listeners)
        };

        // Listeners run with the borrow released so they can read or even
        // write the store.
        trace!(active = filters.len(), listeners = listeners.len(), "filters changed");
        for listener in listeners {
            listener(&filters);
        }
        true
    }
}

/// Handle returned by [`FilterStore::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[derive(Debug)]
pub struct Subscription {
    store: Weak<RefCell<Inner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
