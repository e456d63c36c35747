//! Synchronous typed publish/subscribe hub.
//!
//! Events form a closed enum implementing [`Event`]; each variant carries its
//! own payload and maps to one [`Event::Name`] tag. Listeners are registered
//! per tag and invoked in registration order on the caller's thread.
//!
//! Semantics:
//! - A [`Listener`] is identified by its `Arc`. Registering the same `Arc`
//!   twice for one event keeps a single registration.
//! - `emit` works on a snapshot: listeners added during an emission are not
//!   called by it, listeners removed during it are skipped.
//! - A panicking listener aborts the rest of that emission. The hub's lock is
//!   released before any listener runs, so its state stays usable.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// A closed set of events, each tagged with a name.
pub trait Event: Send + Sync + 'static {
    type Name: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn name(&self) -> Self::Name;
}

/// A shared listener callback.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registration<E: Event> {
    id: u64,
    listener: Listener<E>,
}

impl<E: Event> Clone for Registration<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            listener: Arc::clone(&self.listener),
        }
    }
}

struct Registry<E: Event> {
    listeners: Mutex<HashMap<E::Name, Vec<Registration<E>>>>,
    next_id: AtomicU64,
}

impl<E: Event> Registry<E> {
    fn lock(&self) -> MutexGuard<'_, HashMap<E::Name, Vec<Registration<E>>>> {
        // Listeners never run under the lock, so poisoning can only come from
        // a panic inside the hub itself; the map is still consistent.
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn remove_where(&self, name: E::Name, matches: impl Fn(&Registration<E>) -> bool) {
        let mut listeners = self.lock();
        if let Some(registrations) = listeners.get_mut(&name) {
            if let Some(index) = registrations.iter().position(|r| matches(r)) {
                registrations.remove(index);
            }
            if registrations.is_empty() {
                listeners.remove(&name);
            }
        }
    }

    fn is_registered(&self, name: E::Name, id: u64) -> bool {
        self.lock()
            .get(&name)
            .is_some_and(|registrations| registrations.iter().any(|r| r.id == id))
    }
}

/// Event hub for one event enum.
pub struct EventEmitter<E: Event> {
    registry: Arc<Registry<E>>,
}

impl<E: Event> EventEmitter<E> {
    /// Create a hub with no listeners.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                listeners: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a closure for `name`.
    ///
    /// Each call creates a distinct registration. Use [`EventEmitter::on_listener`]
    /// with a shared [`Listener`] to get identity-based deduplication.
    pub fn on<F>(&self, name: E::Name, callback: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.on_listener(name, Arc::new(callback))
    }

    /// Register a shared listener for `name`.
    ///
    /// If the same `Arc` is already registered for `name`, no second
    /// registration is made and the returned handle removes the existing one.
    pub fn on_listener(&self, name: E::Name, listener: Listener<E>) -> Subscription<E> {
        let mut listeners = self.registry.lock();
        let registrations = listeners.entry(name).or_default();

        let existing = registrations
            .iter()
            .find(|r| Arc::ptr_eq(&r.listener, &listener))
            .map(|r| r.id);

        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
                registrations.push(Registration { id, listener });
                id
            }
        };

        Subscription {
            registry: Arc::downgrade(&self.registry),
            name,
            id,
        }
    }

    /// Register a closure that runs at most once.
    ///
    /// The registration is removed before the callback is entered, so a
    /// callback that re-emits the same event does not see itself again.
    pub fn once<F>(&self, name: E::Name, callback: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let fired = AtomicBool::new(false);
        let own_id: Arc<Mutex<Option<Subscription<E>>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&own_id);

        let subscription = self.on(name, move |event: &E| {
            if fired.swap(true, Ordering::SeqCst) {
                return;
            }
            let handle = slot
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            if let Some(handle) = handle {
                handle.unsubscribe();
            }
            callback(event);
        });

        *own_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(subscription.clone());
        subscription
    }

    /// Remove the registration of `listener` for `name`. No-op if absent.
    pub fn off(&self, name: E::Name, listener: &Listener<E>) {
        self.registry
            .remove_where(name, |r| Arc::ptr_eq(&r.listener, listener));
    }

    /// Invoke every listener registered for the event's name.
    pub fn emit(&self, event: &E) {
        let name = event.name();
        let snapshot: Vec<Registration<E>> = match self.registry.lock().get(&name) {
            Some(registrations) => registrations.clone(),
            None => return,
        };

        for registration in snapshot {
            if self.registry.is_registered(name, registration.id) {
                (registration.listener)(event);
            }
        }
    }

    /// Remove all listeners for `name`, or for every event when `None`.
    pub fn clear(&self, name: Option<E::Name>) {
        let mut listeners = self.registry.lock();
        match name {
            Some(name) => {
                listeners.remove(&name);
            }
            None => listeners.clear(),
        }
    }

    /// Number of listeners registered for `name`.
    pub fn listener_count(&self, name: E::Name) -> usize {
        self.registry.lock().get(&name).map_or(0, Vec::len)
    }

    /// Whether any listener is registered for `name`.
    pub fn has_listeners(&self, name: E::Name) -> bool {
        self.registry.lock().contains_key(&name)
    }
}

impl<E: Event> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.registry.lock();
        let counts: HashMap<&E::Name, usize> = listeners
            .iter()
            .map(|(name, registrations)| (name, registrations.len()))
            .collect();
        f.debug_struct("EventEmitter")
            .field("listeners", &counts)
            .finish()
    }
}

/// Handle for one registration, returned by `on`/`once`.
///
/// Dropping the handle does not unsubscribe.
pub struct Subscription<E: Event> {
    registry: Weak<Registry<E>>,
    name: E::Name,
    id: u64,
}

impl<E: Event> Subscription<E> {
    /// Remove exactly this registration. No-op if it is already gone or the
    /// emitter was dropped.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove_where(self.name, |r| r.id == self.id);
        }
    }

    /// Whether this registration is still active.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.is_registered(self.name, self.id))
    }
}

impl<E: Event> Clone for Subscription<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Weak::clone(&self.registry),
            name: self.name,
            id: self.id,
        }
    }
}

impl<E: Event> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}
