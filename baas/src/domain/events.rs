//! Multicast notifications delivered to registered listeners.
//!
//! Listeners run synchronously, in registration order, after the state change
//! they announce. The list is snapshotted before delivery so a callback may
//! register or remove listeners without deadlocking; such changes take effect
//! from the next notification.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle returned on registration, used to remove the listener later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered list of callbacks for one notification.
///
/// # Examples
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use baas::domain::Listeners;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let listeners = Listeners::<u32>::new();
/// let sink = Arc::clone(&seen);
/// listeners.add_listener(move |value| sink.lock().expect("lock").push(*value));
/// listeners.invoke(&7);
/// assert_eq!(*seen.lock().expect("lock"), vec![7]);
/// ```
pub struct Listeners<E: ?Sized> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Callback<E>)>>,
}

impl<E: ?Sized> Listeners<E> {
    /// Empty listener list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Register a callback; it is invoked after every earlier registration.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a previously registered callback. Returns whether it was found.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `payload` to every callback in registration order.
    pub fn invoke(&self, payload: &E) {
        let snapshot: Vec<Callback<E>> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(payload);
        }
    }
}

impl<E: ?Sized> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, Listeners<str>) {
        (Arc::new(Mutex::new(Vec::new())), Listeners::new())
    }

    #[test]
    fn delivers_in_registration_order() {
        let (seen, listeners) = recorder();
        for tag in ["first", "second", "third"] {
            let sink = Arc::clone(&seen);
            listeners.add_listener(move |payload: &str| {
                sink.lock().expect("lock").push(format!("{tag}:{payload}"));
            });
        }

        listeners.invoke("ping");

        assert_eq!(
            *seen.lock().expect("lock"),
            vec!["first:ping", "second:ping", "third:ping"]
        );
    }

    #[test]
    fn removed_listeners_stop_receiving() {
        let (seen, listeners) = recorder();
        let sink = Arc::clone(&seen);
        let id = listeners.add_listener(move |payload: &str| {
            sink.lock().expect("lock").push(payload.to_owned());
        });

        assert!(listeners.remove_listener(id));
        assert!(!listeners.remove_listener(id));
        listeners.invoke("ignored");

        assert!(seen.lock().expect("lock").is_empty());
        assert!(listeners.is_empty());
    }

    #[test]
    fn callbacks_may_register_listeners_while_invoked() {
        let listeners = Arc::new(Listeners::<str>::new());
        let inner = Arc::clone(&listeners);
        listeners.add_listener(move |_payload: &str| {
            inner.add_listener(|_payload: &str| {});
        });

        listeners.invoke("grow");

        assert_eq!(listeners.len(), 2);
    }
}
