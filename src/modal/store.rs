//! URL-backed modal store.
//!
//! A modal is open exactly when its key is present in the current location's
//! query string. Opening writes `key=value` (replacing the history entry rather
//! than pushing one), closing removes the key, and all other parameters are
//! left alone. Payloads that cannot be encoded in the address go to the
//! [`SideChannel`], which lives next to the location inside the store.
//!
//! The store is a cheap handle: clones share the same state. Every location
//! change is published on a `tokio::sync::watch` channel so renderers can
//! refresh.

use super::location::Location;
use super::query::ModalQuery;
use super::side_channel::{Payload, SideChannel};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::watch;

/// Parameter value used by creation modals.
pub const NEW_TOKEN: &str = "new";

/// Identifier of one modal purpose, used as the query parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModalKey(Cow<'static, str>);

impl ModalKey {
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModalKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[derive(Debug)]
struct StoreInner {
    location: Location,
    side_channel: SideChannel,
}

/// Shared handle to the modal state of the current location.
#[derive(Debug, Clone)]
pub struct ModalStore {
    inner: Arc<RwLock<StoreInner>>,
    changes: Arc<watch::Sender<Location>>,
}

impl ModalStore {
    /// Creates a store positioned at `location` with an empty side channel.
    #[must_use]
    pub fn new(location: Location) -> Self {
        let (changes, _) = watch::channel(location.clone());
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                location,
                side_channel: SideChannel::default(),
            })),
            changes: Arc::new(changes),
        }
    }

    /// Opens `key` with `value`, attaching `payload` in the side channel.
    ///
    /// If `key` was already open with a different value, that value's record
    /// is dropped so it cannot outlive its modal.
    pub fn open(&self, key: &ModalKey, value: impl Into<String>, payload: Payload) {
        let value = value.into();
        let location = {
            let mut inner = self.inner.write();
            if let Some(previous) = inner.location.param(key.as_str()) {
                if previous != value {
                    inner.side_channel.remove(key.as_str(), &previous);
                }
            }
            inner.side_channel.insert(key.as_str(), &value, payload);
            inner.location = inner.location.with_param(key.as_str(), &value);
            inner.location.clone()
        };

        tracing::debug!(modal = %key, value = %value, location = %location, "modal opened");
        self.publish(location);
    }

    /// Closes `key`, deleting its side-channel record first.
    ///
    /// Closing a modal that is not open still rewrites the location without
    /// the key, which is a no-op for the query string.
    pub fn close(&self, key: &ModalKey) {
        let location = {
            let mut inner = self.inner.write();
            if let Some(value) = inner.location.param(key.as_str()) {
                inner.side_channel.remove(key.as_str(), &value);
            }
            inner.location = inner.location.without_param(key.as_str());
            inner.location.clone()
        };

        tracing::debug!(modal = %key, location = %location, "modal closed");
        self.publish(location);
    }

    #[must_use]
    pub fn is_open(&self, key: &ModalKey) -> bool {
        self.inner.read().location.has_param(key.as_str())
    }

    #[must_use]
    pub fn param(&self, key: &ModalKey) -> Option<String> {
        self.inner.read().location.param(key.as_str())
    }

    /// Payload attached to the modal's current value, or the empty payload.
    ///
    /// An empty value is an ordinary value: its record is keyed `key_`.
    #[must_use]
    pub fn additional_props(&self, key: &ModalKey) -> Payload {
        let inner = self.inner.read();
        inner
            .location
            .param(key.as_str())
            .and_then(|value| inner.side_channel.get(key.as_str(), &value).cloned())
            .unwrap_or_default()
    }

    /// Returns `true` if `key` is open and a side-channel record exists for it.
    ///
    /// A modal re-opened by external navigation is open without a record.
    #[must_use]
    pub fn has_record(&self, key: &ModalKey) -> bool {
        let inner = self.inner.read();
        inner
            .location
            .param(key.as_str())
            .is_some_and(|value| inner.side_channel.contains(key.as_str(), &value))
    }

    /// Facade snapshot for `key`.
    #[must_use]
    pub fn query(&self, key: &ModalKey) -> ModalQuery {
        ModalQuery::from_store(self, key.clone())
    }

    /// Applies a location reached by the host (back/forward, typed address).
    ///
    /// Records whose modal disappeared or changed value are pruned. Records are
    /// never created here, so a parameter re-established this way has no
    /// payload until it is opened again through [`ModalStore::open`].
    pub fn sync_location(&self, location: Location) {
        let pruned = {
            let mut inner = self.inner.write();
            inner.location = location.clone();
            let current = inner.location.clone();
            inner.side_channel.retain_open(|key| current.param(key))
        };

        tracing::debug!(location = %location, pruned_records = pruned, "location synced");
        self.publish(location);
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.inner.read().location.clone()
    }

    /// Number of live side-channel records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.inner.read().side_channel.len()
    }

    /// Receiver notified on every location change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.changes.subscribe()
    }

    fn publish(&self, location: Location) {
        self.changes.send_replace(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopening_with_new_value_drops_old_record() {
        let store = ModalStore::new(Location::parse("http://localhost/clientes").unwrap());
        let key = ModalKey::from_static("editCliente");
        store.open(&key, "1", Payload::new(1_u8));
        store.open(&key, "2", Payload::new(2_u8));
        assert_eq!(store.record_count(), 1);
        assert_eq!(store.additional_props(&key).get::<u8>(), Some(&2));
    }

    #[test]
    fn close_on_empty_value_keeps_other_records() {
        let store = ModalStore::new(
            Location::parse("http://localhost/clientes?createCliente=").unwrap(),
        );
        let edit = ModalKey::from_static("editCliente");
        store.open(&edit, "3", Payload::new(String::from("x")));
        store.close(&ModalKey::from_static("createCliente"));
        assert_eq!(store.record_count(), 1);
        assert!(store.is_open(&edit));
    }

    #[test]
    fn empty_value_round_trips_and_close_leaves_no_record() {
        let store = ModalStore::new(Location::parse("http://localhost/clientes").unwrap());
        let key = ModalKey::from_static("editCliente");

        store.open(&key, "", Payload::new(String::from("Ana")));
        assert!(store.is_open(&key));
        assert_eq!(store.param(&key).as_deref(), Some(""));
        assert_eq!(
            store.additional_props(&key).get::<String>().map(String::as_str),
            Some("Ana")
        );
        assert_eq!(store.record_count(), 1);

        store.close(&key);
        assert!(!store.is_open(&key));
        assert_eq!(store.record_count(), 0);
    }
}
