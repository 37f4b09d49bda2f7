//! In-memory payloads attached to open modals.
//!
//! The address bar can only carry strings. Anything richer that a modal needs,
//! such as the full record an edit form starts from, travels through the side
//! channel instead: a map keyed by `key + "_" + value` owned by the
//! [`ModalStore`](super::ModalStore). Only the store mutates it.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque, type-erased payload handed to `open` and read back by the modal.
///
/// An empty payload stands in for "no additional props". Equality is identity:
/// two payloads are equal when they share the same allocation or are both
/// empty.
#[derive(Clone, Default)]
pub struct Payload(Option<Arc<dyn Any + Send + Sync>>);

impl Payload {
    /// Wraps `value` as a payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// The empty payload.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Borrows the payload as `T` if it holds one.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|value| value.downcast_ref::<T>())
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("Payload(empty)")
        } else {
            f.write_str("Payload(..)")
        }
    }
}

#[derive(Debug)]
struct Record {
    key: String,
    value: String,
    payload: Payload,
}

/// Side-channel map from `key_value` to payload.
#[derive(Debug, Default)]
pub struct SideChannel {
    records: HashMap<String, Record>,
}

impl SideChannel {
    /// Storage key for a modal key and its parameter value.
    #[must_use]
    pub fn storage_key(key: &str, value: &str) -> String {
        format!("{key}_{value}")
    }

    pub(super) fn insert(&mut self, key: &str, value: &str, payload: Payload) {
        self.records.insert(
            Self::storage_key(key, value),
            Record {
                key: key.to_string(),
                value: value.to_string(),
                payload,
            },
        );
    }

    pub(super) fn remove(&mut self, key: &str, value: &str) -> bool {
        self.records.remove(&Self::storage_key(key, value)).is_some()
    }

    #[must_use]
    pub fn get(&self, key: &str, value: &str) -> Option<&Payload> {
        self.records
            .get(&Self::storage_key(key, value))
            .map(|record| &record.payload)
    }

    #[must_use]
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.records.contains_key(&Self::storage_key(key, value))
    }

    /// Drops every record whose modal is no longer open with the same value.
    ///
    /// `current` returns the live parameter value for a modal key. Returns the
    /// number of records removed.
    pub(super) fn retain_open<F>(&mut self, current: F) -> usize
    where
        F: Fn(&str) -> Option<String>,
    {
        let before = self.records.len();
        self.records
            .retain(|_, record| current(&record.key).as_deref() == Some(record.value.as_str()));
        before - self.records.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
