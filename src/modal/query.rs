//! Per-key projection of the modal store.

use super::side_channel::Payload;
use super::store::{ModalKey, ModalStore};

/// View of one modal's state plus a handle to close it.
///
/// Pages build one facade per modal purpose and branch on [`ModalQuery::is_open`].
/// Every accessor reads the store, so a facade held across location changes
/// reports the current query string.
#[derive(Debug, Clone)]
pub struct ModalQuery {
    key: ModalKey,
    store: ModalStore,
}

impl ModalQuery {
    pub(super) fn from_store(store: &ModalStore, key: ModalKey) -> Self {
        Self {
            key,
            store: store.clone(),
        }
    }

    #[must_use]
    pub const fn key(&self) -> &ModalKey {
        &self.key
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.store.is_open(&self.key)
    }

    #[must_use]
    pub fn param(&self) -> Option<String> {
        self.store.param(&self.key)
    }

    #[must_use]
    pub fn additional_props(&self) -> Payload {
        let payload = self.store.additional_props(&self.key);
        tracing::trace!(modal = %self.key, has_payload = !payload.is_empty(), "modal query");
        payload
    }

    /// Open, but with no side-channel record behind it.
    ///
    /// This is the state left by back/forward navigation re-adding the
    /// parameter without going through `open`.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.is_open() && !self.store.has_record(&self.key)
    }

    /// Closes this modal in the underlying store.
    pub fn close(&self) {
        self.store.close(&self.key);
    }
}
