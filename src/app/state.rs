//! Per-page list state.
//!
//! [`ListState`] is the single source of truth for what a list page shows:
//! the loaded items, the loading flag, the inline error and the search text.
//! It also tracks the request generation so that late results from a
//! superseded request can be recognized and dropped, and the pending flags
//! that turn repeated submissions into no-ops.
//!
//! # Example
//!
//! ```rust
//! use backoffice::app::ListState;
//! use backoffice::domain::Customer;
//!
//! let mut state = ListState::<Customer>::new();
//! assert!(state.loading);
//! let generation = state.begin_load();
//! assert!(state.is_current(generation));
//! ```

use super::modes::LoadPhase;
use crate::domain::{Resource, ResourceId};
use crate::worker::Generation;

/// Transient state of one list page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<R> {
    /// Items of the last current list or search result.
    pub items: Vec<R>,

    /// `true` from construction until the first request settles, then while
    /// any list request is in flight.
    pub loading: bool,

    /// Message of the last failed list request, cleared on the next success.
    pub error: Option<String>,

    /// Raw search input as typed.
    pub search_text: String,

    /// Search text after the debounce settled; drives the active query.
    pub settled_search: String,

    pub phase: LoadPhase,

    /// Generation of the most recently issued list request.
    pub generation: Generation,

    /// Set once the initial load has been issued.
    pub activated: bool,

    /// A create or update is in flight.
    pub form_pending: bool,

    /// A delete is in flight.
    pub delete_pending: bool,
}

impl<R> Default for ListState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            search_text: String::new(),
            settled_search: String::new(),
            phase: LoadPhase::Idle,
            generation: Generation::default(),
            activated: false,
            form_pending: false,
            delete_pending: false,
        }
    }
}

impl<R: Resource> ListState<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new list request and returns its generation.
    pub fn begin_load(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.loading = true;
        self.phase = LoadPhase::Loading;
        self.generation
    }

    /// Returns `true` if `generation` belongs to the latest issued request.
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Applies a successful list result.
    pub fn finish_load(&mut self, items: Vec<R>) {
        self.items = items;
        self.loading = false;
        self.error = None;
        self.phase = LoadPhase::Loaded;
    }

    /// Applies a failed list result: the list is cleared and the error kept
    /// for the inline retry banner.
    pub fn fail_load(&mut self, message: String) {
        self.items.clear();
        self.loading = false;
        self.error = Some(message);
        self.phase = LoadPhase::Error;
    }

    /// Removes the item with `id` from the local list.
    pub fn remove_item(&mut self, id: ResourceId) -> Option<R> {
        let index = self.items.iter().position(|item| item.id() == Some(id))?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn find(&self, id: ResourceId) -> Option<&R> {
        self.items.iter().find(|item| item.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;

    fn customer(id: ResourceId, name: &str) -> Customer {
        Customer {
            id: Some(id),
            name: name.to_string(),
            ..Customer::default()
        }
    }

    #[test]
    fn new_generation_supersedes_previous() {
        let mut state = ListState::<Customer>::new();
        let first = state.begin_load();
        let second = state.begin_load();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }

    #[test]
    fn failure_clears_items() {
        let mut state = ListState::new();
        state.finish_load(vec![customer(1, "Ana")]);
        state.fail_load("caído".to_string());
        assert!(state.items.is_empty());
        assert_eq!(state.phase, LoadPhase::Error);
        assert_eq!(state.error.as_deref(), Some("caído"));
    }

    #[test]
    fn remove_item_by_id() {
        let mut state = ListState::new();
        state.finish_load(vec![customer(1, "Ana"), customer(2, "Luis")]);
        let removed = state.remove_item(1);
        assert_eq!(removed.map(|c| c.name), Some("Ana".to_string()));
        assert_eq!(state.items.len(), 1);
        assert!(state.remove_item(9).is_none());
    }
}
