//! Event handling and state transition logic for list pages.
//!
//! [`handle_event`] is the one place where a list page's state changes. It
//! receives the current modal facades alongside the event, mutates
//! [`ListState`] and returns the side effects to run. It never performs I/O,
//! so every transition can be exercised with plain values.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Activate`, `LocationChanged`
//! - **Search**: `SearchInput`, `SearchSettled`, `Retry`
//! - **Modals**: `OpenCreate`, `OpenEdit`, `OpenDelete`, `CloseModal`
//! - **Mutations**: `Submit`, `ConfirmDelete`
//! - **Worker**: `Response` with typed service results
//!
//! # Example
//!
//! ```rust
//! use backoffice::app::{handle_event, Action, Event, ListState, ModalKeys, PageModals};
//! use backoffice::domain::Customer;
//! use backoffice::modal::{Location, ModalStore};
//!
//! let store = ModalStore::new(Location::parse("http://localhost/clientes").unwrap());
//! let modals = PageModals::from_store(&store, &ModalKeys::for_resource::<Customer>());
//! let mut state = ListState::<Customer>::new();
//!
//! let (_, actions) = handle_event(&mut state, &modals, Event::Activate);
//! assert!(matches!(actions.as_slice(), [Action::Request(_)]));
//! ```

use super::actions::Action;
use super::modes::{ModalKeys, ModalKind};
use super::state::ListState;
use crate::domain::{Resource, ResourceId};
use crate::modal::{ModalQuery, ModalStore, Payload, NEW_TOKEN};
use crate::notify::Severity;
use crate::worker::{ServiceRequest, ServiceResponse};

/// Shown when a modal re-established by navigation cannot find its record.
pub const DETACHED_MODAL_MESSAGE: &str = "No se pudo recuperar el registro seleccionado";

/// Events driving a list page.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<R> {
    /// The page became visible. Issues the initial load once.
    Activate,

    /// The address changed outside the page (back/forward, typed address).
    LocationChanged,

    /// Raw search input changed.
    SearchInput(String),

    /// The debounced search text settled on a new value.
    SearchSettled(String),

    /// Re-issues the active query after a list failure.
    Retry,

    OpenCreate,
    OpenEdit(R),
    OpenDelete(R),
    CloseModal(ModalKind),

    /// Form submitted from the create or edit modal.
    Submit(R),

    /// Deletion confirmed from the delete modal.
    ConfirmDelete,

    /// A data-access request finished.
    Response(ServiceResponse<R>),
}

/// Facades of the three modals of a page. They read the store live.
#[derive(Debug, Clone)]
pub struct PageModals {
    pub create: ModalQuery,
    pub edit: ModalQuery,
    pub delete: ModalQuery,
}

impl PageModals {
    #[must_use]
    pub fn from_store(store: &ModalStore, keys: &ModalKeys) -> Self {
        Self {
            create: store.query(&keys.create),
            edit: store.query(&keys.edit),
            delete: store.query(&keys.delete),
        }
    }

    #[must_use]
    pub const fn get(&self, kind: ModalKind) -> &ModalQuery {
        match kind {
            ModalKind::Create => &self.create,
            ModalKind::Edit => &self.edit,
            ModalKind::Delete => &self.delete,
        }
    }

    /// First open modal in display priority order.
    #[must_use]
    pub fn open_kind(&self) -> Option<ModalKind> {
        ModalKind::ALL.into_iter().find(|kind| self.get(*kind).is_open())
    }
}

/// Processes an event, mutates page state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable page state
/// * `modals` - Modal facades reflecting the address at event time
/// * `event` - Event to process
///
/// # Returns
///
/// Whether the page should re-render, and the actions to execute in order.
/// Guarded no-ops (submitting with no modal open, a missing or non-numeric
/// identifier, an operation already pending) return no actions.
pub fn handle_event<R: Resource>(
    state: &mut ListState<R>,
    modals: &PageModals,
    event: Event<R>,
) -> (bool, Vec<Action<R>>) {
    let _span = tracing::debug_span!(
        "handle_event",
        resource = R::COLLECTION,
        event_type = event_name(&event)
    )
    .entered();

    match event {
        Event::Activate => {
            if state.activated {
                tracing::debug!("already activated");
                return (false, vec![]);
            }
            state.activated = true;
            (true, vec![active_query(state)])
        }

        Event::LocationChanged => {
            let actions = reconcile_detached(state, modals);
            (true, actions)
        }

        Event::SearchInput(text) => {
            if state.search_text == text {
                return (false, vec![]);
            }
            state.search_text = text;
            (true, vec![])
        }

        Event::SearchSettled(text) => {
            tracing::debug!(search = %text, "search settled");
            state.settled_search = text;
            state.activated = true;
            (true, vec![active_query(state)])
        }

        Event::Retry => (true, vec![active_query(state)]),

        Event::OpenCreate => (
            true,
            vec![Action::OpenModal {
                kind: ModalKind::Create,
                value: NEW_TOKEN.to_string(),
                payload: Payload::empty(),
            }],
        ),

        Event::OpenEdit(item) => open_with_item(ModalKind::Edit, item),

        Event::OpenDelete(item) => open_with_item(ModalKind::Delete, item),

        Event::CloseModal(kind) => (true, vec![Action::CloseModal(kind)]),

        Event::Submit(data) => handle_submit(state, modals, data),

        Event::ConfirmDelete => handle_confirm_delete(state, modals),

        Event::Response(response) => handle_response(state, modals, response),
    }
}

fn event_name<R>(event: &Event<R>) -> &'static str {
    match event {
        Event::Activate => "activate",
        Event::LocationChanged => "location_changed",
        Event::SearchInput(_) => "search_input",
        Event::SearchSettled(_) => "search_settled",
        Event::Retry => "retry",
        Event::OpenCreate => "open_create",
        Event::OpenEdit(_) => "open_edit",
        Event::OpenDelete(_) => "open_delete",
        Event::CloseModal(_) => "close_modal",
        Event::Submit(_) => "submit",
        Event::ConfirmDelete => "confirm_delete",
        Event::Response(_) => "response",
    }
}

/// Issues the filtered query for a non-empty settled search, else the full list.
fn active_query<R: Resource>(state: &mut ListState<R>) -> Action<R> {
    let generation = state.begin_load();
    let request = if state.settled_search.is_empty() {
        ServiceRequest::list(generation)
    } else {
        ServiceRequest::search(generation, state.settled_search.clone())
    };
    tracing::debug!(generation = %generation, operation = request.operation(), "list request issued");
    Action::Request(request)
}

fn open_with_item<R: Resource>(kind: ModalKind, item: R) -> (bool, Vec<Action<R>>) {
    let Some(id) = item.id() else {
        tracing::debug!(modal = %kind, "item has no id");
        return (false, vec![]);
    };
    (
        true,
        vec![Action::OpenModal {
            kind,
            value: id.to_string(),
            payload: Payload::new(item),
        }],
    )
}

fn parse_id(query: &ModalQuery) -> Option<ResourceId> {
    query.param().and_then(|value| value.parse().ok())
}

fn handle_submit<R: Resource>(
    state: &mut ListState<R>,
    modals: &PageModals,
    data: R,
) -> (bool, Vec<Action<R>>) {
    if state.form_pending {
        tracing::debug!("submission already pending");
        return (false, vec![]);
    }

    let request = if modals.edit.is_open() {
        let Some(id) = parse_id(&modals.edit) else {
            tracing::debug!(param = ?modals.edit.param(), "edit modal has no numeric id");
            return (false, vec![]);
        };
        ServiceRequest::update(id, data)
    } else if modals.create.is_open() {
        ServiceRequest::create(data)
    } else {
        tracing::debug!("submit with no form modal open");
        return (false, vec![]);
    };

    state.form_pending = true;
    (true, vec![Action::Request(request)])
}

fn handle_confirm_delete<R: Resource>(
    state: &mut ListState<R>,
    modals: &PageModals,
) -> (bool, Vec<Action<R>>) {
    if state.delete_pending {
        tracing::debug!("delete already pending");
        return (false, vec![]);
    }
    if !modals.delete.is_open() {
        tracing::debug!("confirm with no delete modal open");
        return (false, vec![]);
    }
    let Some(id) = parse_id(&modals.delete) else {
        tracing::debug!(param = ?modals.delete.param(), "delete modal has no numeric id");
        return (false, vec![]);
    };

    let label = modals
        .delete
        .additional_props()
        .get::<R>()
        .map(Resource::label)
        .or_else(|| state.find(id).map(Resource::label))
        .unwrap_or_else(|| id.to_string());

    state.delete_pending = true;
    (true, vec![Action::Request(ServiceRequest::delete(id, label))])
}

fn handle_response<R: Resource>(
    state: &mut ListState<R>,
    modals: &PageModals,
    response: ServiceResponse<R>,
) -> (bool, Vec<Action<R>>) {
    let messages = R::MESSAGES;

    match response {
        ServiceResponse::Loaded { generation, items } => {
            if !state.is_current(generation) {
                tracing::debug!(generation = %generation, current = %state.generation, "stale list result discarded");
                return (false, vec![]);
            }
            tracing::debug!(item_count = items.len(), "list loaded");
            state.finish_load(items);
            let actions = reconcile_detached(state, modals);
            (true, actions)
        }

        ServiceResponse::LoadFailed { generation, message } => {
            if !state.is_current(generation) {
                tracing::debug!(generation = %generation, "stale list failure discarded");
                return (false, vec![]);
            }
            tracing::debug!(error = %message, "list load failed");
            state.fail_load(message.clone());
            (true, vec![Action::notify(Severity::Error, message)])
        }

        ServiceResponse::Created { item } => {
            state.form_pending = false;
            tracing::debug!(id = ?item.id(), "created");
            (
                true,
                vec![
                    Action::notify(Severity::Success, messages.created),
                    Action::CloseModal(ModalKind::Create),
                    active_query(state),
                ],
            )
        }

        ServiceResponse::Updated { item } => {
            state.form_pending = false;
            tracing::debug!(id = ?item.id(), "updated");
            (
                true,
                vec![
                    Action::notify(Severity::Success, messages.updated),
                    Action::CloseModal(ModalKind::Edit),
                    active_query(state),
                ],
            )
        }

        ServiceResponse::MutationFailed { kind, message } => {
            state.form_pending = false;
            tracing::debug!(modal = %kind, error = %message, "mutation failed");
            (true, vec![Action::notify(Severity::Error, format!("Error: {message}"))])
        }

        ServiceResponse::Deleted { id, label } => {
            state.delete_pending = false;
            state.remove_item(id);
            (
                true,
                vec![
                    Action::notify(
                        Severity::Success,
                        format!("{} \"{label}\" {}", messages.noun, messages.deleted),
                    ),
                    Action::CloseModal(ModalKind::Delete),
                ],
            )
        }

        ServiceResponse::DeleteFailed { message } => {
            state.delete_pending = false;
            (
                true,
                vec![Action::notify(
                    Severity::Error,
                    format!("{}: {message}", messages.delete_failed),
                )],
            )
        }
    }
}

/// Resolves edit and delete modals that are open without a side-channel record.
///
/// The record is recovered from the loaded list by id. While a list request is
/// in flight the decision waits for its result. When no item matches, the
/// modal is closed and a warning is queued. A detached create modal needs no
/// payload and is left alone.
fn reconcile_detached<R: Resource>(state: &ListState<R>, modals: &PageModals) -> Vec<Action<R>> {
    let mut actions = Vec::new();

    for kind in [ModalKind::Edit, ModalKind::Delete] {
        let query = modals.get(kind);
        if !query.is_detached() {
            continue;
        }

        let id = parse_id(query);
        if id.is_some() && state.loading {
            tracing::debug!(modal = %kind, "detached modal waits for list");
            continue;
        }

        match id.and_then(|id| state.find(id)) {
            Some(item) => {
                tracing::debug!(modal = %kind, id = ?item.id(), "detached modal recovered from list");
                actions.push(Action::OpenModal {
                    kind,
                    value: query.param().unwrap_or_default(),
                    payload: Payload::new(item.clone()),
                });
            }
            None => {
                tracing::debug!(modal = %kind, param = ?query.param(), "detached modal closed");
                actions.push(Action::CloseModal(kind));
                actions.push(Action::notify(Severity::Warning, DETACHED_MODAL_MESSAGE));
            }
        }
    }

    actions
}
