//! List-page driver.
//!
//! [`ListPage`] owns one page's state and wires the pure handler to its
//! effects: the modal store, the notification queue, the debounced search and
//! the data-access worker. User intents are plain methods; asynchronous inputs
//! (settled search text, service responses) are pulled with
//! [`ListPage::next`], which the host awaits in its event loop.
//!
//! # Example
//!
//! ```rust,no_run
//! use backoffice::app::ListPage;
//! use backoffice::domain::Customer;
//! use backoffice::modal::{Location, ModalStore};
//! use backoffice::notify::NotificationQueue;
//! use backoffice::services::{Endpoints, RestService};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> backoffice::Result<()> {
//! let service = RestService::<Customer>::new(Endpoints::new("http://localhost:8080/api/v1")?)?;
//! let store = ModalStore::new(Location::parse("http://localhost:3000/clientes")?);
//! let mut page = ListPage::new(
//!     Arc::new(service),
//!     store,
//!     NotificationQueue::default(),
//!     Duration::from_millis(500),
//! );
//!
//! page.activate();
//! loop {
//!     if page.next().await {
//!         println!("{} items", page.state().items.len());
//!     }
//! }
//! # }
//! ```

use super::actions::Action;
use super::handler::{handle_event, Event, PageModals};
use super::modes::{ModalKeys, ModalKind};
use super::state::ListState;
use crate::debounce::Debounced;
use crate::domain::Resource;
use crate::modal::{Location, ModalStore};
use crate::notify::NotificationQueue;
use crate::services::ResourceService;
use crate::worker::{spawn_request, ServiceResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;

/// Driver of one resource's list page.
pub struct ListPage<R: Resource> {
    state: ListState<R>,
    keys: ModalKeys,
    store: ModalStore,
    notifications: NotificationQueue,
    search: Debounced<String>,
    search_rx: watch::Receiver<String>,
    service: Arc<dyn ResourceService<R>>,
    responses_tx: mpsc::UnboundedSender<ServiceResponse<R>>,
    responses_rx: mpsc::UnboundedReceiver<ServiceResponse<R>>,
    inflight_list: Option<AbortHandle>,
}

impl<R: Resource> std::fmt::Debug for ListPage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPage")
            .field("collection", &R::COLLECTION)
            .field("state", &self.state)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ListPage<R> {
    /// Creates a page over `service`, sharing `store` and `notifications`
    /// with the rest of the application.
    pub fn new(
        service: Arc<dyn ResourceService<R>>,
        store: ModalStore,
        notifications: NotificationQueue,
        search_delay: Duration,
    ) -> Self {
        let search = Debounced::new(String::new(), search_delay);
        let search_rx = search.subscribe();
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();

        Self {
            state: ListState::new(),
            keys: ModalKeys::for_resource::<R>(),
            store,
            notifications,
            search,
            search_rx,
            service,
            responses_tx,
            responses_rx,
            inflight_list: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ListState<R> {
        &self.state
    }

    #[must_use]
    pub const fn keys(&self) -> &ModalKeys {
        &self.keys
    }

    #[must_use]
    pub const fn store(&self) -> &ModalStore {
        &self.store
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Modal facades for the current address.
    #[must_use]
    pub fn modals(&self) -> PageModals {
        PageModals::from_store(&self.store, &self.keys)
    }

    /// Record attached to the open edit or delete modal, if any.
    #[must_use]
    pub fn modal_item(&self, kind: ModalKind) -> Option<R> {
        self.store
            .additional_props(self.keys.key(kind))
            .get::<R>()
            .cloned()
    }

    /// Issues the initial load. Later calls do nothing.
    pub fn activate(&mut self) -> bool {
        self.dispatch(Event::Activate)
    }

    /// Records raw search input; the query follows once typing pauses.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        let render = self.dispatch(Event::SearchInput(text.clone()));
        self.search.set(text);
        render
    }

    pub fn open_create(&mut self) -> bool {
        self.dispatch(Event::OpenCreate)
    }

    pub fn open_edit(&mut self, item: R) -> bool {
        self.dispatch(Event::OpenEdit(item))
    }

    pub fn open_delete(&mut self, item: R) -> bool {
        self.dispatch(Event::OpenDelete(item))
    }

    pub fn close_modal(&mut self, kind: ModalKind) -> bool {
        self.dispatch(Event::CloseModal(kind))
    }

    /// Submits form data to whichever form modal is open.
    pub fn submit(&mut self, data: R) -> bool {
        self.dispatch(Event::Submit(data))
    }

    pub fn confirm_delete(&mut self) -> bool {
        self.dispatch(Event::ConfirmDelete)
    }

    pub fn retry(&mut self) -> bool {
        self.dispatch(Event::Retry)
    }

    /// Applies an address reached by host navigation (back/forward).
    pub fn navigate(&mut self, location: Location) -> bool {
        self.store.sync_location(location);
        self.dispatch(Event::LocationChanged)
    }

    /// Waits for the next asynchronous input and handles it.
    ///
    /// Service responses take priority over settled search text.
    ///
    /// # Returns
    ///
    /// Whether the page should re-render.
    pub async fn next(&mut self) -> bool {
        tokio::select! {
            biased;
            Some(response) = self.responses_rx.recv() => {
                self.dispatch(Event::Response(response))
            }
            Ok(()) = self.search_rx.changed() => {
                let text = self.search_rx.borrow_and_update().clone();
                self.dispatch(Event::SearchSettled(text))
            }
            else => false,
        }
    }

    /// Runs the handler for `event` and executes the resulting actions.
    pub fn dispatch(&mut self, event: Event<R>) -> bool {
        let modals = self.modals();
        let (render, actions) = handle_event(&mut self.state, &modals, event);
        for action in actions {
            self.execute(action);
        }
        render
    }

    fn execute(&mut self, action: Action<R>) {
        match action {
            Action::OpenModal {
                kind,
                value,
                payload,
            } => self.store.open(self.keys.key(kind), value, payload),

            Action::CloseModal(kind) => self.store.close(self.keys.key(kind)),

            Action::Notify { severity, message } => {
                self.notifications.push(message, severity);
            }

            Action::Request(request) => {
                let is_list = request.is_list();
                if is_list {
                    if let Some(previous) = self.inflight_list.take() {
                        previous.abort();
                    }
                }

                let handle = spawn_request(
                    Arc::clone(&self.service),
                    request,
                    self.responses_tx.clone(),
                );

                if is_list {
                    self.inflight_list = handle;
                }
            }
        }
    }
}

impl<R: Resource> Drop for ListPage<R> {
    fn drop(&mut self) {
        if let Some(inflight) = self.inflight_list.take() {
            inflight.abort();
        }
    }
}
