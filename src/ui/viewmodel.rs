//! View model types representing renderable page state.
//!
//! View models are immutable snapshots computed from a page and consumed by
//! the renderer. They hold display-ready data only: formatted cells, fuzzy
//! match highlight ranges, the open modal's title and the live notifications.
//!
//! # Example
//!
//! ```rust
//! use backoffice::ui::viewmodel::compute_highlight_ranges;
//! use fuzzy_matcher::skim::SkimMatcherV2;
//!
//! let ranges = compute_highlight_ranges("Jose Lema", "jle", &SkimMatcherV2::default());
//! assert!(!ranges.is_empty());
//! ```

use crate::app::{ListPage, LoadPhase, ModalKind};
use crate::domain::{Resource, ResourceId};
use crate::notify::{Notification, NotificationId, Severity};
use fuzzy_matcher::skim::SkimMatcherV2;

/// Complete view model of a list page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageViewModel {
    pub header: HeaderInfo,
    pub search_bar: SearchBarInfo,

    /// Column headers of the table.
    pub columns: Vec<String>,

    pub rows: Vec<DisplayRow>,

    /// A list request is in flight.
    pub loading: bool,

    /// Inline banner shown after a failed list request.
    pub error_banner: Option<ErrorBanner>,

    /// Shown when the list loaded and is empty.
    pub empty_state: Option<EmptyState>,

    /// First open modal, if any.
    pub modal: Option<ModalInfo>,

    /// Live notifications in insertion order.
    pub notifications: Vec<NotificationItem>,

    pub footer: FooterInfo,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: Option<ResourceId>,
    pub cells: Vec<String>,

    /// Per-cell character ranges matching the settled search.
    ///
    /// Each tuple is `(start, end)` in character indices, end exclusive.
    pub highlight_ranges: Vec<Vec<(usize, usize)>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub placeholder: String,

    /// Typed text has not settled into a query yet.
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub retry_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
}

/// Open modal display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalInfo {
    pub kind: ModalKind,
    pub title: String,

    /// Raw parameter value from the address.
    pub param: String,

    /// Confirmation prompt for the delete modal.
    pub prompt: Option<String>,

    /// Pretty JSON of the record the modal was opened with.
    pub record: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: NotificationId,
    pub icon: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl From<Notification> for NotificationItem {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            icon: notification.severity.icon(),
            severity: notification.severity,
            message: notification.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

impl PageViewModel {
    /// Computes the view model of `page`.
    ///
    /// Highlighting follows the settled search text, so the ranges always
    /// describe the query that produced the rows.
    #[must_use]
    pub fn from_page<R: Resource>(page: &ListPage<R>) -> Self {
        let state = page.state();
        let messages = R::MESSAGES;

        let matcher = if state.settled_search.is_empty() {
            None
        } else {
            Some(SkimMatcherV2::default())
        };

        let rows = state
            .items
            .iter()
            .map(|item| {
                let cells = item.cells();
                let highlight_ranges = cells
                    .iter()
                    .map(|cell| {
                        matcher.as_ref().map_or_else(Vec::new, |matcher| {
                            compute_highlight_ranges(cell, &state.settled_search, matcher)
                        })
                    })
                    .collect();
                DisplayRow {
                    id: item.id(),
                    cells,
                    highlight_ranges,
                }
            })
            .collect();

        let error_banner = state.error.as_ref().map(|message| ErrorBanner {
            message: format!("Error: {message}"),
            retry_hint: "Reintentar: retry".to_string(),
        });

        let empty_state = (state.phase == LoadPhase::Loaded && state.items.is_empty()).then(|| {
            EmptyState {
                message: messages.empty.to_string(),
            }
        });

        Self {
            header: HeaderInfo {
                title: messages.title.to_string(),
                count: state.items.len(),
            },
            search_bar: SearchBarInfo {
                query: state.search_text.clone(),
                placeholder: messages.search_placeholder.to_string(),
                pending: state.search_text != state.settled_search,
            },
            columns: R::COLUMNS.iter().map(ToString::to_string).collect(),
            rows,
            loading: state.loading,
            error_banner,
            empty_state,
            modal: compute_modal(page),
            notifications: page
                .notifications()
                .notifications()
                .into_iter()
                .map(NotificationItem::from)
                .collect(),
            footer: FooterInfo {
                keybindings: "new | edit <id> | delete <id> | search <texto> | close | quit"
                    .to_string(),
            },
        }
    }
}

fn compute_modal<R: Resource>(page: &ListPage<R>) -> Option<ModalInfo> {
    let modals = page.modals();
    let kind = modals.open_kind()?;
    let query = modals.get(kind);
    let messages = R::MESSAGES;
    let item = page.modal_item(kind);

    let title = match kind {
        ModalKind::Create => messages.create_title.to_string(),
        ModalKind::Edit => format!("Editar {}", messages.noun),
        ModalKind::Delete => format!("Eliminar {}", messages.noun),
    };

    let prompt = (kind == ModalKind::Delete).then(|| {
        let label = item.as_ref().map(Resource::label).unwrap_or_default();
        format!(
            "¿Estás seguro que deseas eliminar {} \"{label}\"?",
            messages.delete_subject
        )
    });

    Some(ModalInfo {
        kind,
        title,
        param: query.param().unwrap_or_default(),
        prompt,
        record: item.and_then(|item| serde_json::to_string_pretty(&item).ok()),
    })
}

/// Coalesces fuzzy match indices of `query` in `text` into contiguous ranges.
///
/// Returns an empty vector when `query` does not match.
#[must_use]
pub fn compute_highlight_ranges(
    text: &str,
    query: &str,
    matcher: &SkimMatcherV2,
) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}
