//! State machine types for a list page.
//!
//! A page runs two independent machines: the load phase of its list, and the
//! set of modals open in the address. [`LoadPhase`] covers the first, while
//! [`ModalKind`] and [`ModalKeys`] name the three modals every list page owns.
//!
//! # Example
//!
//! ```rust
//! use backoffice::app::modes::{ModalKeys, ModalKind};
//! use backoffice::domain::Customer;
//!
//! let keys = ModalKeys::for_resource::<Customer>();
//! assert_eq!(keys.key(ModalKind::Edit).as_str(), "editCliente");
//! ```

use crate::domain::Resource;
use crate::modal::ModalKey;

/// Load state of the page's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A list or search request is in flight.
    Loading,
    /// The last current request succeeded.
    Loaded,
    /// The last current request failed; the list is cleared and a retry is offered.
    Error,
}

/// The three modal purposes of a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Create,
    Edit,
    Delete,
}

impl ModalKind {
    /// All kinds, in display priority order.
    pub const ALL: [Self; 3] = [Self::Create, Self::Edit, Self::Delete];

    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ModalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Query-parameter names of one resource's modals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalKeys {
    pub create: ModalKey,
    pub edit: ModalKey,
    pub delete: ModalKey,
}

impl ModalKeys {
    /// Builds `create{S}`, `edit{S}` and `delete{S}` from the resource's suffix.
    #[must_use]
    pub fn for_resource<R: Resource>() -> Self {
        let key = |kind: ModalKind| ModalKey::new(format!("{}{}", kind.prefix(), R::MODAL_SUFFIX));
        Self {
            create: key(ModalKind::Create),
            edit: key(ModalKind::Edit),
            delete: key(ModalKind::Delete),
        }
    }

    #[must_use]
    pub const fn key(&self, kind: ModalKind) -> &ModalKey {
        match kind {
            ModalKind::Create => &self.create,
            ModalKind::Edit => &self.edit,
            ModalKind::Delete => &self.delete,
        }
    }
}
