//! Console rendering layer.
//!
//! The UI layer follows a declarative rendering model:
//!
//! ```text
//! ListPage → PageViewModel::from_page → PageViewModel → render → ANSI text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types and fuzzy highlight computation
//! - [`renderer`]: Frame rendering
//! - [`theme`]: Palette and ANSI escape sequence generation

pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{
    DisplayRow, EmptyState, ErrorBanner, FooterInfo, HeaderInfo, ModalInfo, NotificationItem,
    PageViewModel, SearchBarInfo,
};
