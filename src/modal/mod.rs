//! Modal state kept in the navigable address.
//!
//! # Modules
//!
//! - [`location`]: Address value with parameter-preserving query edits
//! - [`side_channel`]: In-memory payloads keyed by `key_value`
//! - [`store`]: The URL modal store (`open`, `close`, `is_open`, `param`,
//!   `additional_props`, host navigation sync)
//! - [`query`]: Per-key facade used by pages
//!
//! # Example
//!
//! ```rust
//! use backoffice::modal::{Location, ModalKey, ModalStore, Payload};
//!
//! let store = ModalStore::new(Location::parse("http://localhost/clientes?tab=1").unwrap());
//! let edit = ModalKey::from_static("editCliente");
//!
//! store.open(&edit, "7", Payload::new(String::from("Juan")));
//! assert_eq!(store.location().query(), Some("tab=1&editCliente=7"));
//!
//! let facade = store.query(&edit);
//! assert!(facade.is_open());
//! assert_eq!(facade.additional_props().get::<String>().map(String::as_str), Some("Juan"));
//!
//! facade.close();
//! assert_eq!(store.location().query(), Some("tab=1"));
//! ```

pub mod location;
pub mod query;
pub mod side_channel;
pub mod store;

pub use location::Location;
pub use query::ModalQuery;
pub use side_channel::{Payload, SideChannel};
pub use store::{ModalKey, ModalStore, NEW_TOKEN};
