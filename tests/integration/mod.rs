//! Integration tests for the back-office coordination layer

mod debounce;
mod list_page;
mod modal_store;
mod notifications;
mod report;
mod test_utils;
