//! Backoffice: state-coordination layer for a banking back-office console.
//!
//! The console lists, searches, creates, edits and deletes customers,
//! accounts and transactions, and builds movement reports. Every list page
//! shares the same interactive machinery:
//!
//! - modal visibility kept in the navigable address, with a side channel for
//!   payloads that cannot live in a query string
//! - a notification queue whose entries expire on their own
//! - a debounced search box that turns settled input into one query
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Console (main.rs)                                  │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/, report)                   │
//! │  - Pure event handler over page state               │
//! │  - Page drivers executing actions                   │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Coordination  │   │ Worker Layer  │
//! │ (ui/)         │   │ (modal/,      │   │ (worker/,     │
//! │ - View models │   │  notify/,     │   │  services/)   │
//! │ - Rendering   │   │  debounce)    │   │ - REST calls  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, Observability              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Event handler, page state and the list-page driver
//! - [`debounce`]: Debounced value
//! - [`domain`]: Resource types and errors
//! - [`infrastructure`]: Data directory resolution
//! - [`modal`]: URL-backed modal store and its per-key facade
//! - [`notify`]: Timed notification queue
//! - [`report`]: Movements report page
//! - [`services`]: Data-access traits and their REST implementation
//! - [`ui`]: View models and text rendering
//! - [`worker`]: Request messages and their execution
//! - [`observability`]: OpenTelemetry tracing with file export
//!
//! # Configuration
//!
//! Settings come from defaults, an optional TOML file, `BACKOFFICE_*`
//! environment variables and command-line flags, in increasing priority:
//!
//! ```toml
//! api_url = "http://localhost:8080/api/v1"
//! start_url = "http://localhost:3000/clientes"
//! search_debounce_ms = 500
//! notification_timeout_ms = 5000
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use backoffice::{initialize, Config};
//!
//! # fn run() -> backoffice::Result<()> {
//! let context = initialize(&Config::default())?;
//! context.notifications.info("Bienvenido");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod debounce;
pub mod domain;
pub mod infrastructure;
pub mod modal;
pub mod notify;
pub mod report;
pub mod services;
pub mod ui;
pub mod worker;

pub mod observability;

pub use app::{handle_event, Action, Event, ListPage};
pub use domain::{BackofficeError, Result};
pub use ui::Theme;

use modal::{Location, ModalStore};
use notify::NotificationQueue;
use serde::{Deserialize, Serialize};
use services::Endpoints;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_START_URL: &str = "http://localhost:3000/clientes";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 5000;

const ENV_PREFIX: &str = "BACKOFFICE_";

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST API. Default: `http://localhost:8080/api/v1`
    pub api_url: String,

    /// Address the console starts at. Its path selects the first page and
    /// its query string may already open a modal.
    pub start_url: String,

    /// Quiet period before typed search text becomes a query. Default: 500
    pub search_debounce_ms: u64,

    /// Lifetime of a notification. Default: 5000
    pub notification_timeout_ms: u64,

    /// Filter directive for tracing, e.g. `debug` or `backoffice=trace`.
    pub trace_level: Option<String>,

    /// Overrides the data directory (trace file, report downloads).
    pub data_dir: Option<String>,

    /// Path to a TOML palette. See [`ui::theme`].
    pub theme_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            start_url: DEFAULT_START_URL.to_string(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            notification_timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS,
            trace_level: None,
            data_dir: None,
            theme_file: None,
        }
    }
}

impl Config {
    /// Builds a configuration from string settings, falling back to the
    /// default for every missing or unparsable value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use backoffice::Config;
    /// use std::collections::BTreeMap;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("search_debounce_ms".to_string(), "250".to_string());
    /// map.insert("notification_timeout_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.search_debounce_ms, 250);
    /// assert_eq!(config.notification_timeout_ms, 5000);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Applies the settings present in `map` on top of `self`.
    ///
    /// Blank strings and numbers that do not parse leave the current value
    /// untouched. Unknown keys are ignored.
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            map.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };
        let millis = |key: &str| map.get(key).and_then(|value| value.trim().parse::<u64>().ok());

        if let Some(api_url) = text("api_url") {
            self.api_url = api_url;
        }
        if let Some(start_url) = text("start_url") {
            self.start_url = start_url;
        }
        if let Some(ms) = millis("search_debounce_ms") {
            self.search_debounce_ms = ms;
        }
        if let Some(ms) = millis("notification_timeout_ms") {
            self.notification_timeout_ms = ms;
        }
        if let Some(level) = text("trace_level") {
            self.trace_level = Some(level);
        }
        if let Some(dir) = text("data_dir") {
            self.data_dir = Some(dir);
        }
        if let Some(theme) = text("theme_file") {
            self.theme_file = Some(theme);
        }
        self
    }

    /// Defaults overridden by `BACKOFFICE_*` environment variables.
    ///
    /// `BACKOFFICE_API_URL` sets `api_url`, `BACKOFFICE_TRACE_LEVEL` sets
    /// `trace_level`, and so on.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(&env_settings())
    }

    /// Loads a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::Io`] if the file cannot be read and
    /// [`BackofficeError::Config`] if it is not valid TOML for this shape.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub const fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}

/// `BACKOFFICE_*` variables keyed by their lower-cased setting name.
#[must_use]
pub fn env_settings() -> BTreeMap<String, String> {
    std::env::vars()
        .filter_map(|(name, value)| {
            name.strip_prefix(ENV_PREFIX)
                .map(|key| (key.to_ascii_lowercase(), value))
        })
        .collect()
}

/// Handles shared by every page of a running console.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub endpoints: Endpoints,
    pub store: ModalStore,
    pub notifications: NotificationQueue,
    pub theme: Theme,
}

/// Validates `config` and builds the shared application handles.
///
/// The theme falls back to the built-in palette when `theme_file` cannot be
/// loaded.
///
/// # Errors
///
/// Returns [`BackofficeError::Config`] if `api_url` or `start_url` is not an
/// absolute URL.
pub fn initialize(config: &Config) -> Result<AppContext> {
    tracing::debug!(api_url = %config.api_url, start_url = %config.start_url, "initializing backoffice");

    let endpoints = Endpoints::new(&config.api_url)?;
    let location = Location::parse(&config.start_url)?;

    let theme = config.theme_file.as_ref().map_or_else(Theme::default, |theme_file| {
        let path = infrastructure::expand_tilde(theme_file);
        Theme::from_file(&path).unwrap_or_else(|e| {
            tracing::debug!(theme_file = %path, error = %e, "failed to load theme from file, using default");
            Theme::default()
        })
    });

    Ok(AppContext {
        config: config.clone(),
        endpoints,
        store: ModalStore::new(location),
        notifications: NotificationQueue::new(config.notification_timeout()),
        theme,
    })
}
