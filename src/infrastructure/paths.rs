//! Filesystem locations used by the console.
//!
//! The data directory holds the trace export and is the default target of
//! report downloads. It resolves, in order, to:
//!
//! 1. `Config::data_dir` (tilde-expanded)
//! 2. `$XDG_DATA_HOME/backoffice`
//! 3. `$HOME/.local/share/backoffice`
//! 4. `./.backoffice`

use crate::Config;
use std::path::PathBuf;

const APP_DIR: &str = "backoffice";

/// Returns the data directory for `config`.
#[must_use]
pub fn data_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.data_dir {
        return PathBuf::from(expand_tilde(dir));
    }

    if let Some(xdg) = non_empty_var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join(APP_DIR);
    }

    non_empty_var("HOME").map_or_else(
        || PathBuf::from(".").join(format!(".{APP_DIR}")),
        |home| PathBuf::from(home).join(".local").join("share").join(APP_DIR),
    )
}

/// Replaces a leading `~` with `$HOME`.
///
/// Paths without a leading tilde, and all paths when `HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use backoffice::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/var/tmp/reportes"), "/var/tmp/reportes");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = non_empty_var("HOME") else {
        return path.to_string();
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
