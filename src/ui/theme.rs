//! Color palette and ANSI escape sequence generation.
//!
//! The console ships with one built-in palette. A custom palette can be loaded
//! from a TOML file whose keys mirror [`ThemeColors`]:
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! info_fg = "#89b4fa"
//! success_fg = "#a6e3a1"
//! warning_fg = "#f9e2af"
//! error_fg = "#f38ba8"
//! ```

use crate::domain::Result;
use crate::notify::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named color palette used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`#rrggbb`) for every styled element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    pub text_dim: String,
    pub border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,
    pub info_fg: String,
    pub success_fg: String,
    pub warning_fg: String,
    pub error_fg: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "mocha".to_string(),
            colors: ThemeColors {
                header_fg: "#cdd6f4".to_string(),
                text_dim: "#6c7086".to_string(),
                border: "#45475a".to_string(),
                match_highlight_fg: "#1e1e2e".to_string(),
                match_highlight_bg: "#f9e2af".to_string(),
                info_fg: "#89b4fa".to_string(),
                success_fg: "#a6e3a1".to_string(),
                warning_fg: "#f9e2af".to_string(),
                error_fg: "#f38ba8".to_string(),
            },
        }
    }
}

impl Theme {
    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Foreground color for a notification severity.
    #[must_use]
    pub fn severity_fg(&self, severity: Severity) -> &str {
        match severity {
            Severity::Info => &self.colors.info_fg,
            Severity::Success => &self.colors.success_fg,
            Severity::Warning => &self.colors.warning_fg,
            Severity::Error => &self.colors.error_fg,
        }
    }

    /// Converts `#rrggbb` to RGB, falling back to white on malformed input.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground sequence for `hex`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background sequence for `hex`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}
