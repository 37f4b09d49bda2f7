//! Error types for the back-office console.
//!
//! This module defines the centralized error type [`BackofficeError`] and a type
//! alias [`Result`] used throughout the crate. Data-access failures are split by
//! kind so that pages can word their notifications, while configuration and I/O
//! failures cover the ambient plumbing. All variants derive their `Error`
//! implementation through `thiserror`.

use thiserror::Error;

/// The main error type for back-office operations.
///
/// # Examples
///
/// ```
/// use backoffice::BackofficeError;
///
/// let err = BackofficeError::Rejected {
///     status: 400,
///     message: Some("La identificación ya existe".to_string()),
/// };
/// assert_eq!(err.user_message(), "La identificación ya existe");
/// ```
#[derive(Debug, Error)]
pub enum BackofficeError {
    /// The request could not complete (connection refused, timeout, DNS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    ///
    /// `message` carries the `message` field of the upstream error body when
    /// the server provided one.
    #[error("Upstream rejected request ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Rejected {
        /// HTTP status code returned by the server.
        status: u16,
        /// Structured message extracted from the response body.
        message: Option<String>,
    },

    /// The target of an update, delete or lookup does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A response body could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Report criteria or other user input failed a precondition.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BackofficeError {
    /// Returns the text shown to the operator in an error notification.
    ///
    /// Upstream messages are passed through untouched; every other kind falls
    /// back to a generic Spanish description.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message: Some(message), .. } => message.clone(),
            Self::Rejected { status, message: None } => {
                format!("El servidor respondió con estado {status}")
            }
            Self::Transport(_) => "No se pudo conectar con el servidor".to_string(),
            Self::NotFound(what) => format!("No se encontró {what}"),
            Self::Decode(_) => "Respuesta inválida del servidor".to_string(),
            Self::Validation(message) | Self::Config(message) => message.clone(),
            Self::Io(e) => e.to_string(),
        }
    }
}

impl From<serde_json::Error> for BackofficeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for BackofficeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<reqwest::Error> for BackofficeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Rejected {
                status: status.as_u16(),
                message: None,
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A specialized `Result` type for back-office operations.
pub type Result<T> = std::result::Result<T, BackofficeError>;
