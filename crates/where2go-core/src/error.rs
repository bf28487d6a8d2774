// ── Core error types ──
//
// User-facing errors from where2go-core. Front ends never see raw reqwest
// or serde failures; the `From<where2go_api::Error>` impl translates the
// transport tier, and backend `success: false` envelopes land in `Rejected`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Session errors ───────────────────────────────────────────────
    #[error("Not signed in")]
    NotAuthenticated,

    // ── Business errors ──────────────────────────────────────────────
    /// The backend answered `success: false`.
    #[error("Operation rejected by backend: {}", message.as_deref().unwrap_or("no reason given"))]
    Rejected { message: Option<String> },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Unexpected backend response: {message}")]
    Api { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The message worth showing to a person, if there is a specific one.
    ///
    /// `None` means "nothing better than a generic apology": a rejection
    /// without a backend message.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Rejected { message } => message.clone().filter(|m| !m.trim().is_empty()),
            Self::Validation { reason, .. } => Some(reason.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Returns `true` if the failure happened before the backend answered.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::Api { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<where2go_api::Error> for CoreError {
    fn from(err: where2go_api::Error) -> Self {
        match err {
            where2go_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                    }
                }
            }
            where2go_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid backend URL: {e}"),
            },
            where2go_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            where2go_api::Error::Deserialization { message, body: _ } => {
                CoreError::Api { message }
            }
            where2go_api::Error::Serialization(e) => {
                CoreError::Internal(format!("could not encode request body: {e}"))
            }
            where2go_api::Error::Rejected { message } => CoreError::Rejected { message },
            where2go_api::Error::MissingData { path } => CoreError::Api {
                message: format!("{path} answered success without data"),
            },
        }
    }
}
