use thiserror::Error;

/// Top-level error type for the `where2go-api` crate.
///
/// These are the *transport* tier of failures: the request never produced a
/// parseable JSON envelope. A backend that answers `{"success": false}` is
/// not an error at this level -- it comes back as an
/// [`ApiResponse`](crate::ApiResponse) and only turns into
/// [`Error::Rejected`] when the caller asks for the payload.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The response body was not JSON (or not the expected shape).
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    // ── Business level ──────────────────────────────────────────────
    /// The backend answered with `success: false`.
    #[error("Request rejected by backend: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// The backend reported success but sent no `data` payload.
    #[error("Response from {path} carried no data")]
    MissingData { path: String },
}

impl Error {
    /// Returns `true` for failures that happened before a response envelope
    /// was available (network, URL, TLS, non-JSON body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::InvalidUrl(_) | Self::Tls(_) | Self::Deserialization { .. }
        )
    }

    /// Returns `true` if the transport gave up waiting.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// The backend-supplied message, if this is a business-level rejection.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }
}
