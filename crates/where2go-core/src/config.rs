// ── Runtime connection configuration ──
//
// Describes *how* to reach the backend. Front ends construct a
// `ClientConfig` (from a profile, flags, env) and hand it in; core never
// reads config files.

use std::time::Duration;

use url::Url;
use where2go_api::{ApiClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// Default backend origin when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin (e.g., `https://api.where2go.example`).
    pub backend_url: Url,
    pub tls: TlsVerification,
    /// Overall per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            ..Self::default()
        }
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }

    /// Build the request client this config describes.
    pub fn build_client(&self) -> Result<ApiClient, CoreError> {
        Ok(ApiClient::new(self.backend_url.clone(), &self.transport())?)
    }
}
