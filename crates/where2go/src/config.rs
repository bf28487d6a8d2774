//! CLI configuration: a thin layer over `where2go_config` that applies
//! `GlobalOpts` overrides and restores the saved session.

use std::time::Duration;

use tracing::debug;

use where2go_core::{ApiClient, ClientConfig, SessionContext, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use where2go_config::{
    Config, Profile, SessionFile, config_path, load_config_or_default, save_config,
};

/// Everything a command needs to talk to the backend as one profile.
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub client: ClientConfig,
}

impl Resolved {
    pub fn session_file(&self) -> SessionFile {
        SessionFile::for_profile(&self.profile_name)
    }

    /// Build a client carrying the profile's saved session cookie, if any.
    pub fn client_with_session(&self) -> Result<ApiClient, CliError> {
        let client = self.client.build_client()?;
        if let Some(header) = self.session_file().load()? {
            let restored = client.restore_cookies(&header);
            debug!(profile = %self.profile_name, restored, "restored session cookie");
        }
        Ok(client)
    }

    /// Restore the session and wait for the profile fetch to settle.
    pub async fn session(&self) -> Result<SessionContext, CliError> {
        Ok(SessionContext::initialize(self.client_with_session()?).await)
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Resolve the profile and translate it, with flag overrides, into a
/// `ClientConfig`.
///
/// A missing profile is only an error when it was asked for by name; the
/// implicit default profile falls back to the local backend.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, config);

    let profile = match config.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            let mut names: Vec<_> = config.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    let mut client = where2go_config::profile_to_client_config(&profile, &config.defaults)?;

    // Flag / env overrides
    if let Some(ref backend) = global.backend {
        client.backend_url = where2go_config::parse_backend_url(backend)?;
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    Ok(Resolved {
        profile_name,
        profile,
        client,
    })
}
