//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use where2go_config::ConfigError;
use where2go_core::{CoreError, Notification};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(where2go::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             {reason}\n\
             Try: where2go --backend http://localhost:3000 whoami"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(where2go::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("{title}")]
    #[diagnostic(
        code(where2go::auth_failed),
        help("{description}\nCheck the identifier and password for profile '{profile}'.")
    )]
    AuthFailed {
        title: String,
        description: String,
        profile: String,
    },

    #[error("Not signed in")]
    #[diagnostic(
        code(where2go::not_authenticated),
        help("Run: where2go login --profile {profile}")
    )]
    NotAuthenticated { profile: String },

    #[error("No password available for profile '{profile}'")]
    #[diagnostic(
        code(where2go::no_credentials),
        help(
            "Pass --password-stdin, set WHERE2GO_PASSWORD, or run:\n\
             where2go config set-password --profile {profile}"
        )
    )]
    NoCredentials { profile: String },

    // ── Catalog ──────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(where2go::not_found),
        help("Run: where2go {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    /// A backend `success: false`, worded like the toast it replaces.
    #[error("{title}")]
    #[diagnostic(code(where2go::rejected), help("{description}"))]
    Rejected { title: String, description: String },

    #[error("Unexpected backend response: {message}")]
    #[diagnostic(
        code(where2go::api_error),
        help("Is --backend pointing at a Where2Go API? Run with -vv to see the request.")
    )]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(where2go::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(where2go::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: where2go config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(where2go::config))]
    Config(ConfigError),

    // ── IO / Internal ────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(where2go::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotAuthenticated { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate a core failure, titling business rejections with `title`.
    pub fn from_core(title: &str, err: CoreError, profile: &str) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::NotAuthenticated => Self::NotAuthenticated {
                profile: profile.into(),
            },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: list_command_for(&entity_type).into(),
                resource_type: entity_type,
                identifier,
            },
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::Api { message } => Self::ApiError { message },
            CoreError::Config { message } => Self::Validation {
                field: "backend".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
            rejected @ CoreError::Rejected { .. } => {
                let note = Notification::failure(title, &rejected);
                Self::Rejected {
                    title: note.title,
                    description: note.description.unwrap_or_default(),
                }
            }
        }
    }

    /// A rejected sign-in, worded like the login failure toast.
    pub fn login_rejected(message: Option<String>, profile: &str) -> Self {
        let note = Notification::failure("Login failed!", &CoreError::Rejected { message });
        Self::AuthFailed {
            title: note.title,
            description: note.description.unwrap_or_default(),
            profile: profile.into(),
        }
    }
}

fn list_command_for(entity_type: &str) -> &'static str {
    let lower = entity_type.to_ascii_lowercase();
    if lower.contains("destination") {
        "destinations orphans"
    } else if lower.contains("city") {
        "cities orphans"
    } else if lower.contains("state") {
        "states list"
    } else {
        "--help"
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from_core("Request failed", err, "default")
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => Self::Config(other),
        }
    }
}
