// ── Session state ──

use serde::{Deserialize, Serialize};
use strum::Display;
use where2go_api::{LoginUser, Profile};

/// Identity of the signed-in admin plus the readiness flag.
///
/// `user_id` empty means "not authenticated". `is_ready` turns true once,
/// when the initial profile fetch resolves, and never goes back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub avatar: String,
    #[serde(rename = "isReady")]
    pub is_ready: bool,
}

/// Where the session stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Readiness {
    /// Profile fetch still pending; auth decisions must wait.
    Unknown,
    ReadyAuthenticated,
    ReadyAnonymous,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.user_id.is_empty()
    }

    pub fn readiness(&self) -> Readiness {
        match (self.is_ready, self.is_authenticated()) {
            (false, _) => Readiness::Unknown,
            (true, true) => Readiness::ReadyAuthenticated,
            (true, false) => Readiness::ReadyAnonymous,
        }
    }

    /// Shallow merge: every `Some` field of `patch` replaces ours.
    pub fn merged(&self, patch: SessionPatch) -> Self {
        Self {
            user_id: patch.user_id.unwrap_or_else(|| self.user_id.clone()),
            email: patch.email.unwrap_or_else(|| self.email.clone()),
            username: patch.username.unwrap_or_else(|| self.username.clone()),
            avatar: patch.avatar.unwrap_or_else(|| self.avatar.clone()),
            is_ready: patch.is_ready.unwrap_or(self.is_ready),
        }
    }

    /// Default identity, current readiness.
    pub fn signed_out(&self) -> Self {
        Self {
            is_ready: self.is_ready,
            ..Self::default()
        }
    }
}

/// Partial update for [`Session`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub is_ready: Option<bool>,
}

impl SessionPatch {
    /// Only flips the readiness flag.
    pub fn ready() -> Self {
        Self {
            is_ready: Some(true),
            ..Self::default()
        }
    }

    pub fn with_ready(mut self) -> Self {
        self.is_ready = Some(true);
        self
    }
}

impl From<LoginUser> for SessionPatch {
    fn from(user: LoginUser) -> Self {
        Self {
            user_id: Some(user.id),
            email: Some(user.email),
            ..Self::default()
        }
    }
}

impl From<Profile> for SessionPatch {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.id,
            email: profile.email,
            username: profile.username,
            avatar: profile.avatar,
            is_ready: None,
        }
    }
}
