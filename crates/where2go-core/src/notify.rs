// ── User-facing notifications ──
//
// Every failure is shown to the user as a dismissable message. When there
// is nothing specific to say, the generic apology is used.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A toast: short title, optional detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: NotificationVariant::Default,
        }
    }

    /// Failure toast describing `error`, or the generic message.
    pub fn failure(title: impl Into<String>, error: &CoreError) -> Self {
        Self {
            title: title.into(),
            description: Some(
                error
                    .user_message()
                    .unwrap_or_else(|| GENERIC_FAILURE.to_owned()),
            ),
            variant: NotificationVariant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {description}", self.title),
            None => f.write_str(&self.title),
        }
    }
}
