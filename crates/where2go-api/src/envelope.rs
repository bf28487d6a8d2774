// Backend response envelope
//
// Every endpoint answers `{ "success": bool, "data"?: T, "message"?: string }`.
// Transport success says nothing about business success, so the envelope is
// handed to callers intact and they decide how to treat `success: false`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// The `{ success, data, message }` envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    /// Business-level outcome. Missing means `false`.
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Collapse the envelope into its payload.
    ///
    /// `success: false` becomes [`Error::Rejected`] with the backend message;
    /// a successful envelope without `data` becomes [`Error::MissingData`].
    pub fn into_data(self, path: &str) -> Result<T, Error> {
        if !self.success {
            return Err(Error::Rejected {
                message: self.message,
            });
        }
        self.data.ok_or_else(|| Error::MissingData { path: path.into() })
    }

    /// Check business success without requiring a payload.
    pub fn ensure_success(&self) -> Result<(), Error> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Rejected {
                message: self.message.clone(),
            })
        }
    }
}

/// The envelope with its payload still undecoded.
///
/// A rejected envelope often carries a `data` that does not match the
/// success shape (`{}` on a failed login, say), so `data` is only held to
/// `T` once `success` is known.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl RawEnvelope {
    /// Decode `data` into `T`.
    ///
    /// Fails only for a successful envelope whose payload has the wrong
    /// shape. A rejected envelope keeps its message and drops a payload it
    /// cannot decode.
    pub(crate) fn decode<T: DeserializeOwned>(self) -> Result<ApiResponse<T>, serde_json::Error> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) if self.success => Some(serde_json::from_value(value)?),
            Some(value) => serde_json::from_value(value).ok(),
        };
        Ok(ApiResponse {
            success: self.success,
            data,
            message: self.message,
        })
    }
}
