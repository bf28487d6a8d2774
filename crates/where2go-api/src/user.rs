// User session endpoints
//
// Cookie-based session login/logout and profile lookup. The login endpoint
// sets a session cookie in the client's jar; subsequent requests carry it
// automatically.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::client::{ApiClient, RequestResult};
use crate::models::{LoginPayload, Profile};

pub const LOGIN_PATH: &str = "/user/login";
pub const LOGOUT_PATH: &str = "/user/logout";
pub const USER_INFO_PATH: &str = "/user/user-info";

/// The backend accepts either a username or an email in its `email` field.
#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// `POST /user/login` with `{ email: identifier, password }`.
    ///
    /// The envelope is returned as-is; a wrong password is `Ok` with
    /// `success: false`, not an `Err`.
    pub async fn login(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> RequestResult<LoginPayload> {
        debug!(identifier, "logging in");
        let body = LoginBody {
            email: identifier,
            password: password.expose_secret(),
        };
        self.post(LOGIN_PATH, &body).await
    }

    /// `POST /user/logout`. The payload, if any, is ignored.
    pub async fn logout(&self) -> RequestResult<serde_json::Value> {
        debug!("logging out");
        self.post_empty(LOGOUT_PATH).await
    }

    /// `GET /user/user-info`: the profile bound to the current session cookie.
    pub async fn user_info(&self) -> RequestResult<Profile> {
        self.get(USER_INFO_PATH).await
    }
}
