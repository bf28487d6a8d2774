// ── Session actions and composition root ──
//
// login / logout / fetch_profile call the request client and fold the
// outcome into the SessionStore. `SessionContext` owns all three pieces and
// is the only place a store is ever created.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::SecretString;
use tracing::{debug, info, warn};
use where2go_api::{ApiClient, LoginPayload, RequestResult};

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::model::{Readiness, Session, SessionPatch};
use crate::store::SessionStore;

// ── SessionActions ───────────────────────────────────────────────

/// The operations allowed to mutate the session.
///
/// Each returns the raw [`RequestResult`] so callers can tell a transport
/// failure from a backend rejection and word their message accordingly.
pub struct SessionActions {
    client: Arc<ApiClient>,
    store: Arc<SessionStore>,
    profile_fetched: AtomicBool,
}

impl SessionActions {
    pub fn new(client: Arc<ApiClient>, store: Arc<SessionStore>) -> Self {
        Self {
            client,
            store,
            profile_fetched: AtomicBool::new(false),
        }
    }

    /// Authenticate. On `success: true` the returned user id and email are
    /// merged into the store; readiness is left alone.
    pub async fn login(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> RequestResult<LoginPayload> {
        let result = self.client.login(identifier, password).await;

        if let Ok(resp) = &result {
            match (resp.success, &resp.data) {
                (true, Some(payload)) => {
                    info!(user_id = %payload.user.id, "signed in");
                    self.store.set(SessionPatch::from(payload.user.clone()));
                }
                (true, None) => warn!("login succeeded without a user payload"),
                (false, _) => debug!(message = ?resp.message, "login rejected"),
            }
        }

        result
    }

    /// End the session. On `success: true` the identity is reset to its
    /// defaults; on any failure the store is left untouched.
    pub async fn logout(&self) -> RequestResult<serde_json::Value> {
        let result = self.client.logout().await;

        if matches!(&result, Ok(resp) if resp.success) {
            info!("signed out");
            self.store.reset();
        }

        result
    }

    /// Resolve the initial session from the backend's cookie.
    ///
    /// Runs at most once: the first call fetches the profile and always ends
    /// with `is_ready = true`, merging the profile only when the backend
    /// reports success. Later calls return the current readiness without a
    /// request.
    pub async fn fetch_profile(&self) -> Readiness {
        if self.profile_fetched.swap(true, Ordering::SeqCst) {
            debug!("profile already fetched for this session");
            return self.store.readiness();
        }

        let patch = match self.client.user_info().await {
            Ok(resp) if resp.success => resp
                .data
                .map_or_else(SessionPatch::ready, |profile| {
                    SessionPatch::from(profile).with_ready()
                }),
            Ok(resp) => {
                debug!(message = ?resp.message, "no active session");
                SessionPatch::ready()
            }
            Err(e) => {
                warn!(error = %e, "profile fetch failed; continuing signed out");
                SessionPatch::ready()
            }
        };

        self.store.set(patch);
        let readiness = self.store.readiness();
        info!(%readiness, "session ready");
        readiness
    }

    pub fn profile_fetched(&self) -> bool {
        self.profile_fetched.load(Ordering::SeqCst)
    }
}

// ── SessionContext ───────────────────────────────────────────────

/// Application-session scope: one client, one store, one set of actions.
///
/// Cheaply cloneable via `Arc`. Build it with
/// [`initialize`](Self::initialize) to get a context whose session is
/// already decided, or with [`new`](Self::new) and drive
/// [`SessionActions::fetch_profile`] yourself.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionContextInner>,
}

struct SessionContextInner {
    client: Arc<ApiClient>,
    store: Arc<SessionStore>,
    actions: SessionActions,
}

impl SessionContext {
    /// Create the context with an undecided ([`Readiness::Unknown`]) session.
    pub fn new(client: ApiClient) -> Self {
        let client = Arc::new(client);
        let store = Arc::new(SessionStore::new());
        let actions = SessionActions::new(Arc::clone(&client), Arc::clone(&store));
        Self {
            inner: Arc::new(SessionContextInner {
                client,
                store,
                actions,
            }),
        }
    }

    /// Create the context and wait for the profile fetch to settle.
    pub async fn initialize(client: ApiClient) -> Self {
        let ctx = Self::new(client);
        ctx.actions().fetch_profile().await;
        ctx
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.inner.client
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.inner.store
    }

    pub fn actions(&self) -> &SessionActions {
        &self.inner.actions
    }

    /// Catalog operations sharing this context's client (and cookie).
    pub fn catalog(&self) -> Catalog {
        Catalog::new(Arc::clone(&self.inner.client))
    }

    /// Gate for signed-in-only operations.
    ///
    /// Waits for readiness first, so an undecided session is never mistaken
    /// for a signed-out one.
    pub async fn require_authenticated(&self) -> Result<Arc<Session>, CoreError> {
        let session = self.inner.store.wait_until_ready().await;
        if session.is_authenticated() {
            Ok(session)
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }
}
