// ── Session store ──
//
// The one observable container for session state. Every mutation swaps in
// a fresh `Arc<Session>` through a `watch` channel, so readers never see a
// half-applied merge and subscribers are woken exactly once per change.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use crate::model::{Readiness, Session, SessionPatch};
use crate::stream::Selection;

/// Observable session state.
///
/// Created once per application session by
/// [`SessionContext`](crate::SessionContext) and shared by `Arc`. The only
/// mutation surface is [`set`](Self::set) / [`reset`](Self::reset).
pub struct SessionStore {
    state: watch::Sender<Arc<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_state(Session::default())
    }

    pub fn with_state(session: Session) -> Self {
        let (state, _) = watch::channel(Arc::new(session));
        Self { state }
    }

    /// The current state (cheap `Arc` clone).
    pub fn get(&self) -> Arc<Session> {
        self.state.borrow().clone()
    }

    pub fn readiness(&self) -> Readiness {
        self.state.borrow().readiness()
    }

    /// Shallow-merge `patch` into the current state and notify subscribers.
    pub fn set(&self, patch: SessionPatch) {
        trace!(?patch, "session set");
        // `send_modify` updates unconditionally, even with zero receivers.
        self.state
            .send_modify(|current| *current = Arc::new(current.merged(patch)));
    }

    /// Reset identity fields to their defaults. Readiness is kept: a session
    /// that was decided stays decided.
    pub fn reset(&self) {
        trace!("session sign-out");
        self.state
            .send_modify(|current| *current = Arc::new(current.signed_out()));
    }

    /// Subscribe to a slice of the session picked out by `selector`.
    ///
    /// Dropping the returned [`Selection`] unsubscribes.
    pub fn subscribe<T, F>(&self, selector: F) -> Selection<T, F>
    where
        T: Clone + PartialEq,
        F: Fn(&Session) -> T,
    {
        Selection::new(self.state.subscribe(), selector)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }

    /// Resolve once the session has left [`Readiness::Unknown`].
    pub async fn wait_until_ready(&self) -> Arc<Session> {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so `wait_for` cannot observe a closed channel.
        match rx.wait_for(|s| s.is_ready).await {
            Ok(session) => session.clone(),
            Err(_) => self.get(),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    fn signed_in() -> SessionPatch {
        SessionPatch {
            user_id: Some("u1".into()),
            email: Some("a@b.com".into()),
            ..SessionPatch::default()
        }
    }

    #[test]
    fn starts_from_default() {
        let store = SessionStore::new();
        assert_eq!(*store.get(), Session::default());
        assert_eq!(store.readiness(), Readiness::Unknown);
    }

    #[test]
    fn set_merges_shallowly() {
        let store = SessionStore::new();
        store.set(SessionPatch {
            username: Some("admin".into()),
            ..SessionPatch::default()
        });
        store.set(signed_in());

        let session = store.get();
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.username, "admin");
        assert!(!session.is_ready);
    }

    #[test]
    fn set_replaces_state_reference() {
        let store = SessionStore::new();
        let before = store.get();
        store.set(SessionPatch::ready());
        assert!(!Arc::ptr_eq(&before, &store.get()));
        assert!(!before.is_ready);
    }

    #[test]
    fn reset_keeps_readiness() {
        let store = SessionStore::new();
        store.set(signed_in().with_ready());
        store.reset();

        let session = store.get();
        assert!(session.user_id.is_empty());
        assert!(session.is_ready);
        assert_eq!(store.readiness(), Readiness::ReadyAnonymous);
    }

    #[test]
    fn dropping_selection_unsubscribes() {
        let store = SessionStore::new();
        let sel = store.subscribe(|s| s.user_id.clone());
        assert_eq!(store.subscriber_count(), 1);
        drop(sel);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn wait_until_ready_resolves_after_set() {
        let store = Arc::new(SessionStore::new());
        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.wait_until_ready().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        store.set(SessionPatch::ready());
        let session = waiter.await.unwrap();
        assert!(session.is_ready);
    }

    #[test]
    fn wait_until_ready_returns_immediately_when_ready() {
        let store = SessionStore::with_state(Session {
            is_ready: true,
            ..Session::default()
        });
        let session = tokio_test::block_on(store.wait_until_ready());
        assert_eq!(session.readiness(), Readiness::ReadyAnonymous);
    }
}
