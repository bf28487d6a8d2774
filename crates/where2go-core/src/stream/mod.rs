// ── Session selections ──
//
// Subscription handles vended by the SessionStore. A selection watches the
// whole session but only reports changes to the slice its selector picks.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Session;

/// A subscription to one derived value of the session.
///
/// Provides point-in-time access via [`current`](Self::current) /
/// [`latest`](Self::latest) and change notification via
/// [`changed`](Self::changed) or by converting into a `Stream`.
pub struct Selection<T, F> {
    current: T,
    receiver: watch::Receiver<Arc<Session>>,
    selector: F,
}

impl<T, F> Selection<T, F>
where
    T: Clone + PartialEq,
    F: Fn(&Session) -> T,
{
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<Session>>, selector: F) -> Self {
        let current = selector(&receiver.borrow_and_update());
        Self {
            current,
            receiver,
            selector,
        }
    }

    /// The selected value as of the last observed change.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Re-run the selector against the latest state.
    pub fn latest(&self) -> T {
        (self.selector)(&self.receiver.borrow())
    }

    /// Wait until the selected value differs from [`current`](Self::current).
    ///
    /// State changes that leave the selection equal are skipped. Returns
    /// `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        loop {
            self.receiver.changed().await.ok()?;
            let next = (self.selector)(&self.receiver.borrow_and_update());
            if next != self.current {
                self.current = next.clone();
                return Some(next);
            }
        }
    }

    /// Convert into a `Stream` yielding the selection for every state
    /// replacement, starting with the current one.
    pub fn into_stream(self) -> SelectionStream<F> {
        SelectionStream {
            inner: WatchStream::new(self.receiver),
            selector: self.selector,
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct SelectionStream<F> {
    inner: WatchStream<Arc<Session>>,
    selector: F,
}

impl<T, F> Stream for SelectionStream<F>
where
    F: Fn(&Session) -> T + Unpin,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        Pin::new(&mut this.inner)
            .poll_next(cx)
            .map(|next| next.map(|session| (this.selector)(&session)))
    }
}
