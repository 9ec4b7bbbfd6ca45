// ── Reactive store streams ──
//
// Subscription types for consuming store changes outside the store
// itself (CLI `watch`, embedding UIs).

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::{Keyed, StoreState};

/// A subscription to one store.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via [`changed`](Self::changed) or by converting into a
/// `Stream`.
pub struct StoreStream<T: Keyed + Clone + Send + Sync + 'static> {
    current: StoreState<T>,
    receiver: watch::Receiver<StoreState<T>>,
}

impl<T: Keyed + Clone + Send + Sync + 'static> StoreStream<T> {
    pub fn new(receiver: watch::Receiver<StoreState<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time.
    pub fn current(&self) -> &StoreState<T> {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> StoreState<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the owning store has been dropped.
    pub async fn changed(&mut self) -> Option<StoreState<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> StoreWatchStream<T> {
        StoreWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a fresh [`StoreState`] snapshot each time the store mutates.
pub struct StoreWatchStream<T: Keyed + Clone + Send + Sync + 'static> {
    inner: WatchStream<StoreState<T>>,
}

impl<T: Keyed + Clone + Send + Sync + 'static> Stream for StoreWatchStream<T> {
    type Item = StoreState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // StoreState is always Unpin, so the inner WatchStream is too.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
