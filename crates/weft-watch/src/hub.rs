//! Subscriber registry and broadcast dispatch.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

use crate::ReloadEvent;

/// Per-subscriber signal buffer. Reload signals are idempotent, so a
/// full buffer simply drops the signal for that subscriber.
const SUBSCRIBER_BUFFER: usize = 8;

/// Process-wide registry of live-reload subscribers.
///
/// Registration, unregistration and broadcast may all happen
/// concurrently from independent tasks; the registry serializes access
/// to the underlying set internally. Delivery is best-effort and
/// non-blocking per subscriber: a slow or disconnected consumer never
/// delays delivery to the others.
pub struct ReloadHub {
    subscribers: Mutex<HashMap<u64, mpsc::Sender<ReloadEvent>>>,
    next_id: AtomicU64,
}

impl ReloadHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        })
    }

    /// Register a new subscriber conduit.
    ///
    /// The returned [`Subscriber`] unregisters itself when dropped, so
    /// connection teardown (clean or not) always removes the entry.
    #[must_use]
    pub fn register(self: &Arc<Self>) -> Subscriber {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);

        self.subscribers.lock().unwrap().insert(id, tx);
        tracing::debug!(subscriber = id, "Registered live-reload subscriber");

        Subscriber {
            id,
            hub: Arc::clone(self),
            rx,
        }
    }

    /// Remove a subscriber. Removing an already-removed id is a no-op.
    pub fn unregister(&self, id: u64) {
        if self.subscribers.lock().unwrap().remove(&id).is_some() {
            tracing::debug!(subscriber = id, "Unregistered live-reload subscriber");
        }
    }

    /// Deliver `event` to every currently registered subscriber.
    ///
    /// Each delivery is an independent non-blocking send: a subscriber
    /// with a full buffer misses this signal, a subscriber whose
    /// receiving side is gone is removed. No acknowledgment, no retry.
    pub fn broadcast(&self, event: &ReloadEvent) {
        // Snapshot the membership so sends happen outside the lock.
        let targets: Vec<(u64, mpsc::Sender<ReloadEvent>)> = self
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut closed = Vec::new();
        for (id, tx) in targets {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::debug!(subscriber = id, "Reload signal dropped, subscriber busy");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => closed.push(id),
            }
        }

        for id in closed {
            self.unregister(id);
        }
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

/// One client's live-reload conduit.
///
/// Lives for the duration of the client connection; dropping it removes
/// the registry entry.
pub struct Subscriber {
    id: u64,
    hub: Arc<ReloadHub>,
    rx: mpsc::Receiver<ReloadEvent>,
}

impl Subscriber {
    /// Registry id of this subscriber.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next reload signal.
    ///
    /// Returns `None` once the subscriber has been unregistered and all
    /// buffered signals are consumed.
    pub async fn recv(&mut self) -> Option<ReloadEvent> {
        self.rx.recv().await
    }

    /// Take a buffered reload signal without waiting.
    pub fn try_recv(&mut self) -> Option<ReloadEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.hub.unregister(self.id);
    }
}

impl Stream for Subscriber {
    type Item = ReloadEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
