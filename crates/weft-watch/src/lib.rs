//! Filesystem polling and live-reload broadcast.
//!
//! A [`SnapshotPoller`] runs as a background task for the life of the
//! process, walking the watched directories on a fixed tick and diffing
//! file modification times against its [`Snapshot`]. All changes seen in
//! one poll cycle coalesce into a single [`ReloadEvent`], broadcast
//! through a [`ReloadHub`] to every registered [`Subscriber`].
//!
//! The snapshot is owned exclusively by the poller; the hub is the only
//! shared mutable state and synchronizes all access internally.

mod hub;
mod poller;
mod snapshot;

use serde::Serialize;

pub use hub::{ReloadHub, Subscriber};
pub use poller::{DEFAULT_POLL_INTERVAL, PollerHandle, SnapshotPoller};
pub use snapshot::Snapshot;

/// Event sent to connected clients when watched files change.
///
/// One event per poll cycle, regardless of how many files changed.
#[derive(Clone, Debug, Serialize)]
pub struct ReloadEvent {
    /// Event type (always "reload").
    #[serde(rename = "type")]
    event_type: &'static str,
    /// Number of files that changed in the triggering poll cycle.
    pub changed: usize,
}

impl ReloadEvent {
    /// Create a reload event for a cycle that saw `changed` files change.
    #[must_use]
    pub fn new(changed: usize) -> Self {
        Self {
            event_type: "reload",
            changed,
        }
    }
}
