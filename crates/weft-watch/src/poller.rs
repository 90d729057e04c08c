//! Background snapshot poller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use crate::ReloadEvent;
use crate::hub::ReloadHub;
use crate::snapshot::Snapshot;

/// Default poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Smallest accepted poll interval.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polls watched directories for modification-time changes.
///
/// The poller alternates between idle (sleeping out the tick interval)
/// and scanning (walking every watched directory). All changes found in
/// one cycle coalesce into a single broadcast, issued only after the
/// snapshot is fully updated for that cycle.
pub struct SnapshotPoller {
    watch_dirs: Vec<PathBuf>,
    interval: Duration,
    snapshot: Snapshot,
}

impl SnapshotPoller {
    /// Create a poller over `watch_dirs` with the given tick interval.
    ///
    /// A zero interval is clamped to one millisecond; the tick timer
    /// cannot run on a zero period.
    #[must_use]
    pub fn new(watch_dirs: Vec<PathBuf>, interval: Duration) -> Self {
        Self {
            watch_dirs,
            interval: interval.max(MIN_POLL_INTERVAL),
            snapshot: Snapshot::new(),
        }
    }

    /// Run one poll cycle and return the number of changed files.
    ///
    /// Walks every watched directory recursively. Directories are only
    /// descended into, never reported; unreadable entries are skipped
    /// and the walk continues. On return the snapshot reflects every
    /// observation made this cycle.
    pub fn scan_once(&mut self) -> usize {
        let mut changed = 0;

        for dir in &self.watch_dirs {
            for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(metadata) = entry.metadata() else {
                    continue;
                };
                let Ok(mtime) = metadata.modified() else {
                    continue;
                };
                if self.snapshot.observe(entry.path(), mtime) {
                    tracing::debug!(path = %entry.path().display(), "File changed");
                    changed += 1;
                }
            }
        }

        changed
    }

    /// Spawn the poll loop as a background task.
    ///
    /// The task runs until the returned [`PollerHandle`] is stopped or
    /// the process exits. Filesystem errors never terminate the loop.
    #[must_use]
    pub fn spawn(self, hub: Arc<ReloadHub>) -> PollerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut poller = self;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // The walk is synchronous filesystem work; run it on
                        // the blocking pool so a large tree never stalls a
                        // runtime worker.
                        let scan = tokio::task::spawn_blocking(move || {
                            let mut poller = poller;
                            let changed = poller.scan_once();
                            (poller, changed)
                        });
                        let Ok((scanner, changed)) = scan.await else { break };
                        poller = scanner;

                        if changed > 0 {
                            tracing::info!(changed, "Detected file changes");
                            hub.broadcast(&ReloadEvent::new(changed));
                        }
                    }
                    _ = stop_rx.changed() => break,
                }
            }
        });

        PollerHandle {
            stop: stop_tx,
            task,
        }
    }
}

/// Handle to a running poll loop.
pub struct PollerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Signal the poll loop to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }

    /// Abort the poll loop without waiting.
    pub fn abort(&self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const TICK: Duration = Duration::from_millis(25);
    const RECV_TIMEOUT: Duration = Duration::from_secs(2);

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_first_scan_reports_existing_files_as_changed() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", "<p>hi</p>");
        write(&dir, "style.css", "body {}");

        let mut poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], TICK);

        assert_eq!(poller.scan_once(), 2);
        // Nothing changed since: quiet cycle.
        assert_eq!(poller.scan_once(), 0);
    }

    #[test]
    fn test_new_file_is_one_change() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", "<p>hi</p>");

        let mut poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], TICK);
        poller.scan_once();

        write(&dir, "new.html", "<p>new</p>");
        assert_eq!(poller.scan_once(), 1);
        assert_eq!(poller.scan_once(), 0);
    }

    #[test]
    fn test_directories_are_descended_not_reported() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/page.html"), "x").unwrap();

        let mut poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], TICK);

        // Only the file counts; neither the root nor "nested" does.
        assert_eq!(poller.scan_once(), 1);
    }

    #[test]
    fn test_missing_watch_dir_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.txt", "x");

        let mut poller = SnapshotPoller::new(
            vec![PathBuf::from("/nonexistent/weft-test"), dir.path().to_path_buf()],
            TICK,
        );

        // The unreadable directory is skipped, the walk continues.
        assert_eq!(poller.scan_once(), 1);
    }

    #[test]
    fn test_multiple_watch_dirs() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write(&a, "one.html", "1");
        write(&b, "two.html", "2");

        let mut poller =
            SnapshotPoller::new(vec![a.path().to_path_buf(), b.path().to_path_buf()], TICK);

        assert_eq!(poller.scan_once(), 2);
    }

    #[test]
    fn test_changes_within_one_cycle_coalesce() {
        let dir = TempDir::new().unwrap();
        let hub = ReloadHub::new();
        let mut poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], TICK);
        poller.scan_once();

        write(&dir, "a.css", "a");
        write(&dir, "b.css", "b");

        // One cycle, one aggregate event, however many files changed.
        let changed = poller.scan_once();
        assert_eq!(changed, 2);
        hub.broadcast(&ReloadEvent::new(changed));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_spawned_poller_broadcasts_on_change() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", "v1");

        let hub = ReloadHub::new();
        let poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], TICK);
        let handle = poller.spawn(Arc::clone(&hub));

        // Let the startup cycle (everything "new") pass with nobody
        // listening.
        tokio::time::sleep(TICK * 4).await;

        let mut subscriber = hub.register();
        write(&dir, "a.css", "a");

        let event = tokio::time::timeout(RECV_TIMEOUT, subscriber.recv())
            .await
            .expect("reload signal within timeout")
            .expect("subscriber still registered");
        assert!(event.changed >= 1);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_reload_scenario_end_to_end() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", "v1");

        let hub = ReloadHub::new();
        let poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], TICK);
        let handle = poller.spawn(Arc::clone(&hub));

        // Cycle 1: index.html observed, no subscribers, nothing delivered.
        tokio::time::sleep(TICK * 4).await;
        assert_eq!(hub.subscriber_count(), 0);

        // Client connects, file changes, client gets one signal.
        let mut s1 = hub.register();
        write(&dir, "index2.html", "v2");
        let event = tokio::time::timeout(RECV_TIMEOUT, s1.recv())
            .await
            .expect("reload signal within timeout")
            .expect("subscriber still registered");
        assert_eq!(event.changed, 1);

        // Client disconnects; the next change is delivered to nobody.
        drop(s1);
        assert_eq!(hub.subscriber_count(), 0);
        write(&dir, "index3.html", "v3");
        tokio::time::sleep(TICK * 4).await;

        // A fresh subscriber sees no stale signal from that cycle.
        let mut s2 = hub.register();
        tokio::time::sleep(TICK * 2).await;
        assert!(s2.try_recv().is_none());

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_snapshot_state_persists_across_cycles() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", "v1");

        let hub = ReloadHub::new();
        let poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], TICK);
        let handle = poller.spawn(Arc::clone(&hub));

        tokio::time::sleep(TICK * 4).await;
        let mut subscriber = hub.register();

        // Two sequential changes: each cycle must report only the new
        // file, proving earlier observations are still in the snapshot.
        write(&dir, "a.css", "a");
        let first = tokio::time::timeout(RECV_TIMEOUT, subscriber.recv())
            .await
            .expect("first signal within timeout")
            .expect("subscriber still registered");
        assert_eq!(first.changed, 1);

        write(&dir, "b.css", "b");
        let second = tokio::time::timeout(RECV_TIMEOUT, subscriber.recv())
            .await
            .expect("second signal within timeout")
            .expect("subscriber still registered");
        assert_eq!(second.changed, 1);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped_not_a_panic() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", "v1");

        let hub = ReloadHub::new();
        let poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], Duration::ZERO);
        let handle = poller.spawn(Arc::clone(&hub));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let mut subscriber = hub.register();
        write(&dir, "a.css", "a");

        // A panicked poll task would never deliver this signal.
        let event = tokio::time::timeout(RECV_TIMEOUT, subscriber.recv())
            .await
            .expect("reload signal within timeout")
            .expect("subscriber still registered");
        assert!(event.changed >= 1);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_stop_terminates_poll_loop() {
        let dir = TempDir::new().unwrap();
        let hub = ReloadHub::new();
        let poller = SnapshotPoller::new(vec![dir.path().to_path_buf()], TICK);

        let handle = poller.spawn(Arc::clone(&hub));
        tokio::time::timeout(RECV_TIMEOUT, handle.stop())
            .await
            .expect("poller stops promptly");
    }
}
