//! Polling file watcher.
//!
//! Checks a rule file's modification time and length on a fixed interval and
//! fires a [`ChangeNotifier`] when either moves. A file that is temporarily
//! missing or unreadable is not a change; the watcher keeps polling.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::signal::ChangeNotifier;

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

async fn fingerprint(path: &Path) -> Option<Fingerprint> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    Some(Fingerprint {
        modified: metadata.modified().ok(),
        len: metadata.len(),
    })
}

/// Spawn a task that polls `path` every `interval` and notifies on change.
///
/// The task stops when the returned handle is aborted. Must be called from
/// within a tokio runtime.
pub fn spawn_file_watcher(
    path: impl Into<PathBuf>,
    interval: Duration,
    notifier: ChangeNotifier,
) -> JoinHandle<()> {
    let path = path.into();
    tokio::spawn(async move {
        info!(path = %path.display(), ?interval, "watching rule file");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last = fingerprint(&path).await;
        loop {
            ticker.tick().await;
            let Some(current) = fingerprint(&path).await else {
                debug!(path = %path.display(), "rule file unavailable, still polling");
                continue;
            };
            if last != Some(current) {
                debug!(path = %path.display(), "rule file changed");
                notifier.notify();
                last = Some(current);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reload::change_signal;

    #[tokio::test]
    async fn edit_fires_signal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        std::fs::write(&path, "hello/Hi").unwrap();

        let (notifier, mut sub) = change_signal();
        let handle = spawn_file_watcher(&path, Duration::from_millis(10), notifier);

        // Let the watcher take its first fingerprint.
        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::write(&path, "hello/Hi#Hey there").unwrap();

        let fired = tokio::time::timeout(Duration::from_secs(2), sub.changed()).await;
        handle.abort();
        assert!(matches!(fired, Ok(true)));
    }

    #[tokio::test]
    async fn unchanged_file_stays_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        std::fs::write(&path, "hello/Hi").unwrap();

        let (notifier, mut sub) = change_signal();
        let handle = spawn_file_watcher(&path, Duration::from_millis(10), notifier);

        let fired = tokio::time::timeout(Duration::from_millis(100), sub.changed()).await;
        handle.abort();
        assert!(fired.is_err());
    }
}
