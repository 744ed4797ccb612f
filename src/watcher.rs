use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;

use crate::{PropertyStore, ReloadOutcome};

/// Starts the snapshot file watch.
///
/// Polls the watched path's modification time on a fixed cadence and calls
/// `reload()` whenever it differs from the last observed value. A failed
/// reload is logged and retried on the next observed change; the task runs
/// until the process exits.
pub fn spawn(store: Arc<PropertyStore>, poll_interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        // No baseline yet: the first tick reloads unconditionally, so a
        // rewrite landing between the eager startup load and this task
        // starting is never absorbed silently.
        let mut last_seen: Option<Option<SystemTime>> = None;

        loop {
            ticker.tick().await;

            let modified = store.modified();
            if last_seen == Some(modified) {
                continue;
            }
            last_seen = Some(modified);

            match store.reload() {
                Ok(ReloadOutcome::Replaced(count)) => {
                    println!("[WATCH] Snapshot reloaded: {} records", count);
                }
                Ok(ReloadOutcome::Skipped) => {}
                Err(e) => {
                    eprintln!("[WATCH] Reload failed, keeping previous snapshot: {}", e);
                }
            }
        }
    })
}
