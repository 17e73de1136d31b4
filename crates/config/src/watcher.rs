use crate::{load, WatchConfig};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Live reload for `vwatch.toml`.
///
/// Each save is re-parsed on the watcher task and the resulting
/// [`WatchConfig`] is sent on; a half-written or invalid file is logged and
/// skipped, so the session keeps its last good `[report]` settings.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_watcher, mut rx) = vw_config::ConfigWatcher::spawn("/home/user/.config/vwatch/vwatch.toml");
/// while let Some(cfg) = rx.recv().await {
///     println!("reloaded, device id {}", cfg.report.device_id);
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Start watching `path` on a Tokio task.  Dropping the receiver stops it.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<WatchConfig>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<WatchConfig>) {
    use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let (event_tx, mut event_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = event_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", path.display());
        return;
    }

    info!("Reloading report settings from {} on change", path.display());

    while let Some(event) = event_rx.recv().await {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                warn!("Watcher error: {e}");
                continue;
            }
        };
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            continue;
        }
        match load(&path) {
            Ok(cfg) => {
                if tx.send(cfg).await.is_err() {
                    break; // receiver dropped
                }
            }
            Err(e) => warn!("Keeping previous settings; reload failed: {e}"),
        }
    }
}
