use crate::{Notifier, Report};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use vw_core::{Result, WatchError};
use zbus::zvariant::Value;

const DEST:  &str = "org.freedesktop.Notifications";
const PATH:  &str = "/org/freedesktop/Notifications";
const QUEUE: usize = 8;

/// Raises desktop notifications through `org.freedesktop.Notifications`.
///
/// The D-Bus connection lives in a background task; [`Notifier::notify`]
/// only queues the report.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    tx: mpsc::Sender<Report>,
}

impl DesktopNotifier {
    /// Spawn the delivery task.  Must be called inside a Tokio runtime.
    pub fn spawn(app_name: impl Into<String>, timeout_ms: i32) -> Self {
        let (notifier, rx) = Self::queue(QUEUE);
        tokio::spawn(deliver_loop(app_name.into(), timeout_ms, rx));
        notifier
    }

    fn queue(capacity: usize) -> (Self, mpsc::Receiver<Report>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, report: &Report) -> Result<()> {
        self.tx
            .try_send(report.clone())
            .map_err(|e| WatchError::Notify(format!("desktop queue: {e}")))
    }
}

async fn deliver_loop(app_name: String, timeout_ms: i32, mut rx: mpsc::Receiver<Report>) {
    let mut conn: Option<zbus::Connection> = None;

    while let Some(report) = rx.recv().await {
        if conn.is_none() {
            match zbus::Connection::session().await {
                Ok(c) => conn = Some(c),
                Err(e) => {
                    warn!("D-Bus session bus unavailable: {e}");
                    continue;
                }
            }
        }
        let Some(c) = conn.as_ref() else { continue };

        let summary = format!("Vehicle alert (device {})", report.device_id);
        let hints: HashMap<&str, Value<'_>> = HashMap::new();
        let body = (
            app_name.as_str(),
            0u32,
            "",
            summary.as_str(),
            report.body.as_str(),
            Vec::<&str>::new(),
            hints,
            timeout_ms,
        );

        match c.call_method(Some(DEST), PATH, Some(DEST), "Notify", &body).await {
            Ok(_) => debug!("Desktop notification sent: {report}"),
            Err(e) => {
                warn!("Desktop notification failed: {e}");
                conn = None; // reconnect on the next report
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn full_queue_is_notify_error() {
        let (notifier, _rx) = DesktopNotifier::queue(2);
        let report = Report::new(1, "disaster dude!");
        notifier.notify(&report).unwrap();
        notifier.notify(&report).unwrap();
        assert!(matches!(notifier.notify(&report), Err(WatchError::Notify(_))));
    }

    #[test]
    fn stopped_task_is_notify_error() {
        let (notifier, rx) = DesktopNotifier::queue(QUEUE);
        drop(rx);
        assert!(matches!(
            notifier.notify(&Report::new(1, "x")),
            Err(WatchError::Notify(_))
        ));
    }

    #[tokio::test]
    async fn deliver_loop_ends_when_notifier_dropped() {
        let (notifier, rx) = DesktopNotifier::queue(QUEUE);
        let task = tokio::spawn(deliver_loop("vwatch".into(), 1_000, rx));
        drop(notifier);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("delivery task still running")
            .unwrap();
    }
}
