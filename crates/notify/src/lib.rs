//! Report delivery.
//!
//! A [`Notifier`] must not block: the session loop calls it inline, so
//! anything slow (D-Bus, network) is handed off to a background task.

pub mod desktop;
pub mod report;

pub use desktop::DesktopNotifier;
pub use report::Report;

use tokio::sync::mpsc;
use tracing::warn;
use vw_core::{Result, WatchError};

/// Something that can deliver a [`Report`].
pub trait Notifier: Send + Sync {
    fn notify(&self, report: &Report) -> Result<()>;
}

/// Writes reports to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, report: &Report) -> Result<()> {
        warn!(device_id = report.device_id, at = %report.at, "{report}");
        Ok(())
    }
}

/// Forwards reports into a channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Report>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Report>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, report: &Report) -> Result<()> {
        self.tx
            .send(report.clone())
            .map_err(|_| WatchError::ChannelClosed("report"))
    }
}

/// Delivers to every inner notifier.  Succeeds if at least one did.
#[derive(Default)]
pub struct FanOut {
    targets: Vec<Box<dyn Notifier>>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, notifier: impl Notifier + 'static) -> Self {
        self.targets.push(Box::new(notifier));
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Notifier for FanOut {
    fn notify(&self, report: &Report) -> Result<()> {
        let mut delivered = false;
        let mut last_err = None;
        for target in &self.targets {
            match target.notify(report) {
                Ok(()) => delivered = true,
                Err(e) => {
                    warn!("Report delivery failed: {e}");
                    last_err = Some(e);
                }
            }
        }
        match (delivered, last_err) {
            (true, _) => Ok(()),
            (false, Some(e)) => Err(e),
            (false, None) => Err(WatchError::Notify("no notifier configured".into())),
        }
    }
}
