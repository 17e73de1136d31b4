use tokio::sync::{mpsc, oneshot};
use vw_config::ReportConfig;
use vw_core::{Result, StatusSnapshot, WatchError};

/// Messages from the outside world to a running session.
#[derive(Debug)]
pub enum Control {
    /// Reply with the current [`StatusSnapshot`].
    Query(oneshot::Sender<StatusSnapshot>),
    /// New `[report]` settings from a config reload.
    ConfigReloaded(ReportConfig),
    /// Stop the session loop.
    Shutdown,
}

/// Cheap, cloneable handle for talking to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Control>,
}

impl SessionHandle {
    /// Create a handle and the receiver the session loop drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Control>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Fetch the session's current status.
    pub async fn status(&self) -> Result<StatusSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Control::Query(reply)).await?;
        rx.await.map_err(|_| WatchError::ChannelClosed("status reply"))
    }

    pub async fn reload(&self, report: ReportConfig) -> Result<()> {
        self.send(Control::ConfigReloaded(report)).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Control::Shutdown).await
    }

    async fn send(&self, cmd: Control) -> Result<()> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| WatchError::ChannelClosed("session control"))
    }
}
