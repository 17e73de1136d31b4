use crate::channels::{pump, MeasurementChannels, MeasurementSenders};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::{TcpStream, UnixStream};
use tracing::{error, info, warn};
use vw_core::{Result, WatchError};

/// Where the vehicle feed is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `unix:/run/openxc/vehicle.sock`
    Unix(PathBuf),
    /// `tcp:127.0.0.1:50001`
    Tcp(String),
}

impl FromStr for Endpoint {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some(("unix", path)) if !path.is_empty() => Ok(Self::Unix(PathBuf::from(path))),
            Some(("tcp", addr)) if addr.contains(':') => Ok(Self::Tcp(addr.to_string())),
            _ => Err(WatchError::Telemetry(format!(
                "invalid endpoint '{s}' (expected unix:<path> or tcp:<host:port>)"
            ))),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
            Self::Tcp(addr)  => write!(f, "tcp:{addr}"),
        }
    }
}

/// Vehicle telemetry client.
///
/// Connects to the feed and streams typed measurements onto one channel per
/// kind.  Automatically reconnects if the connection drops.
#[derive(Debug, Clone)]
pub struct TelemetrySource {
    endpoint:  Endpoint,
    reconnect: Duration,
}

impl TelemetrySource {
    pub fn new(endpoint: Endpoint, reconnect: Duration) -> Self {
        Self { endpoint, reconnect }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Spawn a background task that reads the feed and forwards measurements
    /// on the returned channels.  The task ends once every receiver is dropped.
    pub fn spawn_listener(self, capacity: usize) -> MeasurementChannels {
        let (senders, channels) = MeasurementChannels::new(capacity);
        tokio::spawn(async move { self.run(senders).await });
        channels
    }

    /// Connect, pump, and reconnect until the consumer goes away.
    pub async fn run(self, senders: MeasurementSenders) {
        loop {
            match self.connect_and_pump(&senders).await {
                Ok(()) => warn!(
                    "Telemetry feed {} closed; reconnecting in {}s",
                    self.endpoint,
                    self.reconnect.as_secs()
                ),
                Err(WatchError::ChannelClosed(_)) => return,
                Err(e) => error!(
                    "Telemetry feed {} failed: {e}; retrying in {}s",
                    self.endpoint,
                    self.reconnect.as_secs()
                ),
            }

            if senders.is_closed() {
                return; // all receivers dropped
            }
            tokio::time::sleep(self.reconnect).await;
        }
    }

    async fn connect_and_pump(&self, senders: &MeasurementSenders) -> Result<()> {
        match &self.endpoint {
            Endpoint::Unix(path) => {
                let stream = UnixStream::connect(path).await?;
                info!("Connected to telemetry feed {}", self.endpoint);
                pump(BufReader::new(stream), senders).await
            }
            Endpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str()).await?;
                info!("Connected to telemetry feed {}", self.endpoint);
                pump(BufReader::new(stream), senders).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn parse_endpoints() {
        assert_eq!(
            "unix:/run/openxc/vehicle.sock".parse::<Endpoint>().unwrap(),
            Endpoint::Unix(PathBuf::from("/run/openxc/vehicle.sock"))
        );
        assert_eq!(
            "tcp:127.0.0.1:50001".parse::<Endpoint>().unwrap(),
            Endpoint::Tcp("127.0.0.1:50001".into())
        );
        assert!("tcp:localhost".parse::<Endpoint>().is_err());
        assert!("serial:/dev/ttyUSB0".parse::<Endpoint>().is_err());
        assert!("unix:".parse::<Endpoint>().is_err());
    }

    #[tokio::test]
    async fn listener_streams_from_tcp_feed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket
                .write_all(b"{\"name\":\"windshield_wiper_status\",\"value\":true}\n")
                .await
                .unwrap();
        });

        let source = TelemetrySource::new(
            Endpoint::Tcp(addr.to_string()),
            Duration::from_millis(50),
        );
        let mut channels = source.spawn_listener(4);
        assert_eq!(channels.wipers.recv().await, Some(true));
    }
}
