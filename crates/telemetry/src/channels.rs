//! One channel per measurement kind, fed by the telemetry reader.

use crate::events::parse_measurement;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;
use vw_core::{Latitude, Longitude, Measurement, Result, WatchError};

/// Producer half: routes each measurement onto the channel for its kind.
#[derive(Debug, Clone)]
pub struct MeasurementSenders {
    wipers:     mpsc::Sender<bool>,
    headlamps:  mpsc::Sender<bool>,
    latitudes:  mpsc::Sender<Latitude>,
    longitudes: mpsc::Sender<Longitude>,
}

/// Consumer half, drained by a single session loop.
#[derive(Debug)]
pub struct MeasurementChannels {
    pub wipers:     mpsc::Receiver<bool>,
    pub headlamps:  mpsc::Receiver<bool>,
    pub latitudes:  mpsc::Receiver<Latitude>,
    pub longitudes: mpsc::Receiver<Longitude>,
}

impl MeasurementChannels {
    /// Create the four channels, each buffering up to `capacity` samples.
    pub fn new(capacity: usize) -> (MeasurementSenders, Self) {
        let capacity = capacity.max(1);
        let (wipers_tx, wipers) = mpsc::channel(capacity);
        let (headlamps_tx, headlamps) = mpsc::channel(capacity);
        let (latitudes_tx, latitudes) = mpsc::channel(capacity);
        let (longitudes_tx, longitudes) = mpsc::channel(capacity);

        let senders = MeasurementSenders {
            wipers:     wipers_tx,
            headlamps:  headlamps_tx,
            latitudes:  latitudes_tx,
            longitudes: longitudes_tx,
        };
        let channels = Self { wipers, headlamps, latitudes, longitudes };
        (senders, channels)
    }
}

impl MeasurementSenders {
    /// Send one measurement to its channel.  Unknown measurements are dropped.
    ///
    /// # Errors
    /// [`WatchError::ChannelClosed`] when the consumer side is gone.
    pub async fn dispatch(&self, measurement: Measurement) -> Result<()> {
        match measurement {
            Measurement::Wipers(on) => self
                .wipers
                .send(on)
                .await
                .map_err(|_| WatchError::ChannelClosed("wipers")),
            Measurement::Headlamps(on) => self
                .headlamps
                .send(on)
                .await
                .map_err(|_| WatchError::ChannelClosed("headlamps")),
            Measurement::Latitude(lat) => self
                .latitudes
                .send(lat)
                .await
                .map_err(|_| WatchError::ChannelClosed("latitude")),
            Measurement::Longitude(lon) => self
                .longitudes
                .send(lon)
                .await
                .map_err(|_| WatchError::ChannelClosed("longitude")),
            Measurement::Unknown(name) => {
                debug!("Skipping untracked measurement: {name}");
                Ok(())
            }
        }
    }

    /// `true` once every consumer has been dropped.
    pub fn is_closed(&self) -> bool {
        self.wipers.is_closed()
            && self.headlamps.is_closed()
            && self.latitudes.is_closed()
            && self.longitudes.is_closed()
    }
}

/// Read line-delimited measurements from `reader` until EOF.
///
/// Lines are decoded lossily, so a corrupt (non-UTF-8) line turns into an
/// unknown measurement instead of ending the feed.
///
/// # Errors
/// I/O errors from the reader, or [`WatchError::ChannelClosed`] if the
/// consumer went away mid-stream.
pub async fn pump<R>(mut reader: R, senders: &MeasurementSenders) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }
        senders.dispatch(parse_measurement(&line)).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncWriteExt, BufReader};

    #[tokio::test]
    async fn dispatch_routes_by_kind() {
        let (tx, mut rx) = MeasurementChannels::new(4);

        tx.dispatch(Measurement::Wipers(true)).await.unwrap();
        tx.dispatch(Measurement::Latitude(Latitude(1.5))).await.unwrap();
        tx.dispatch(Measurement::Unknown("vehicle_speed".into())).await.unwrap();

        assert_eq!(rx.wipers.recv().await, Some(true));
        assert_eq!(rx.latitudes.recv().await, Some(Latitude(1.5)));
        assert!(rx.headlamps.try_recv().is_err());
        assert!(rx.longitudes.try_recv().is_err());
    }

    #[tokio::test]
    async fn dispatch_fails_once_consumer_dropped() {
        let (tx, rx) = MeasurementChannels::new(1);
        drop(rx);
        assert!(tx.is_closed());
        let err = tx.dispatch(Measurement::Headlamps(true)).await.unwrap_err();
        assert!(matches!(err, WatchError::ChannelClosed("headlamps")));
    }

    #[tokio::test]
    async fn pump_reads_until_eof() {
        let (tx, mut rx) = MeasurementChannels::new(8);
        let (mut client, server) = tokio::io::duplex(1024);

        client
            .write_all(
                b"{\"name\":\"headlamp_status\",\"value\":true}\n\
                  \n\
                  garbage\n\
                  {\"name\":\"longitude\",\"value\":-83.7}\n",
            )
            .await
            .unwrap();
        drop(client);

        pump(BufReader::new(server), &tx).await.unwrap();

        assert_eq!(rx.headlamps.recv().await, Some(true));
        assert_eq!(rx.longitudes.recv().await, Some(Longitude(-83.7)));
        assert!(rx.wipers.try_recv().is_err());
    }

    #[tokio::test]
    async fn pump_survives_invalid_utf8() {
        let (tx, mut rx) = MeasurementChannels::new(8);
        let feed: &[u8] = b"\xff\xfe garbage\n{\"name\":\"headlamp_status\",\"value\":true}\n";

        pump(BufReader::new(feed), &tx).await.unwrap();

        assert_eq!(rx.headlamps.recv().await, Some(true));
    }
}
