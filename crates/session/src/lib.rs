//! The single consumer of all vehicle measurements.
//!
//! Owns [`AppState`]: the flag pair, both coordinate histories, and the
//! disaster detector.  Producers only ever send messages; nothing else
//! touches the state.

pub mod handle;

pub use handle::{Control, SessionHandle};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vw_config::ReportConfig;
use vw_core::{AppState, Edge, Latitude, Longitude, Result};
use vw_notify::{Notifier, Report};
use vw_telemetry::MeasurementChannels;

/// Control channel depth.
const CONTROL_CAPACITY: usize = 8;

/// Measurements handled back to back before the control channel is checked.
pub const CONTROL_EVERY: usize = 64;

pub struct Session {
    state:    AppState,
    report:   ReportConfig,
    notifier: Box<dyn Notifier>,
}

impl Session {
    pub fn new(report: ReportConfig, notifier: impl Notifier + 'static) -> Self {
        Self {
            state: AppState::default(),
            report,
            notifier: Box::new(notifier),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the loop on a new task.  Returns the control handle and the task,
    /// which yields the final state once the session ends.
    pub fn spawn(self, channels: MeasurementChannels) -> (SessionHandle, JoinHandle<Result<AppState>>) {
        let (handle, control) = SessionHandle::channel(CONTROL_CAPACITY);
        let task = tokio::spawn(self.run(channels, control));
        (handle, task)
    }

    /// Drain measurements and control messages until shutdown, or until every
    /// measurement channel has closed.
    ///
    /// Measurements take priority over control messages, so a query sent
    /// after a measurement was queued observes it.  Under a saturated feed the
    /// control channel is still checked after every [`CONTROL_EVERY`]
    /// measurements.
    pub async fn run(
        mut self,
        mut channels: MeasurementChannels,
        mut control: mpsc::Receiver<Control>,
    ) -> Result<AppState> {
        let mut wipers_open     = true;
        let mut headlamps_open  = true;
        let mut latitudes_open  = true;
        let mut longitudes_open = true;
        let mut control_open    = true;
        let mut burst           = 0usize;

        info!("Session started");

        while wipers_open || headlamps_open || latitudes_open || longitudes_open {
            if burst >= CONTROL_EVERY {
                burst = 0;
                if control_open {
                    match control.try_recv() {
                        Ok(Control::Shutdown) => return Ok(self.shutdown()),
                        Ok(cmd) => self.on_control(cmd),
                        Err(TryRecvError::Empty) => {}
                        Err(TryRecvError::Disconnected) => control_open = false,
                    }
                }
            }

            tokio::select! {
                biased;

                msg = channels.wipers.recv(), if wipers_open => match msg {
                    Some(on) => { burst += 1; self.on_wipers(on) }
                    None => wipers_open = false,
                },
                msg = channels.headlamps.recv(), if headlamps_open => match msg {
                    Some(on) => { burst += 1; self.on_headlamps(on) }
                    None => headlamps_open = false,
                },
                msg = channels.latitudes.recv(), if latitudes_open => match msg {
                    Some(lat) => { burst += 1; self.on_latitude(lat) }
                    None => latitudes_open = false,
                },
                msg = channels.longitudes.recv(), if longitudes_open => match msg {
                    Some(lon) => { burst += 1; self.on_longitude(lon) }
                    None => longitudes_open = false,
                },
                msg = control.recv(), if control_open => {
                    burst = 0;
                    match msg {
                        Some(Control::Shutdown) => return Ok(self.shutdown()),
                        Some(cmd) => self.on_control(cmd),
                        None => control_open = false,
                    }
                }
            }
        }

        info!("All measurement channels closed; session ending");
        Ok(self.state)
    }

    fn shutdown(self) -> AppState {
        info!("Session shutdown requested");
        self.state
    }

    // Every flag sample re-runs the detector so a pending report is retried
    // while the condition holds; `Notified` keeps repeats quiet.
    fn on_wipers(&mut self, on: bool) {
        if self.state.set_wipers(on) {
            info!(on, "Windshield wipers changed");
        }
        self.check_disaster();
    }

    fn on_headlamps(&mut self, on: bool) {
        if self.state.set_headlamps(on) {
            info!(on, "Headlamps changed");
        }
        self.check_disaster();
    }

    fn on_latitude(&mut self, lat: Latitude) {
        if self.state.add_latitude(lat) {
            debug!("New latitude {lat}");
            self.log_position();
        }
    }

    fn on_longitude(&mut self, lon: Longitude) {
        if self.state.add_longitude(lon) {
            debug!("New longitude {lon}");
            self.log_position();
        }
    }

    fn on_control(&mut self, cmd: Control) {
        match cmd {
            Control::Query(reply) => {
                let _ = reply.send(self.state.snapshot());
            }
            Control::ConfigReloaded(report) => {
                info!(device_id = report.device_id, "Report settings reloaded");
                self.report = report;
            }
            Control::Shutdown => {}
        }
    }

    fn check_disaster(&mut self) {
        let Some(Edge::Raised) = self.state.evaluate_disaster() else {
            return;
        };

        let report = Report::new(self.report.device_id, self.report.disaster_message.as_str());
        match self.notifier.notify(&report) {
            Ok(()) => {
                self.state.detector.acknowledge();
                info!("Disaster reported: {report}");
            }
            Err(e) => warn!(
                "Disaster report not delivered; retrying on the next wiper or headlamp sample: {e}"
            ),
        }
    }

    fn log_position(&self) {
        if let Some((lat, lon)) = self.state.position() {
            debug!("Position {lat}, {lon}");
        }
    }
}
