use crate::disaster::{DisasterDetector, DisasterState, Edge};
use crate::history::DedupHistory;
use crate::reading::{Latitude, Longitude};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Everything the session knows about the vehicle. Owned by a single task.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Last reported wiper state, `None` until the first sample.
    pub wipers: Option<bool>,
    /// Last reported headlamp state, `None` until the first sample.
    pub headlamps: Option<bool>,
    pub latitudes: DedupHistory<Latitude>,
    pub longitudes: DedupHistory<Longitude>,
    pub detector: DisasterDetector,
    /// Local time of the last accepted change of any kind.
    pub last_update: Option<DateTime<Local>>,
}

impl AppState {
    /// Store a wiper sample. Returns `true` if the value changed.
    pub fn set_wipers(&mut self, on: bool) -> bool {
        let changed = replace_flag(&mut self.wipers, on);
        self.touch(changed)
    }

    /// Store a headlamp sample. Returns `true` if the value changed.
    pub fn set_headlamps(&mut self, on: bool) -> bool {
        let changed = replace_flag(&mut self.headlamps, on);
        self.touch(changed)
    }

    pub fn add_latitude(&mut self, lat: Latitude) -> bool {
        let accepted = self.latitudes.add(lat);
        self.touch(accepted)
    }

    pub fn add_longitude(&mut self, lon: Longitude) -> bool {
        let accepted = self.longitudes.add(lon);
        self.touch(accepted)
    }

    /// Run the disaster detector against the current flags.
    pub fn evaluate_disaster(&mut self) -> Option<Edge> {
        self.detector.evaluate(self.wipers, self.headlamps)
    }

    /// Newest known position, once both axes have reported.
    pub fn position(&self) -> Option<(Latitude, Longitude)> {
        Some((*self.latitudes.newest()?, *self.longitudes.newest()?))
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            wipers:     self.wipers,
            headlamps:  self.headlamps,
            latitudes:  self.latitudes.elements(),
            longitudes: self.longitudes.elements(),
            disaster:   self.detector.state() != DisasterState::Idle,
            last_update: self.last_update,
        }
    }

    fn touch(&mut self, changed: bool) -> bool {
        if changed {
            self.last_update = Some(Local::now());
        }
        changed
    }
}

fn replace_flag(slot: &mut Option<bool>, value: bool) -> bool {
    let changed = *slot != Some(value);
    *slot = Some(value);
    changed
}

/// A read-only copy of [`AppState`] for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub wipers: Option<bool>,
    pub headlamps: Option<bool>,
    /// Last two distinct latitudes, oldest first.
    pub latitudes: [Option<f64>; 2],
    /// Last two distinct longitudes, oldest first.
    pub longitudes: [Option<f64>; 2],
    /// `true` while the wipers-and-headlamps condition holds.
    pub disaster: bool,
    pub last_update: Option<DateTime<Local>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_flags_are_not_changes() {
        let mut state = AppState::default();
        assert!(state.set_wipers(true));
        assert!(!state.set_wipers(true));
        assert!(state.set_wipers(false));
        assert!(state.last_update.is_some());
    }

    #[test]
    fn position_needs_both_axes() {
        let mut state = AppState::default();
        state.add_latitude(Latitude(42.29));
        assert_eq!(state.position(), None);
        state.add_longitude(Longitude(-83.71));
        assert_eq!(state.position(), Some((Latitude(42.29), Longitude(-83.71))));
    }

    #[test]
    fn snapshot_reflects_detector() {
        let mut state = AppState::default();
        state.set_wipers(true);
        state.set_headlamps(true);
        assert!(state.evaluate_disaster().is_some());
        let snap = state.snapshot();
        assert!(snap.disaster);
        assert_eq!(snap.latitudes, [None, None]);
    }
}
