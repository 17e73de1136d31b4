use crate::reading::{Latitude, Longitude};
use std::fmt;

/// The measurement streams the daemon subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    Wipers,
    Headlamps,
    Latitude,
    Longitude,
}

impl MeasurementKind {
    /// OpenXC signal name for this stream.
    pub fn signal_name(self) -> &'static str {
        match self {
            Self::Wipers    => "windshield_wiper_status",
            Self::Headlamps => "headlamp_status",
            Self::Latitude  => "latitude",
            Self::Longitude => "longitude",
        }
    }

    pub fn from_signal_name(name: &str) -> Option<Self> {
        match name {
            "windshield_wiper_status" => Some(Self::Wipers),
            "headlamp_status"         => Some(Self::Headlamps),
            "latitude"                => Some(Self::Latitude),
            "longitude"               => Some(Self::Longitude),
            _ => None,
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signal_name())
    }
}

/// One sample from the vehicle telemetry feed.
///
/// Sources:
/// - telemetry listener → every variant
/// - tests              → hand-built samples
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    /// Windshield wipers on/off.
    Wipers(bool),
    /// Headlamps on/off.
    Headlamps(bool),
    Latitude(Latitude),
    Longitude(Longitude),
    /// A signal the daemon does not track (carries the signal name or raw line).
    Unknown(String),
}

impl Measurement {
    pub fn kind(&self) -> Option<MeasurementKind> {
        match self {
            Self::Wipers(_)    => Some(MeasurementKind::Wipers),
            Self::Headlamps(_) => Some(MeasurementKind::Headlamps),
            Self::Latitude(_)  => Some(MeasurementKind::Latitude),
            Self::Longitude(_) => Some(MeasurementKind::Longitude),
            Self::Unknown(_)   => None,
        }
    }
}
