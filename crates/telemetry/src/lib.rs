pub mod channels;
pub mod client;
pub mod events;

pub use channels::{pump, MeasurementChannels, MeasurementSenders};
pub use client::{Endpoint, TelemetrySource};
pub use events::{parse_measurement, RawMeasurement};
