pub mod disaster;
pub mod error;
pub mod event;
pub mod history;
pub mod reading;
pub mod state;

pub use disaster::{DisasterDetector, DisasterState, Edge};
pub use error::{Result, WatchError};
pub use event::{Measurement, MeasurementKind};
pub use history::DedupHistory;
pub use reading::{Latitude, Longitude, Reading};
pub use state::{AppState, StatusSnapshot};
