use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything that carries a single numeric quantity.
///
/// [`DedupHistory`](crate::history::DedupHistory) only ever looks at
/// [`Reading::value`]; every other attribute of the reading is opaque to it.
pub trait Reading {
    fn value(&self) -> f64;
}

impl Reading for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

/// Vehicle latitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Latitude(pub f64);

/// Vehicle longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Longitude(pub f64);

impl Reading for Latitude {
    fn value(&self) -> f64 {
        self.0
    }
}

impl Reading for Longitude {
    fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Latitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°", self.0)
    }
}

impl fmt::Display for Longitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°", self.0)
    }
}
