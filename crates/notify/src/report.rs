use chrono::{DateTime, Local};
use std::fmt;

/// A status message bound for the outside world.
///
/// Displays as the wire text `id:<device_id>;<body>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub device_id: u32,
    pub body: String,
    pub at: DateTime<Local>,
}

impl Report {
    pub fn new(device_id: u32, body: impl Into<String>) -> Self {
        Self {
            device_id,
            body: body.into(),
            at: Local::now(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{};{}", self.device_id, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_text() {
        assert_eq!(Report::new(1, "disaster dude!").to_string(), "id:1;disaster dude!");
    }
}
