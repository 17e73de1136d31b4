use serde::Deserialize;
use vw_core::{Latitude, Longitude, Measurement, MeasurementKind};

/// JSON shape of one OpenXC measurement line,
/// e.g. `{"name": "latitude", "value": 42.29, "timestamp": 1351181673.4}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMeasurement {
    pub name:  String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Parse a raw feed line into a typed [`Measurement`].
///
/// Malformed JSON, unknown signal names, and values of the wrong type all
/// come back as [`Measurement::Unknown`]; the feed is never fatal.
pub fn parse_measurement(line: &str) -> Measurement {
    let raw: RawMeasurement = match serde_json::from_str(line.trim()) {
        Ok(raw) => raw,
        Err(_) => return Measurement::Unknown(line.to_string()),
    };

    let Some(kind) = MeasurementKind::from_signal_name(&raw.name) else {
        return Measurement::Unknown(raw.name);
    };

    let parsed = match kind {
        MeasurementKind::Wipers    => raw.value.as_bool().map(Measurement::Wipers),
        MeasurementKind::Headlamps => raw.value.as_bool().map(Measurement::Headlamps),
        MeasurementKind::Latitude  => raw.value.as_f64().map(|v| Measurement::Latitude(Latitude(v))),
        MeasurementKind::Longitude => raw.value.as_f64().map(|v| Measurement::Longitude(Longitude(v))),
    };

    parsed.unwrap_or(Measurement::Unknown(raw.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wiper_status() {
        let m = parse_measurement(r#"{"name": "windshield_wiper_status", "value": true}"#);
        assert_eq!(m, Measurement::Wipers(true));
    }

    #[test]
    fn parse_headlamp_with_timestamp() {
        let m = parse_measurement(
            r#"{"name":"headlamp_status","value":false,"timestamp":1351181673.4}"#,
        );
        assert_eq!(m, Measurement::Headlamps(false));
    }

    #[test]
    fn parse_coordinates() {
        assert_eq!(
            parse_measurement(r#"{"name":"latitude","value":42.292834}"#),
            Measurement::Latitude(Latitude(42.292834))
        );
        assert_eq!(
            parse_measurement(r#"{"name":"longitude","value":-83}"#),
            Measurement::Longitude(Longitude(-83.0))
        );
    }

    #[test]
    fn wrong_value_type_is_unknown() {
        let m = parse_measurement(r#"{"name":"latitude","value":"north"}"#);
        assert_eq!(m, Measurement::Unknown("latitude".into()));
    }

    #[test]
    fn untracked_signal_is_unknown() {
        let m = parse_measurement(r#"{"name":"vehicle_speed","value":42.0}"#);
        assert_eq!(m, Measurement::Unknown("vehicle_speed".into()));
    }

    #[test]
    fn garbage_is_unknown() {
        assert!(matches!(parse_measurement("not json"), Measurement::Unknown(_)));
    }
}
