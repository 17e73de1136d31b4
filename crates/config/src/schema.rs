use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `vwatch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Where the vehicle feed comes from.
    pub telemetry: TelemetryConfig,
    /// How detected conditions are reported.
    pub report: ReportConfig,
}

/// Vehicle telemetry feed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `unix:<path>` or `tcp:<host:port>`.
    pub endpoint: String,
    /// Delay before reconnecting after the feed drops.
    pub reconnect_secs: u64,
    /// Buffer size of each per-measurement channel.
    pub channel_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint:         "unix:/run/openxc/vehicle.sock".to_string(),
            reconnect_secs:   2,
            channel_capacity: 32,
        }
    }
}

/// Report settings.  Live-reloadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Identifier prefixed to every report (`id:<device_id>;...`).
    pub device_id: u32,
    /// Body of the report sent when wipers and headlamps turn on together.
    pub disaster_message: String,
    /// Also raise a desktop notification over D-Bus.
    pub desktop: bool,
    /// Application name shown by the notification daemon.
    pub app_name: String,
    /// Desktop notification timeout in milliseconds (-1 = server default).
    pub timeout_ms: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            device_id:        1,
            disaster_message: "disaster dude!".to_string(),
            desktop:          false,
            app_name:         "vwatch".to_string(),
            timeout_ms:       5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sections_fill_defaults() {
        let cfg: WatchConfig = toml::from_str(
            r#"
            [telemetry]
            endpoint = "tcp:127.0.0.1:50001"

            [report]
            device_id = 7
            "#,
        )
        .unwrap();

        assert_eq!(cfg.telemetry.endpoint, "tcp:127.0.0.1:50001");
        assert_eq!(cfg.telemetry.channel_capacity, 32);
        assert_eq!(cfg.report.device_id, 7);
        assert_eq!(cfg.report.disaster_message, "disaster dude!");
        assert!(!cfg.report.desktop);
    }

    #[test]
    fn empty_document_is_default() {
        let cfg: WatchConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, WatchConfig::default());
    }
}
