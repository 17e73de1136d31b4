pub mod schema;
pub mod watcher;

pub use schema::{ReportConfig, TelemetryConfig, WatchConfig};
pub use watcher::ConfigWatcher;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use vw_core::{Result, WatchError};

/// Read `vwatch.toml`.  A missing file is not an error: the daemon falls back
/// to the local OpenXC socket and the stock disaster message.
pub fn load(path: impl AsRef<Path>) -> Result<WatchConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!("No config at '{}'; watching the default feed.", path.display());
        return Ok(WatchConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| WatchError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse `vwatch.toml` contents.  Missing sections and keys keep their defaults.
pub fn parse(raw: &str) -> Result<WatchConfig> {
    toml::from_str(raw).map_err(|e| WatchError::Config(format!("TOML parse error: {e}")))
}

/// `$XDG_CONFIG_HOME/vwatch/vwatch.toml`, or `~/.config/vwatch/vwatch.toml`.
pub fn default_path() -> PathBuf {
    config_home(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
        .join("vwatch")
        .join("vwatch.toml")
}

// An empty variable counts as unset.
fn config_home(xdg: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let set = |v: Option<OsString>| v.filter(|v| !v.is_empty()).map(PathBuf::from);
    set(xdg).unwrap_or_else(|| set(home).unwrap_or_else(|| PathBuf::from(".")).join(".config"))
}
