//! vwatch — watches a vehicle telemetry feed and reports when the wipers and
//! headlamps come on together.
//!
//! Run with:  `RUST_LOG=info vwatch [path/to/vwatch.toml]`

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vw_config::{default_path, ConfigWatcher, ReportConfig};
use vw_notify::{DesktopNotifier, FanOut, LogNotifier};
use vw_session::Session;
use vw_telemetry::{Endpoint, TelemetrySource};

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("vwatch v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_path);
    let config = vw_config::load(&config_path)?;

    let endpoint: Endpoint = config
        .telemetry
        .endpoint
        .parse()
        .context("bad [telemetry] endpoint")?;
    let source = TelemetrySource::new(
        endpoint,
        Duration::from_secs(config.telemetry.reconnect_secs),
    );
    info!("Reading telemetry from {}", source.endpoint());
    let channels = source.spawn_listener(config.telemetry.channel_capacity);

    let (handle, mut session) = Session::new(config.report.clone(), notifier(&config.report))
        .spawn(channels);

    let (_watcher, mut reloads) = ConfigWatcher::spawn(&config_path);
    let reload_handle = handle.clone();
    tokio::spawn(async move {
        while let Some(cfg) = reloads.recv().await {
            if reload_handle.reload(cfg.report).await.is_err() {
                break; // session ended
            }
        }
    });

    let state = tokio::select! {
        res = &mut session => res??,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted; shutting down");
            if let Err(e) = handle.shutdown().await {
                warn!("Session already stopped: {e}");
            }
            session.await??
        }
    };

    let status = serde_json::to_string(&state.snapshot())?;
    info!("Final status: {status}");
    Ok(())
}

/// Notifiers are fixed at startup; a reload only changes report wording.
fn notifier(report: &ReportConfig) -> FanOut {
    let fan = FanOut::new().with(LogNotifier);
    if report.desktop {
        fan.with(DesktopNotifier::spawn(report.app_name.clone(), report.timeout_ms))
    } else {
        fan
    }
}
