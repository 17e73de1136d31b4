use thiserror::Error;

/// Top-level error type used across the entire workspace.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("config error: {0}")]
    Config(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("notify error: {0}")]
    Notify(String),

    /// Strict history access before both slots hold a reading.
    #[error("history holds fewer than two readings")]
    EmptyHistory,

    #[error("{0} channel closed")]
    ChannelClosed(&'static str),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = WatchError> = std::result::Result<T, E>;
