//! Error types for the dispatch pipeline

use super::log_level::LogLevel;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Sink reported a failure while writing a rendered line
    #[error(
        "Unable to write {level} log to sink '{sink}' \
         (permission denied, disk full or sink not writable): {source}"
    )]
    WriteFailed {
        sink: String,
        level: LogLevel,
        #[source]
        source: std::io::Error,
    },

    /// File output requested for a level that has no file sink
    #[error("Log file for [{level}] has not been configured but [TO_FILE] is enabled [Logger ID: {logger}]")]
    MissingFileSink { logger: String, level: LogLevel },

    /// Sink reported a failure while flushing
    #[error("Failed to flush sink '{sink}': {source}")]
    FlushFailed {
        sink: String,
        #[source]
        source: std::io::Error,
    },

    /// Records were still queued after a synchronous drain
    #[error("Dispatch queue not empty after drain: {remaining} records remaining")]
    QueueNotEmpty { remaining: usize },

    /// Record logged after the dispatch queue was closed, with nowhere to go
    #[error("Dispatch queue closed, {level} record from logger '{logger}' dropped")]
    QueueClosed { logger: String, level: LogLevel },

    /// Background worker thread could not be spawned
    #[error("Failed to spawn dispatch worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// Background worker thread panicked
    #[error("Dispatch worker thread panicked: {0}")]
    WorkerPanicked(String),

    /// Background worker thread did not finish in time
    #[error("Dispatch worker thread did not stop within {0:?}")]
    StopTimeout(Duration),

    /// A sink or formatter panicked while handling a record
    #[error("{component} panicked while handling a record: {message}")]
    HandlerPanicked { component: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatchError {
    /// Create a write failure error
    pub fn write_failed(sink: impl Into<String>, level: LogLevel, source: std::io::Error) -> Self {
        DispatchError::WriteFailed {
            sink: sink.into(),
            level,
            source,
        }
    }

    /// Create a missing file sink error
    pub fn missing_file_sink(logger: impl Into<String>, level: LogLevel) -> Self {
        DispatchError::MissingFileSink {
            logger: logger.into(),
            level,
        }
    }

    /// Create a flush failure error
    pub fn flush_failed(sink: impl Into<String>, source: std::io::Error) -> Self {
        DispatchError::FlushFailed {
            sink: sink.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        DispatchError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn handler_panicked(component: impl Into<String>, message: impl Into<String>) -> Self {
        DispatchError::HandlerPanicked {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether this error comes from how the logger or dispatcher was set up,
    /// rather than from a sink failing at runtime
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DispatchError::MissingFileSink { .. } | DispatchError::InvalidConfiguration { .. }
        )
    }
}
