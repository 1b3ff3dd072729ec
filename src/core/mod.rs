//! Core dispatch types and traits

pub mod async_dispatch;
pub mod config;
pub mod diagnostics;
pub mod dispatch_callback;
pub mod dispatch_queue;
pub mod dispatch_worker;
pub mod error;
pub mod flags;
pub mod log_builder;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod record_handler;
pub mod sink;
pub mod timestamp;

pub use async_dispatch::{AsyncDispatch, AsyncDispatchBuilder};
pub use config::{
    DispatchConfig, DEFAULT_IDLE_PAUSE, DEFAULT_INTRA_DRAIN_PAUSE, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use diagnostics::{DiagnosticHook, Diagnostics};
pub use dispatch_callback::{AsyncDispatchCallback, DispatchCallback, SyncDispatchCallback};
pub use dispatch_queue::DispatchQueue;
pub use dispatch_worker::{DispatchWorker, WorkerState};
pub use error::{DispatchError, Result};
pub use flags::{LoggingFlag, LoggingFlags};
pub use log_builder::{LogBuilder, PatternLogBuilder};
pub use log_level::LogLevel;
pub use log_record::{DispatchAction, DispatchData, LogRecord};
pub use logger::{LevelSettings, Logger, LoggerBuilder, LoggerCore, LoggerCoreBuilder, TypedConfigurations};
pub use metrics::DispatchMetrics;
pub use output_format::OutputFormat;
pub use record_handler::RecordHandler;
pub use sink::{shared, SharedSink, Sink};
pub use timestamp::TimestampFormat;
