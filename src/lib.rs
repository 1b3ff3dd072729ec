//! # log_dispatch
//!
//! Asynchronous log dispatch: application threads capture log records into a
//! shared queue without touching I/O, and a single background worker drains
//! the queue, renders each record and writes it to file and console sinks.
//!
//! ## Features
//!
//! - **Non-blocking capture**: producers only take a short queue lock
//! - **Single consumer**: one worker thread owns all sink writes
//! - **Drain on shutdown**: pending records are flushed before the worker stops
//! - **Per-level routing**: file and standard output per level, with flush thresholds
//! - **`log` facade**: libraries using `log::info!` feed the same pipeline
//!
//! ## Example
//!
//! ```no_run
//! use log_dispatch::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut dispatch = AsyncDispatch::start(DispatchConfig::default())?;
//!     let logger = dispatch
//!         .install(Logger::builder("app"))
//!         .file(LogLevel::Error, shared(FileSink::new("errors.log")?))
//!         .build();
//!
//!     logger.info("service started");
//!     logger.error("upstream timed out");
//!
//!     dispatch.shutdown()
//! }
//! ```

pub mod appenders;
pub mod core;
pub mod facade;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleSink, FileSink, MemorySink};
    pub use crate::core::{
        shared, AsyncDispatch, AsyncDispatchBuilder, AsyncDispatchCallback, DispatchAction,
        DispatchCallback, DispatchConfig, DispatchError, DispatchMetrics, DispatchQueue,
        DispatchWorker, LevelSettings, LogBuilder, LogLevel, LogRecord, Logger, LoggerBuilder,
        LoggerCore, LoggingFlag, LoggingFlags, OutputFormat, PatternLogBuilder, RecordHandler, Result,
        SharedSink, Sink, SyncDispatchCallback, TimestampFormat, WorkerState,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::facade::FacadeLogger;
}

pub use appenders::{ConsoleSink, FileSink, MemorySink};
pub use core::{
    shared, AsyncDispatch, AsyncDispatchBuilder, AsyncDispatchCallback, DiagnosticHook,
    DispatchAction, DispatchCallback, DispatchConfig, DispatchData, DispatchError,
    DispatchMetrics, DispatchQueue, DispatchWorker, LevelSettings, LogBuilder, LogLevel,
    LogRecord, Logger, LoggerBuilder, LoggerCore, LoggingFlag, LoggingFlags, OutputFormat,
    PatternLogBuilder, RecordHandler, Result, SharedSink, Sink, SyncDispatchCallback,
    TimestampFormat, WorkerState, DEFAULT_IDLE_PAUSE, DEFAULT_INTRA_DRAIN_PAUSE,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use facade::FacadeLogger;
