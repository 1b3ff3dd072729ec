//! Logging macros with `format!`-style arguments.
//!
//! Formatting happens on the calling thread, before the record is captured;
//! only the finished message crosses over to the dispatch worker.
//!
//! # Examples
//!
//! ```
//! use log_dispatch::prelude::*;
//! use log_dispatch::info;
//!
//! let logger = Logger::builder("default").build();
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at the given level.
///
/// ```
/// # use log_dispatch::prelude::*;
/// # let logger = Logger::builder("default").build();
/// use log_dispatch::log;
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $logger.is_enabled(level) {
            $logger.log(level, format!($($arg)+))
        }
    }};
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message. Does not abort the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemorySink;
    use crate::core::{shared, LogLevel, Logger, LoggingFlags, RecordHandler, SyncDispatchCallback};
    use std::sync::Arc;

    fn capturing_logger(min_level: LogLevel) -> (Logger, MemorySink) {
        let console = MemorySink::new("console");
        let handler = RecordHandler::new(Arc::new(LoggingFlags::new()), shared(console.clone()));
        let logger = Logger::builder("macros")
            .min_level(min_level)
            .dispatcher(Arc::new(SyncDispatchCallback::new(handler)))
            .build();
        (logger, console)
    }

    #[test]
    fn test_log_macro_formats_arguments() {
        let (logger, console) = capturing_logger(LogLevel::Info);
        log!(logger, LogLevel::Error, "Error code: {}, message: {}", 500, "Internal error");

        assert!(console.contents().contains("Error code: 500, message: Internal error"));
    }

    #[test]
    fn test_level_macros() {
        let (logger, console) = capturing_logger(LogLevel::Trace);
        trace!(logger, "t {}", 1);
        debug!(logger, "d {}", 2);
        info!(logger, "i {}", 3);
        warn!(logger, "w {}", 4);
        error!(logger, "e {}", 5);
        fatal!(logger, "f {}", 6);

        let lines = console.lines();
        assert_eq!(lines.len(), 6);
        for (line, level) in lines.iter().zip(LogLevel::ALL) {
            assert!(line.contains(level.to_str()), "{} missing in {}", level, line);
        }
    }

    #[test]
    fn test_filtered_level_skips_formatting() {
        struct Explodes;
        impl std::fmt::Display for Explodes {
            fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                panic!("formatted a filtered message");
            }
        }

        let (logger, console) = capturing_logger(LogLevel::Warn);
        debug!(logger, "{}", Explodes);
        assert!(console.lines().is_empty());
    }
}
