//! Bridge from the `log` crate facade into a dispatch [`Logger`]
//!
//! Lets libraries that log through `log::info!` and friends feed the same
//! pipeline as the application's own logger.

use crate::core::{DispatchError, LogLevel, Logger, Result};
use std::sync::Arc;

pub struct FacadeLogger {
    logger: Arc<Logger>,
}

impl FacadeLogger {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Install as the process-wide `log` backend. Fails when another backend
    /// is already installed.
    ///
    /// The `log` max level is opened to `Trace`; filtering happens against the
    /// logger's current minimum level, so a later
    /// [`Logger::set_min_level`] takes effect for facade calls too.
    pub fn install(logger: Arc<Logger>) -> Result<()> {
        log::set_boxed_logger(Box::new(Self::new(logger)))
            .map_err(|e| DispatchError::config("log facade", e.to_string()))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for FacadeLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.is_enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = LogLevel::from(record.level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let message = match record.module_path() {
            Some(module) if module != record.target() => {
                format!("{} [{}] {}", record.target(), module, record.args())
            }
            _ => format!("{} {}", record.target(), record.args()),
        };
        self.logger.log(level, message);
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush through log facade: {}", e);
        }
    }
}
