//! Dispatch worker configuration

use super::error::{DispatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pause after each record while draining, so producers get the queue lock
pub const DEFAULT_INTRA_DRAIN_PAUSE: Duration = Duration::from_micros(100);

/// Pause once the queue is observed empty, before checking again
pub const DEFAULT_IDLE_PAUSE: Duration = Duration::from_micros(500);

/// Default shutdown timeout when stopping the worker (5 seconds)
///
/// Used when the worker is dropped without an explicit `stop_and_join`.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Whole microseconds in `d`, saturating at `u64::MAX`. A non-zero duration
/// never becomes zero.
fn whole_micros(d: Duration) -> u64 {
    match u64::try_from(d.as_micros()).unwrap_or(u64::MAX) {
        0 if !d.is_zero() => 1,
        us => us,
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`. A non-zero duration
/// never becomes zero.
fn whole_millis(d: Duration) -> u64 {
    match u64::try_from(d.as_millis()).unwrap_or(u64::MAX) {
        0 if !d.is_zero() => 1,
        ms => ms,
    }
}

/// Tunables for the background dispatch worker
///
/// Loadable from JSON; missing fields take their defaults.
///
/// # Example
///
/// ```
/// use log_dispatch::DispatchConfig;
/// use std::time::Duration;
///
/// let config = DispatchConfig::from_json_str(r#"{ "idle_pause_us": 2000 }"#).unwrap();
/// assert_eq!(config.idle_pause(), Duration::from_millis(2));
/// assert!(config.immediate_flush);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub intra_drain_pause_us: u64,
    pub idle_pause_us: u64,
    /// Sets `ImmediateFlush` on the shared flags when the worker starts
    pub immediate_flush: bool,
    pub colored_terminal_output: bool,
    pub thread_name: String,
    pub shutdown_timeout_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            intra_drain_pause_us: whole_micros(DEFAULT_INTRA_DRAIN_PAUSE),
            idle_pause_us: whole_micros(DEFAULT_IDLE_PAUSE),
            immediate_flush: true,
            colored_terminal_output: false,
            thread_name: "log-dispatch".to_string(),
            shutdown_timeout_ms: whole_millis(DEFAULT_SHUTDOWN_TIMEOUT),
        }
    }
}

impl DispatchConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.idle_pause_us == 0 {
            return Err(DispatchError::config(
                "DispatchConfig",
                "idle_pause_us must be greater than zero",
            ));
        }
        if self.thread_name.is_empty() || self.thread_name.contains('\0') {
            return Err(DispatchError::config(
                "DispatchConfig",
                format!("invalid worker thread name '{}'", self.thread_name.escape_debug()),
            ));
        }
        Ok(())
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_intra_drain_pause(mut self, pause: Duration) -> Self {
        self.intra_drain_pause_us = whole_micros(pause);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_idle_pause(mut self, pause: Duration) -> Self {
        self.idle_pause_us = whole_micros(pause);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_immediate_flush(mut self, enabled: bool) -> Self {
        self.immediate_flush = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_colored_terminal_output(mut self, enabled: bool) -> Self {
        self.colored_terminal_output = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout_ms = whole_millis(timeout);
        self
    }

    #[inline]
    pub fn intra_drain_pause(&self) -> Duration {
        Duration::from_micros(self.intra_drain_pause_us)
    }

    #[inline]
    pub fn idle_pause(&self) -> Duration {
        Duration::from_micros(self.idle_pause_us)
    }

    #[inline]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.intra_drain_pause(), Duration::from_micros(100));
        assert_eq!(config.idle_pause(), Duration::from_micros(500));
        assert_eq!(config.shutdown_timeout(), DEFAULT_SHUTDOWN_TIMEOUT);
        assert!(config.immediate_flush);
        assert!(!config.colored_terminal_output);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = DispatchConfig::from_json_str(
            r#"{ "intra_drain_pause_us": 0, "thread_name": "audit-dispatch" }"#,
        )
        .unwrap();
        assert_eq!(config.intra_drain_pause(), Duration::ZERO);
        assert_eq!(config.thread_name, "audit-dispatch");
        assert_eq!(config.idle_pause(), DEFAULT_IDLE_PAUSE);
    }

    #[test]
    fn test_zero_idle_pause_rejected() {
        let err = DispatchConfig::from_json_str(r#"{ "idle_pause_us": 0 }"#).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = DispatchConfig::from_json_str("{ idle_pause_us: ").unwrap_err();
        assert!(matches!(err, DispatchError::Json(_)));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatch.json");
        std::fs::write(&path, r#"{ "colored_terminal_output": true }"#).unwrap();

        let config = DispatchConfig::from_json_file(&path).unwrap();
        assert!(config.colored_terminal_output);
    }

    #[test]
    fn test_builder_methods() {
        let config = DispatchConfig::new()
            .with_idle_pause(Duration::from_millis(1))
            .with_intra_drain_pause(Duration::ZERO)
            .with_immediate_flush(false)
            .with_shutdown_timeout(Duration::from_secs(1));
        assert_eq!(config.idle_pause_us, 1000);
        assert_eq!(config.intra_drain_pause_us, 0);
        assert!(!config.immediate_flush);
        assert_eq!(config.shutdown_timeout_ms, 1000);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let config = DispatchConfig::new()
            .with_idle_pause(Duration::MAX)
            .with_shutdown_timeout(Duration::MAX);
        assert_eq!(config.idle_pause_us, u64::MAX);
        assert_eq!(config.shutdown_timeout_ms, u64::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sub_unit_durations_round_up() {
        let config = DispatchConfig::new()
            .with_idle_pause(Duration::from_nanos(300))
            .with_shutdown_timeout(Duration::from_micros(20));
        assert_eq!(config.idle_pause_us, 1);
        assert_eq!(config.shutdown_timeout_ms, 1);
        assert!(config.validate().is_ok());
    }
}
