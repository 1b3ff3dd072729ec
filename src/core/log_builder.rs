//! Formatter collaborator turning records into output lines

use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::output_format::OutputFormat;
use super::timestamp::TimestampFormat;

/// Renders records for the sinks.
///
/// Implementations must be cheap to share: one builder is referenced by every
/// record of its logger.
pub trait LogBuilder: Send + Sync {
    /// Render `record`; `append_newline` is set for normal log dispatch.
    fn build(&self, record: &LogRecord, append_newline: bool) -> String;

    /// Colorize a rendered line for terminal output, in place.
    fn convert_to_colored_output(&self, line: &mut String, level: LogLevel) {
        #[cfg(feature = "console")]
        {
            use colored::Colorize;

            let newline = line.ends_with('\n');
            let colored = line
                .trim_end_matches('\n')
                .color(level.color_code())
                .to_string();
            *line = colored;
            if newline {
                line.push('\n');
            }
        }
        #[cfg(not(feature = "console"))]
        let _ = (line, level);
    }
}

/// Default builder backed by [`OutputFormat`] and [`TimestampFormat`]
///
/// # Example
///
/// ```
/// use log_dispatch::core::{OutputFormat, PatternLogBuilder, TimestampFormat};
///
/// let builder = PatternLogBuilder::new()
///     .with_output_format(OutputFormat::Json)
///     .with_timestamp_format(TimestampFormat::Iso8601Micros);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternLogBuilder {
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
}

impl PatternLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }
}

impl LogBuilder for PatternLogBuilder {
    fn build(&self, record: &LogRecord, append_newline: bool) -> String {
        let mut line = self.output_format.format(record, &self.timestamp_format);
        if append_newline {
            line.push('\n');
        }
        line
    }
}
