//! Output format for rendered log lines
//!
//! - Text: human-readable format (default)
//! - Json: one JSON object per line
//! - Logfmt: key=value pairs for log aggregation tools

use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z] [INFO ] [default] main - Request processed`
    #[default]
    Text,

    /// `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","logger":"default",...}`
    Json,

    /// `timestamp=2025-01-08T10:30:45.123Z level=INFO logger=default message="..."`
    Logfmt,
}

impl OutputFormat {
    /// Render a record without a trailing newline
    pub fn format(&self, record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => Self::format_text(record, timestamp_format),
            OutputFormat::Json => Self::format_json(record, timestamp_format),
            OutputFormat::Logfmt => Self::format_logfmt(record, timestamp_format),
        }
    }

    fn format_text(record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
        format!(
            "[{}] [{:5}] [{}] {} - {}",
            timestamp_format.format(record.timestamp()),
            record.level().to_str(),
            record.logger().id(),
            record.thread_label(),
            sanitize(record.message())
        )
    }

    fn format_json(record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
        let timestamp = if timestamp_format.is_numeric() {
            serde_json::Value::from(record.timestamp().timestamp_millis())
        } else {
            serde_json::Value::from(timestamp_format.format(record.timestamp()))
        };

        let mut object = serde_json::Map::new();
        object.insert("timestamp".to_string(), timestamp);
        object.insert("level".to_string(), record.level().to_str().into());
        object.insert("logger".to_string(), record.logger().id().into());
        object.insert("thread".to_string(), record.thread_label().into());
        object.insert("message".to_string(), record.message().into());

        // serde_json escapes control characters, so no sanitizing here
        serde_json::Value::Object(object).to_string()
    }

    fn format_logfmt(record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
        format!(
            "timestamp={} level={} logger={} thread={} message={}",
            escape_logfmt_value(&timestamp_format.format(record.timestamp())),
            record.level().to_str(),
            escape_logfmt_value(record.logger().id()),
            escape_logfmt_value(record.thread_label()),
            quote_logfmt_value(&sanitize(record.message()))
        )
    }
}

/// Escape line breaks and tabs so one record always renders as one line
fn sanitize(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn escape_logfmt_value(value: &str) -> String {
    if value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
