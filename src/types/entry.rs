//! Log entry model and its line format
//!
//! Every entry is written as one self-contained line:
//!
//! ```text
//! [2026-10-18T09:15:02.123Z] [INFO] order placed | {"orderId":42}
//! ```
//!
//! The ` | <json>` suffix is only present when the entry carries data.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::LogLevel;

/// Separator between the message and the serialized data payload
pub const DATA_SEPARATOR: &str = " | ";

/// A single log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn new(level: LogLevel, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::with_timestamp(Utc::now(), level, message, data)
    }

    /// Create an entry with an explicit timestamp
    pub fn with_timestamp(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
            data,
        }
    }

    /// ISO-8601 timestamp with millisecond precision and a `Z` suffix
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Render the entry as a single log line (without the trailing newline)
    ///
    /// Line breaks inside the message are escaped (`\n`, `\r`, with `\\`
    /// for a literal backslash) so a record never spans more than one line.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let message = escape_line_breaks(&self.message);
        let mut line = format!("[{}] [{}] {}", self.timestamp_iso(), self.level, message);

        if let Some(data) = &self.data {
            line.push_str(DATA_SEPARATOR);
            line.push_str(&serde_json::to_string(data)?);
        }

        Ok(line)
    }

    /// Parse a line produced by [`LogEntry::to_line`]
    ///
    /// Returns `None` for lines that do not follow the format. When the
    /// message itself contains ` | `, the first separator whose tail parses
    /// as JSON is taken as the data boundary.
    pub fn parse_line(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('[')?;
        let (timestamp, rest) = rest.split_once("] [")?;
        let (level, tail) = rest.split_once(']')?;

        let timestamp = DateTime::parse_from_rfc3339(timestamp)
            .ok()?
            .with_timezone(&Utc);
        let level = level.parse::<LogLevel>().ok()?;
        let tail = tail.strip_prefix(' ').unwrap_or(tail);

        let (message, data) = split_data(tail);

        Some(Self {
            timestamp,
            level,
            message: unescape_line_breaks(message),
            data,
        })
    }
}

fn split_data(tail: &str) -> (&str, Option<Value>) {
    for (idx, _) in tail.match_indices(DATA_SEPARATOR) {
        let candidate = &tail[idx + DATA_SEPARATOR.len()..];
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return (&tail[..idx], Some(value));
        }
    }
    (tail, None)
}

fn escape_line_breaks(message: &str) -> String {
    if !message.contains(['\\', '\n', '\r']) {
        return message.to_string();
    }

    let mut escaped = String::with_capacity(message.len() + 8);
    for c in message.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_line_breaks(message: &str) -> String {
    if !message.contains('\\') {
        return message.to_string();
    }

    let mut unescaped = String::with_capacity(message.len());
    let mut chars = message.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('\\') => unescaped.push('\\'),
            // Not produced by to_line; keep the text as written
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
