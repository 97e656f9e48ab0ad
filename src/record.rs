// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log records and the write-side message payload.

use std::error::Error as StdError;

use jiff::Zoned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::level::Level;
use crate::options::WriteOptions;
use crate::time::render_date;
use crate::time::render_time;

/// The payload of a write call.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Plain text, persisted verbatim.
    Text(String),
    /// A structured value; scalars render via their display form, maps and
    /// arrays as compact JSON.
    Value(Value),
    /// An error value: its display text plus the rendered source chain.
    Error { summary: String, chain: Vec<String> },
}

impl Message {
    /// Capture an error and its source chain.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Message {
        let summary = err.to_string();
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Message::Error { summary, chain }
    }

    // An empty text message is silently dropped by the writer.
    pub(crate) fn is_blank(&self) -> bool {
        matches!(self, Message::Text(text) if text.is_empty())
    }

    fn render(&self) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Value(Value::String(text)) => text.clone(),
            Message::Value(value) => value.to_string(),
            Message::Error { summary, .. } => summary.clone(),
        }
    }

    fn stack(&self) -> Option<String> {
        match self {
            Message::Error { summary, chain } => {
                let mut stack = summary.clone();
                for cause in chain {
                    stack.push_str("\ncaused by: ");
                    stack.push_str(cause);
                }
                Some(stack)
            }
            _ => None,
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Message {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Message {
        Message::Text(text)
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Message {
        Message::Value(value)
    }
}

/// One persisted log record.
///
/// Exactly one JSON object per line on disk; JSON string escaping keeps
/// every record independently parseable with no multi-line records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity, persisted as its uppercase name.
    pub level: Level,
    /// The calendar date, rendered per the write date template.
    pub date: String,
    /// The wall-clock time, rendered per the write time template.
    pub time: String,
    /// The coerced message text.
    pub message: String,
    /// Arbitrary structured payload, omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// The rendered error chain, present only for error-valued messages
    /// written with `stack` enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl LogRecord {
    pub(crate) fn build(
        message: &Message,
        data: Option<Value>,
        opts: &WriteOptions,
        when: &Zoned,
    ) -> LogRecord {
        LogRecord {
            level: opts.level,
            date: render_date(&opts.format.date, when),
            time: render_time(&opts.format.time, when),
            message: message.render(),
            data,
            stack: if opts.stack { message.stack() } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    fn at(datetime: &str) -> Zoned {
        Zoned::from_str(datetime).unwrap()
    }

    #[test]
    fn test_message_coercion() {
        assert_eq!(Message::from("plain").render(), "plain");
        assert_eq!(Message::from(json!("quoted")).render(), "quoted");
        assert_eq!(Message::from(json!(42)).render(), "42");
        assert_eq!(Message::from(json!({"a": 1})).render(), r#"{"a":1}"#);
        assert_eq!(Message::from(json!([1, 2])).render(), "[1,2]");
    }

    #[test]
    fn test_error_message_captures_chain() {
        let source = std::io::Error::other("disk on fire");
        let err = crate::Error::Io(source);
        let message = Message::from_error(&err);
        assert_eq!(
            message.stack().unwrap(),
            "failed to perform IO action: disk on fire\ncaused by: disk on fire"
        );
    }

    #[test]
    fn test_build_renders_templates() {
        let when = at("2024-03-05T07:08:09[UTC]");
        let opts = WriteOptions::default();
        let record = LogRecord::build(&Message::from("hello"), None, &opts, &when);
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.date, "2024/03/05");
        assert_eq!(record.time, "07:08:09");
        assert_eq!(record.message, "hello");
        assert_eq!(record.data, None);
        assert_eq!(record.stack, None);
    }

    #[test]
    fn test_stack_only_for_errors_when_enabled() {
        let when = at("2024-03-05T07:08:09[UTC]");
        let err = crate::Error::InvalidLevel("8".to_string());
        let message = Message::from_error(&err);

        let with = WriteOptions { stack: true, ..WriteOptions::default() };
        let record = LogRecord::build(&message, None, &with, &when);
        assert_eq!(record.stack.as_deref(), Some("level 8 is invalid."));

        let without = WriteOptions { stack: false, ..WriteOptions::default() };
        let record = LogRecord::build(&message, None, &without, &when);
        assert_eq!(record.stack, None);
    }

    #[test]
    fn test_serde_round_trip_omits_absent_fields() {
        let record = LogRecord {
            level: Level::Warn,
            date: "2024/03/05".to_string(),
            time: "07:08:09".to_string(),
            message: "careful".to_string(),
            data: None,
            stack: None,
        };
        let line = serde_json::to_string(&record).unwrap();
        assert!(!line.contains("data"));
        assert!(!line.contains("stack"));
        assert_eq!(serde_json::from_str::<LogRecord>(&line).unwrap(), record);
    }

    #[test]
    fn test_decodes_lines_with_empty_stack_and_data() {
        // Lines written by older deployments carry `"data":{}` and
        // `"stack":""` instead of omitting the fields.
        let line = r#"{"level":"INFO","date":"2024/03/05","time":"07:08:09","message":"m","data":{},"stack":""}"#;
        let record: LogRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.data, Some(json!({})));
        assert_eq!(record.stack.as_deref(), Some(""));
    }
}
