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

use std::fs::OpenOptions;
use std::io::Write as _;

use daybook::Error;
use daybook::FileLogger;
use daybook::FileLoggerBuilder;
use daybook::Level;
use daybook::LogRecord;
use daybook::ReadEntry;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;
use tempfile::TempDir;

fn logger(temp_dir: &TempDir, level: Level) -> FileLogger {
    FileLoggerBuilder::new("my-app")
        .root(temp_dir.path().join("logs"))
        .level(level)
        .build()
        .unwrap()
}

fn generate_random_string() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(20..=60);
    std::iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}

fn records(page: Vec<ReadEntry>) -> Vec<LogRecord> {
    page.into_iter()
        .map(|entry| match entry {
            ReadEntry::Record(record) => record,
            ReadEntry::Raw(line) => panic!("expected a decoded record, got raw line {line:?}"),
        })
        .collect()
}

#[test]
fn test_record_fields_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Info);

    logger.info("Test message", Some(json!({ "someData": "someValue" }))).unwrap().unwrap();

    logger.load(&Default::default()).unwrap();
    let entries = records(logger.read().unwrap());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, Level::Info);
    assert_eq!(entries[0].message, "Test message");
    assert_eq!(entries[0].data, Some(json!({ "someData": "someValue" })));
    assert!(!entries[0].date.is_empty());
    assert!(!entries[0].time.is_empty());
    assert_eq!(entries[0].stack, None);
}

#[test]
fn test_default_threshold_is_info() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Info);

    logger.error("should log error", None).unwrap();
    logger.warn("should log warn", None).unwrap();
    logger.info("should log info", None).unwrap();
    logger.http("should not log http", None).unwrap();
    logger.verbose("should not log verbose", None).unwrap();
    logger.debug("should not log debug", None).unwrap();
    logger.silly("should not log silly", None).unwrap();

    logger.load(&Default::default()).unwrap();
    let entries = records(logger.read().unwrap());
    assert_eq!(entries.len(), 3);
}

#[test]
fn test_all_levels_persist_under_silly() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Silly);

    for (i, level) in Level::ALL.into_iter().enumerate() {
        let written = logger
            .write(
                format!("Test message {i}"),
                None,
                &daybook::WriteOverrides { level: Some(level), ..Default::default() },
            )
            .unwrap();
        assert!(written.is_some());
    }

    logger.load(&Default::default()).unwrap();
    let entries = records(logger.read().unwrap());
    assert_eq!(entries.len(), 7);
    for (i, level) in Level::ALL.into_iter().enumerate() {
        assert_eq!(entries[i].level, level);
    }
}

#[test]
fn test_threshold_boundary_at_http() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Http);

    logger.error("This should be logged", None).unwrap();
    logger.warn("This should be logged", None).unwrap();
    logger.info("This should be logged", None).unwrap();
    logger.http("This should be logged", None).unwrap();
    logger.verbose("This should not be logged", None).unwrap();
    logger.debug("This should not be logged", None).unwrap();
    logger.silly("This should not be logged", None).unwrap();

    logger.load(&Default::default()).unwrap();
    let entries = records(logger.read().unwrap());

    assert_eq!(entries.len(), 4);
    let levels: Vec<Level> = entries.iter().map(|entry| entry.level).collect();
    assert_eq!(levels, [Level::Error, Level::Warn, Level::Info, Level::Http]);
}

#[test]
fn test_gated_write_adds_no_line() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Info);

    logger.info("kept", None).unwrap().unwrap();
    assert!(logger.debug("dropped", None).unwrap().is_none());

    logger.load(&Default::default()).unwrap();
    assert_eq!(records(logger.read().unwrap()).len(), 1);
}

#[test]
fn test_error_messages_capture_stack() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Info);

    let cause = std::io::Error::other("connection reset");
    let failure = Error::Io(cause);
    logger.error(daybook::Message::from_error(&failure), None).unwrap().unwrap();

    logger.load(&Default::default()).unwrap();
    let entries = records(logger.read().unwrap());
    assert_eq!(entries.len(), 1);
    let stack = entries[0].stack.as_deref().unwrap();
    assert!(stack.starts_with("failed to perform IO action: connection reset"));
    assert!(stack.contains("caused by: connection reset"));
}

#[test]
fn test_raw_reads_return_trimmed_lines() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = FileLoggerBuilder::new("my-app")
        .root(temp_dir.path().join("logs"))
        .json(false)
        .build()
        .unwrap();

    logger.info("This should be logged 1", None).unwrap();
    logger.info("This should be logged 2", None).unwrap();
    logger.info("This should be logged 3", None).unwrap();

    logger.load(&Default::default()).unwrap();
    let page = logger.read().unwrap();
    assert_eq!(page.len(), 3);
    for entry in page {
        match entry {
            ReadEntry::Raw(line) => {
                assert_eq!(line, line.trim());
                serde_json::from_str::<LogRecord>(&line).unwrap();
            }
            ReadEntry::Record(record) => panic!("expected a raw line, got {record:?}"),
        }
    }
}

#[test]
fn test_stats_populate_only_on_request() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Info);

    for _ in 0..100 {
        logger.info(generate_random_string(), None).unwrap().unwrap();
    }

    logger.load(&Default::default()).unwrap();
    assert_eq!(logger.files().len(), 1);
    assert_eq!(logger.files()[0].size, None);
    assert_eq!(logger.files()[0].lines, None);

    logger
        .load(&daybook::ReadOverrides { stats: Some(true), ..Default::default() })
        .unwrap();
    let file = &logger.files()[0];
    assert!(file.size.unwrap() > 0);
    assert_eq!(file.lines.unwrap(), 100);
}

#[test]
fn test_malformed_line_fails_the_read() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Info);

    logger.info("fine", None).unwrap().unwrap();

    logger.load(&Default::default()).unwrap();
    let target = logger.files()[0].path.clone();
    let mut file = OpenOptions::new().append(true).open(&target).unwrap();
    writeln!(file, "this is not a record").unwrap();
    drop(file);

    logger.load(&Default::default()).unwrap();
    let err = logger.read().unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_blank_lines_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let mut logger = logger(&temp_dir, Level::Info);

    logger.info("before the gap", None).unwrap().unwrap();

    logger.load(&Default::default()).unwrap();
    let target = logger.files()[0].path.clone();
    let mut file = OpenOptions::new().append(true).open(&target).unwrap();
    write!(file, "\n\n").unwrap();
    drop(file);

    logger.info("after the gap", None).unwrap().unwrap();

    logger.load(&Default::default()).unwrap();
    let entries = records(logger.read().unwrap());
    let messages: Vec<&str> = entries.iter().map(|entry| entry.message.as_str()).collect();
    assert_eq!(messages, ["before the gap", "after the gap"]);
}
