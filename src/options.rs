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

//! The immutable base configuration and the pure per-call merge.
//!
//! A logger owns one [`Options`] value built once at construction. Per-call
//! overrides arrive as [`WriteOverrides`]/[`ReadOverrides`] and are merged
//! by producing a new `Options`: nested structures merge field by field,
//! scalars replace wholesale, and a field absent from the override never
//! drops the base value. The base itself is never mutated.

use std::path::PathBuf;

use crate::level::Level;

/// Date and time templates for the rendered record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormat {
    pub date: String,
    pub time: String,
}

impl Default for MessageFormat {
    fn default() -> MessageFormat {
        MessageFormat {
            date: "%year/%month/%day".to_string(),
            time: "%hour:%minute:%second".to_string(),
        }
    }
}

/// Write-side partition templates, rendered against the wall clock before a
/// path is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionKey {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl Default for PartitionKey {
    fn default() -> PartitionKey {
        PartitionKey {
            year: "%year".to_string(),
            month: "%month".to_string(),
            day: "%day".to_string(),
        }
    }
}

/// Options applied when appending a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// The level the record is written at.
    pub level: Level,
    /// Templates for the record's `date` and `time` fields.
    pub format: MessageFormat,
    /// Whether to capture the source chain of error-valued messages.
    pub stack: bool,
    /// The partition the record lands in.
    pub file: PartitionKey,
}

impl Default for WriteOptions {
    fn default() -> WriteOptions {
        WriteOptions {
            level: Level::Info,
            format: MessageFormat::default(),
            stack: true,
            file: PartitionKey::default(),
        }
    }
}

/// Record filters applied while reading; all bounds are inclusive and every
/// field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadFilter {
    /// Keep records dated on or after this calendar date.
    pub start: Option<String>,
    /// Keep records dated on or before this calendar date.
    pub end: Option<String>,
    /// Keep only records at exactly this level.
    pub level: Option<Level>,
}

/// Options applied when loading and paging through records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Eagerly collect byte size and line count per resolved file.
    pub stats: bool,
    /// Emit decoded records (`true`) or raw trimmed lines (`false`).
    pub json: bool,
    /// The page size: how many entries one `read` call returns at most.
    pub lines: usize,
    /// Record filters.
    pub filter: ReadFilter,
}

impl Default for ReadOptions {
    fn default() -> ReadOptions {
        ReadOptions { stats: false, json: true, lines: 15, filter: ReadFilter::default() }
    }
}

/// The full configuration of a logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// The logger name.
    pub name: String,
    /// The partition root directory.
    pub root: PathBuf,
    /// The partition file extension, dot included.
    pub extension: String,
    /// The severity threshold: records at a less severe level are dropped
    /// on write and filtered out on read.
    pub level: Level,
    pub write: WriteOptions,
    pub read: ReadOptions,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            name: "default".to_string(),
            root: PathBuf::from("logs"),
            extension: ".log".to_string(),
            level: Level::Info,
            write: WriteOptions::default(),
            read: ReadOptions::default(),
        }
    }
}

impl Options {
    /// A copy of this configuration with `overrides` merged over the write
    /// options.
    #[must_use]
    pub fn with_write(&self, overrides: &WriteOverrides) -> Options {
        let mut merged = self.clone();
        merged.write.apply(overrides);
        merged
    }

    /// A copy of this configuration with `overrides` merged over the read
    /// options.
    #[must_use]
    pub fn with_read(&self, overrides: &ReadOverrides) -> Options {
        let mut merged = self.clone();
        merged.read.apply(overrides);
        merged
    }
}

/// Per-call overrides for [`WriteOptions`]; `None` fields keep the base
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOverrides {
    pub level: Option<Level>,
    pub format: Option<FormatOverrides>,
    pub stack: Option<bool>,
    pub file: Option<PartitionOverrides>,
}

/// Per-call overrides for [`MessageFormat`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOverrides {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Per-call overrides for [`PartitionKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionOverrides {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

/// Per-call overrides for [`ReadOptions`]; `None` fields keep the base
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOverrides {
    pub stats: Option<bool>,
    pub json: Option<bool>,
    pub lines: Option<usize>,
    pub filter: Option<FilterOverrides>,
}

/// Per-call overrides for [`ReadFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOverrides {
    pub start: Option<String>,
    pub end: Option<String>,
    pub level: Option<Level>,
}

impl WriteOptions {
    fn apply(&mut self, overrides: &WriteOverrides) {
        if let Some(level) = overrides.level {
            self.level = level;
        }
        if let Some(stack) = overrides.stack {
            self.stack = stack;
        }
        if let Some(format) = &overrides.format {
            if let Some(date) = &format.date {
                self.format.date = date.clone();
            }
            if let Some(time) = &format.time {
                self.format.time = time.clone();
            }
        }
        if let Some(file) = &overrides.file {
            if let Some(year) = &file.year {
                self.file.year = year.clone();
            }
            if let Some(month) = &file.month {
                self.file.month = month.clone();
            }
            if let Some(day) = &file.day {
                self.file.day = day.clone();
            }
        }
    }
}

impl ReadOptions {
    fn apply(&mut self, overrides: &ReadOverrides) {
        if let Some(stats) = overrides.stats {
            self.stats = stats;
        }
        if let Some(json) = overrides.json {
            self.json = json;
        }
        if let Some(lines) = overrides.lines {
            self.lines = lines;
        }
        if let Some(filter) = &overrides.filter {
            if let Some(start) = &filter.start {
                self.filter.start = Some(start.clone());
            }
            if let Some(end) = &filter.end {
                self.filter.end = Some(end.clone());
            }
            if let Some(level) = filter.level {
                self.filter.level = Some(level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_merge_is_recursive() {
        let base = Options::default();
        let merged = base.with_write(&WriteOverrides {
            level: Some(Level::Error),
            file: Some(PartitionOverrides {
                day: Some("15".to_string()),
                ..PartitionOverrides::default()
            }),
            ..WriteOverrides::default()
        });

        assert_eq!(merged.write.level, Level::Error);
        assert_eq!(merged.write.file.day, "15");
        // untouched nested fields keep their base values
        assert_eq!(merged.write.file.year, "%year");
        assert_eq!(merged.write.format, base.write.format);
        // the base layer is never mutated
        assert_eq!(base.write.level, Level::Info);
        assert_eq!(base.write.file.day, "%day");
    }

    #[test]
    fn test_read_merge_keeps_base_filter_bounds() {
        let mut base = Options::default();
        base.read.filter.start = Some("2024-01-01".to_string());

        let merged = base.with_read(&ReadOverrides {
            lines: Some(50),
            filter: Some(FilterOverrides {
                end: Some("2024-12-31".to_string()),
                ..FilterOverrides::default()
            }),
            ..ReadOverrides::default()
        });

        assert_eq!(merged.read.lines, 50);
        assert_eq!(merged.read.filter.start.as_deref(), Some("2024-01-01"));
        assert_eq!(merged.read.filter.end.as_deref(), Some("2024-12-31"));
        assert!(merged.read.json);
        assert_eq!(base.read.lines, 15);
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let base = Options::default();
        assert_eq!(base.with_write(&WriteOverrides::default()), base);
        assert_eq!(base.with_read(&ReadOverrides::default()), base);
    }
}
