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

use jiff::Zoned;
use serde_json::Value;

use crate::Result;
use crate::options::Options;
use crate::paths;
use crate::record::LogRecord;
use crate::record::Message;
use crate::validate;

/// Appends one serialized record per call to the partition file resolved
/// from the write-time wall clock.
#[derive(Debug, Default)]
pub struct Writer;

impl Writer {
    /// Append `message` as a log record.
    ///
    /// Returns `Ok(None)` without touching the filesystem when the message
    /// is blank or its level fails the severity gate; "nothing returned"
    /// means "not written", not an error. Option validation failures raise
    /// before any side effect.
    pub fn write(
        &self,
        message: &Message,
        data: Option<Value>,
        options: &Options,
    ) -> Result<Option<LogRecord>> {
        validate::validate_write(&options.write)?;

        if message.is_blank() {
            return Ok(None);
        }

        // The severity gate: levels less severe than the threshold are
        // dropped, not errors.
        if !options.level.permits(options.write.level) {
            return Ok(None);
        }

        let now = Zoned::now();
        let record = LogRecord::build(message, data, &options.write, &now);
        self.append(record, options, &now)
    }

    fn append(&self, record: LogRecord, options: &Options, now: &Zoned) -> Result<Option<LogRecord>> {
        let file = &options.write.file;
        paths::ensure_dir(&options.root, &file.year, &file.month, now)?;
        let path = paths::file_path(
            &options.root,
            &file.year,
            &file.month,
            &file.day,
            &options.extension,
            now,
        )?;

        let mut line = serde_json::to_string(&record).map_err(std::io::Error::other)?;
        line.push('\n');

        let mut target = OpenOptions::new().create(true).append(true).open(&path)?;
        target.write_all(line.as_bytes())?;
        log::trace!("appended {} record to {}", record.level, path.display());

        Ok(Some(record))
    }
}
