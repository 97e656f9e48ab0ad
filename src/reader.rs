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

use std::fs;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::ErrorKind;
use std::io::Read as _;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;
use jiff::civil::Date;
use log::debug;

use crate::Error;
use crate::Result;
use crate::options::Options;
use crate::options::ReadOptions;
use crate::options::ReadOverrides;
use crate::paths;
use crate::record::LogRecord;
use crate::time;
use crate::validate;

/// A resolved target file. `size` and `lines` are populated during `load`
/// only when the `stats` read option is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub size: Option<u64>,
    pub lines: Option<u64>,
}

/// One page entry: a decoded record, or the raw trimmed line when the
/// `json` read option is off.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadEntry {
    Record(LogRecord),
    Raw(String),
}

/// Streams records across partition files, one bounded page per `read`
/// call.
///
/// Pagination state is a file index and a byte cursor into the current
/// file, reset on every `load`. The state is scoped to one instance and
/// `read` takes `&mut self`: one caller at a time.
#[derive(Debug)]
pub struct Reader {
    base: Options,
    read: ReadOptions,
    files: Vec<LogFile>,
    current: usize,
    cursor: u64,
}

impl Reader {
    pub fn new(base: Options) -> Reader {
        let read = base.read.clone();
        Reader { base, read, files: Vec::new(), current: 0, cursor: 0 }
    }

    /// The files resolved by the last `load`.
    pub fn files(&self) -> &[LogFile] {
        &self.files
    }

    /// Re-resolve the target files and reset pagination state.
    ///
    /// `overrides` merge over the logger's base read options. The file list
    /// is replaced wholesale; on failure it is left empty, so a retry
    /// starts from scratch.
    pub fn load(&mut self, overrides: &ReadOverrides) -> Result<()> {
        let merged = self.base.with_read(overrides);
        validate::validate_read(&merged.read)?;
        self.read = merged.read;
        self.reset();

        let now = Zoned::now();
        let targets = paths::resolve_targets(&self.base.root, &self.base.extension, None, &now)?;
        debug!("resolved {} read target(s) under {}", targets.len(), self.base.root.display());

        for path in targets {
            let mut file = LogFile { path, size: None, lines: None };
            if self.read.stats {
                file.size = Some(stat_size(&file.path)?);
                file.lines = Some(count_lines(&file.path)?);
            }
            self.files.push(file);
        }
        Ok(())
    }

    /// Read the next page.
    ///
    /// Returns at most `lines` surviving entries, advancing across file
    /// boundaries until the page fills or every file is exhausted; a short
    /// (possibly empty) page means the end. An empty file list is not an
    /// error. Decode failures and missing files are fatal for the call and
    /// reset the cursor to the first file.
    pub fn read(&mut self) -> Result<Vec<ReadEntry>> {
        if self.files.is_empty() {
            return Ok(Vec::new());
        }
        match self.fill_page() {
            Ok(page) => Ok(page),
            Err(err) => {
                self.current = 0;
                self.cursor = 0;
                Err(err)
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.files.clear();
        self.current = 0;
        self.cursor = 0;
    }

    fn fill_page(&mut self) -> Result<Vec<ReadEntry>> {
        let range = self.filter_range()?;
        let mut page = Vec::new();

        // An explicit loop over the file list: each exhausted file advances
        // the index and rewinds the cursor; a filled page leaves both where
        // the next call must resume.
        while self.current < self.files.len() {
            let path = self.files[self.current].path.clone();
            if !self.drain_file(&path, range, &mut page)? {
                return Ok(page);
            }
            debug!("exhausted {}, advancing", path.display());
            self.current += 1;
            self.cursor = 0;
        }
        Ok(page)
    }

    /// Stream `path` from the saved cursor into `page`. Returns `true` when
    /// the file was read to its end, `false` when the page filled first.
    /// The handle is dropped on every exit path.
    fn drain_file(
        &mut self,
        path: &Path,
        range: (Option<Date>, Option<Date>),
        page: &mut Vec<ReadEntry>,
    ) -> Result<bool> {
        let file = File::open(path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                Error::NotFound { path: path.to_path_buf() }
            } else {
                Error::Io(err)
            }
        })?;
        let mut lines = BufReader::new(file);
        lines.seek(SeekFrom::Start(self.cursor))?;

        let mut buf = String::new();
        loop {
            buf.clear();
            let consumed = lines.read_line(&mut buf)?;
            if consumed == 0 {
                return Ok(true);
            }
            // The cursor tracks file position, not emitted entries: it
            // advances past blank and filtered-out lines alike.
            self.cursor += consumed as u64;

            let line = buf.trim();
            if line.is_empty() {
                continue;
            }

            // A line that fails structural decoding is a data-integrity
            // error, not a filtered-out line.
            let record: LogRecord = serde_json::from_str(line)
                .map_err(|err| Error::Decode { path: path.to_path_buf(), source: err })?;

            if !self.base.level.permits(record.level) {
                continue;
            }
            if let Some(wanted) = self.read.filter.level
                && record.level != wanted
            {
                continue;
            }
            if !self.record_in_range(&record, range)? {
                continue;
            }

            if self.read.json {
                page.push(ReadEntry::Record(record));
            } else {
                page.push(ReadEntry::Raw(line.to_string()));
            }
            if page.len() >= self.read.lines {
                return Ok(false);
            }
        }
    }

    fn filter_range(&self) -> Result<(Option<Date>, Option<Date>)> {
        let filter = &self.read.filter;
        let start = filter.start.as_deref().map(time::parse_date).transpose()?;
        let end = filter.end.as_deref().map(time::parse_date).transpose()?;
        Ok((start, end))
    }

    fn record_in_range(
        &self,
        record: &LogRecord,
        (start, end): (Option<Date>, Option<Date>),
    ) -> Result<bool> {
        if start.is_none() && end.is_none() {
            return Ok(true);
        }
        let date = time::parse_date(&record.date)?;
        Ok(time::in_range(date, start, end))
    }
}

fn stat_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            Error::NotFound { path: path.to_path_buf() }
        } else {
            Error::Io(err)
        }
    })?;
    Ok(metadata.len())
}

/// Count newline-terminated segments by scanning for `\n` bytes.
fn count_lines(path: &Path) -> Result<u64> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; 8192];
    let mut count = 0u64;
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            return Ok(count);
        }
        count += buf[..n].iter().filter(|&&byte| byte == b'\n').count() as u64;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_count_lines_counts_newlines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counted.log");
        let mut file = File::create(&path).unwrap();
        write!(file, "one\ntwo\nthree\n").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 3);

        let path = temp_dir.path().join("unterminated.log");
        let mut file = File::create(&path).unwrap();
        write!(file, "one\ntail without newline").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 1);

        let path = temp_dir.path().join("empty.log");
        File::create(&path).unwrap();
        assert_eq!(count_lines(&path).unwrap(), 0);
    }

    #[test]
    fn test_read_without_load_is_empty() {
        let mut reader = Reader::new(Options::default());
        assert!(reader.read().unwrap().is_empty());
    }
}
