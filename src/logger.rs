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
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;
use serde_json::Value;

use crate::Error;
use crate::Result;
use crate::level::Level;
use crate::options::Options;
use crate::options::PartitionKey;
use crate::options::ReadFilter;
use crate::options::ReadOverrides;
use crate::options::WriteOverrides;
use crate::paths;
use crate::paths::DateQuery;
use crate::reader::LogFile;
use crate::reader::ReadEntry;
use crate::reader::Reader;
use crate::record::LogRecord;
use crate::record::Message;
use crate::validate;
use crate::writer::Writer;

/// A date-partitioned file logger.
///
/// Records are appended as newline-delimited JSON under
/// `<root>/<year>/<month>/<day><extension>` and read back one bounded page
/// per [`read`][FileLogger::read] call. Reads and writes are not internally
/// concurrent; pagination state belongs to this instance, one caller at a
/// time.
///
/// # Examples
///
/// ```no_run
/// use daybook::FileLoggerBuilder;
/// use daybook::Level;
/// use serde_json::json;
///
/// # fn main() -> daybook::Result<()> {
/// let mut logger = FileLoggerBuilder::new("my-app")
///     .root("logs")
///     .level(Level::Info)
///     .build()?;
///
/// logger.info("service started", Some(json!({ "port": 8080 })))?;
///
/// logger.load(&Default::default())?;
/// let page = logger.read()?;
/// # let _ = page;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileLogger {
    options: Options,
    writer: Writer,
    reader: Reader,
}

impl FileLogger {
    /// Create a logger with the given name and default options.
    pub fn new(name: impl Into<String>) -> Result<FileLogger> {
        FileLoggerBuilder::new(name).build()
    }

    /// The base configuration this logger was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The files resolved by the last [`load`][FileLogger::load].
    pub fn files(&self) -> &[LogFile] {
        self.reader.files()
    }

    /// Append a record, merging `overrides` over the base write options.
    ///
    /// Returns `Ok(None)` when the severity gate drops the message; that is
    /// "not written", not an error.
    pub fn write(
        &self,
        message: impl Into<Message>,
        data: Option<Value>,
        overrides: &WriteOverrides,
    ) -> Result<Option<LogRecord>> {
        let merged = self.options.with_write(overrides);
        self.writer.write(&message.into(), data, &merged)
    }

    /// Write at `ERROR`.
    pub fn error(&self, message: impl Into<Message>, data: Option<Value>) -> Result<Option<LogRecord>> {
        self.write_level(Level::Error, message, data)
    }

    /// Write at `WARN`.
    pub fn warn(&self, message: impl Into<Message>, data: Option<Value>) -> Result<Option<LogRecord>> {
        self.write_level(Level::Warn, message, data)
    }

    /// Write at `INFO`.
    pub fn info(&self, message: impl Into<Message>, data: Option<Value>) -> Result<Option<LogRecord>> {
        self.write_level(Level::Info, message, data)
    }

    /// Write at `HTTP`.
    pub fn http(&self, message: impl Into<Message>, data: Option<Value>) -> Result<Option<LogRecord>> {
        self.write_level(Level::Http, message, data)
    }

    /// Write at `VERBOSE`.
    pub fn verbose(&self, message: impl Into<Message>, data: Option<Value>) -> Result<Option<LogRecord>> {
        self.write_level(Level::Verbose, message, data)
    }

    /// Write at `DEBUG`.
    pub fn debug(&self, message: impl Into<Message>, data: Option<Value>) -> Result<Option<LogRecord>> {
        self.write_level(Level::Debug, message, data)
    }

    /// Write at `SILLY`.
    pub fn silly(&self, message: impl Into<Message>, data: Option<Value>) -> Result<Option<LogRecord>> {
        self.write_level(Level::Silly, message, data)
    }

    fn write_level(
        &self,
        level: Level,
        message: impl Into<Message>,
        data: Option<Value>,
    ) -> Result<Option<LogRecord>> {
        let overrides = WriteOverrides { level: Some(level), ..WriteOverrides::default() };
        self.write(message, data, &overrides)
    }

    /// Resolve the target files and reset pagination, merging `overrides`
    /// over the base read options.
    pub fn load(&mut self, overrides: &ReadOverrides) -> Result<()> {
        self.reader.load(overrides)
    }

    /// Read the next page; see [`Reader::read`].
    pub fn read(&mut self) -> Result<Vec<ReadEntry>> {
        self.reader.read()
    }

    /// Remove partitions.
    ///
    /// `None` removes every year directory under the root; a year or month
    /// scope removes that subtree; a day scope removes exactly that day's
    /// file. Removing something that does not exist is a no-op. Any removal
    /// resets the reader to an empty file list.
    pub fn remove(&mut self, scope: Option<&DateQuery>) -> Result<()> {
        let now = Zoned::now();
        let root = &self.options.root;
        match scope {
            None => self.remove_all()?,
            Some(DateQuery::Year(year)) => {
                remove_tree(&paths::year_path(root, year, &now)?)?;
            }
            Some(DateQuery::Month { year, month }) => {
                remove_tree(&paths::month_path(root, year, month, &now)?)?;
            }
            Some(DateQuery::Day { year, month, day }) => {
                let path =
                    paths::file_path(root, year, month, day, &self.options.extension, &now)?;
                remove_file(&path)?;
            }
        }
        self.reader.reset();
        Ok(())
    }

    fn remove_all(&self) -> Result<()> {
        let root = &self.options.root;
        let years = match paths::find_years(root) {
            Ok(years) => years,
            Err(Error::NotFound { .. }) => return Ok(()),
            Err(err) => return Err(err),
        };
        for year in years {
            remove_tree(&paths::partition_path(root, Some(year.as_str()), None, None)?)?;
        }
        Ok(())
    }
}

fn remove_tree(path: &Path) -> Result<()> {
    log::debug!("removing partition tree {}", path.display());
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn remove_file(path: &Path) -> Result<()> {
    log::debug!("removing partition file {}", path.display());
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// A builder for configuring a [`FileLogger`].
///
/// # Examples
///
/// ```no_run
/// use daybook::FileLoggerBuilder;
/// use daybook::Level;
///
/// let logger = FileLoggerBuilder::new("my-app")
///     .root("/var/log/my-app")
///     .extension(".log")
///     .level(Level::Debug)
///     .lines(50)
///     .build()
///     .unwrap();
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct FileLoggerBuilder {
    options: Options,
}

impl FileLoggerBuilder {
    /// Create a new builder with default options.
    pub fn new(name: impl Into<String>) -> FileLoggerBuilder {
        let options = Options { name: name.into(), ..Options::default() };
        FileLoggerBuilder { options }
    }

    /// Set the partition root directory. Default `logs`.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.options.root = root.into();
        self
    }

    /// Set the partition file extension, dot included. Default `.log`.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.options.extension = extension.into();
        self
    }

    /// Set the severity threshold. Default [`Level::Info`].
    pub fn level(mut self, level: Level) -> Self {
        self.options.level = level;
        self
    }

    /// Set the default write level. Default [`Level::Info`].
    pub fn write_level(mut self, level: Level) -> Self {
        self.options.write.level = level;
        self
    }

    /// Set the date template for record `date` fields.
    pub fn date_format(mut self, template: impl Into<String>) -> Self {
        self.options.write.format.date = template.into();
        self
    }

    /// Set the time template for record `time` fields.
    pub fn time_format(mut self, template: impl Into<String>) -> Self {
        self.options.write.format.time = template.into();
        self
    }

    /// Capture source chains of error-valued messages. Default `true`.
    pub fn stack(mut self, stack: bool) -> Self {
        self.options.write.stack = stack;
        self
    }

    /// Set the write-side partition templates.
    pub fn partition(mut self, file: PartitionKey) -> Self {
        self.options.write.file = file;
        self
    }

    /// Set the read page size. Default 15.
    pub fn lines(mut self, lines: usize) -> Self {
        self.options.read.lines = lines;
        self
    }

    /// Emit decoded records (`true`, default) or raw lines (`false`).
    pub fn json(mut self, json: bool) -> Self {
        self.options.read.json = json;
        self
    }

    /// Collect per-file stats on load. Default `false`.
    pub fn stats(mut self, stats: bool) -> Self {
        self.options.read.stats = stats;
        self
    }

    /// Set the base read filter.
    pub fn filter(mut self, filter: ReadFilter) -> Self {
        self.options.read.filter = filter;
        self
    }

    /// Build the logger, validating the full option tree.
    pub fn build(self) -> Result<FileLogger> {
        validate::validate(&self.options)?;
        let reader = Reader::new(self.options.clone());
        Ok(FileLogger { options: self.options, writer: Writer, reader })
    }
}
