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

//! Daybook is a date-partitioned, append-only line-log store.
//!
//! Records are appended as newline-delimited JSON to files laid out as
//! `<root>/<year>/<month>/<day><extension>` and read back one bounded page
//! at a time across partitions, with level-threshold, exact-level, and
//! date-range filtering.
//!
//! # Overview
//!
//! Three pieces cooperate: the [path resolver][paths] maps partitions to
//! filesystem paths and resolves the ordered list of files a read targets;
//! the [`Writer`] appends one serialized record to the file resolved for
//! its write-time partition; the [`Reader`] streams lines from each target
//! in partition order, decoding and filtering, and returns them in bounded
//! pages that transparently span file boundaries. [`FileLogger`] ties them
//! together behind per-severity convenience methods.
//!
//! # Examples
//!
//! ```no_run
//! use daybook::FileLoggerBuilder;
//! use daybook::Level;
//! use serde_json::json;
//!
//! # fn main() -> daybook::Result<()> {
//! let mut logger = FileLoggerBuilder::new("my-app")
//!     .root("logs")
//!     .level(Level::Info)
//!     .build()?;
//!
//! logger.info("service started", Some(json!({ "port": 8080 })))?;
//! logger.warn("disk usage above 80%", None)?;
//!
//! logger.load(&Default::default())?;
//! for entry in logger.read()? {
//!     println!("{entry:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod paths;
pub mod time;

mod error;
mod level;
mod logger;
mod options;
mod reader;
mod record;
mod validate;
mod writer;

pub use error::Error;
pub use error::Result;
pub use error::ValidationErrors;
pub use level::Level;
pub use logger::FileLogger;
pub use logger::FileLoggerBuilder;
pub use options::FilterOverrides;
pub use options::FormatOverrides;
pub use options::MessageFormat;
pub use options::Options;
pub use options::PartitionKey;
pub use options::PartitionOverrides;
pub use options::ReadFilter;
pub use options::ReadOptions;
pub use options::ReadOverrides;
pub use options::WriteOptions;
pub use options::WriteOverrides;
pub use paths::DateQuery;
pub use reader::LogFile;
pub use reader::ReadEntry;
pub use reader::Reader;
pub use record::LogRecord;
pub use record::Message;
pub use writer::Writer;
