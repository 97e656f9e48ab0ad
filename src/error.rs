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

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Errors surfaced by the store.
///
/// None of these are retried internally; the store reports them and lets the
/// caller decide how to recover.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more option fields failed validation. Raised before any I/O.
    #[error("invalid options: {0}")]
    Validation(ValidationErrors),

    /// A target file or partition directory does not exist.
    #[error("{} does not exist.", .path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A non-blank line failed to decode as a log record.
    #[error("malformed record in {}: {source}", .path.display())]
    Decode {
        /// The file containing the malformed line.
        path: PathBuf,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// An underlying filesystem failure, propagated unchanged.
    #[error("failed to perform IO action: {0}")]
    Io(#[from] std::io::Error),

    /// A level rank or name outside the known set.
    #[error("level {0} is invalid.")]
    InvalidLevel(String),

    /// A date string that cannot be parsed as a calendar date.
    #[error("date {0} is invalid.")]
    InvalidDate(String),
}

/// A sorted map of offending option field paths to human-readable messages,
/// e.g. `"read.filter.start" => "start must be a date string."`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    pub(crate) fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The message recorded for a field path, if any.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, message)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{path}: {message}")?;
        }
        Ok(())
    }
}

/// An alias of `Result<T, daybook::Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
