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

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::Error;

/// Severity of a log record.
///
/// Ranks run from 0 (most severe) to 6 (least severe):
///
/// - `Error`
/// - `Warn`
/// - `Info`
/// - `Http`
/// - `Verbose`
/// - `Debug`
/// - `Silly`
///
/// A record is persisted or emitted only if its rank is at most the
/// configured threshold rank. The derived ordering follows ranks, so
/// `Level::Error < Level::Silly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Http = 3,
    Verbose = 4,
    Debug = 5,
    Silly = 6,
}

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Level; 7] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Http,
        Level::Verbose,
        Level::Debug,
        Level::Silly,
    ];

    /// The numeric rank of this level; lower is more severe.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// The level with the given rank.
    pub fn from_rank(rank: u8) -> Result<Level, Error> {
        Level::ALL
            .get(rank as usize)
            .copied()
            .ok_or_else(|| Error::InvalidLevel(rank.to_string()))
    }

    /// The uppercase name of this level, as persisted on disk.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Http => "HTTP",
            Level::Verbose => "VERBOSE",
            Level::Debug => "DEBUG",
            Level::Silly => "SILLY",
        }
    }

    /// Whether a record at `level` passes a threshold of `self`.
    pub fn permits(self, level: Level) -> bool {
        level <= self
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    // Names match case-insensitively.
    fn from_str(s: &str) -> Result<Level, Error> {
        let name = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| name.eq_ignore_ascii_case(level.as_str()))
            .ok_or_else(|| Error::InvalidLevel(s.to_string()))
    }
}

impl Serialize for Level {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
