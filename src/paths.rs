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

//! The path resolver: mapping partitions to filesystem paths and resolving
//! the ordered list of files a read operation targets.
//!
//! Partition files are laid out as `<root>/<year>/<month>/<day><extension>`,
//! with zero-padded components so lexical order is chronological.
//!
//! A directory named by a resolution call that does not exist propagates
//! [`Error::NotFound`]; an existing but empty directory yields zero files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;
use jiff::civil::Date;

use crate::Error;
use crate::Result;
use crate::time::render_date;

/// A partition scope: a whole year, one month of a year, or an exact day.
///
/// Components are kept as strings so they may carry template placeholders
/// that are rendered against the wall clock when the path is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateQuery {
    Year(String),
    Month { year: String, month: String },
    Day { year: String, month: String, day: String },
}

impl DateQuery {
    /// Parse from a `-` or `/` separated date string: `"2024"` scopes a
    /// year, `"2024-03"` a month, `"2024-03-15"` an exact day. Month and day
    /// are zero-padded to two digits.
    pub fn parse(input: &str) -> Result<DateQuery> {
        let parts: Vec<&str> = input
            .trim()
            .split(['-', '/'])
            .filter(|part| !part.is_empty())
            .collect();
        match parts.as_slice() {
            [year] => Ok(DateQuery::Year((*year).to_string())),
            [year, month] => Ok(DateQuery::Month {
                year: (*year).to_string(),
                month: pad2(month),
            }),
            [year, month, day] => Ok(DateQuery::Day {
                year: (*year).to_string(),
                month: pad2(month),
                day: pad2(day),
            }),
            _ => Err(Error::InvalidDate(input.to_string())),
        }
    }
}

impl From<Date> for DateQuery {
    /// Scope the calendar day of `date`. The day component is the
    /// day-of-month, not the weekday.
    fn from(date: Date) -> DateQuery {
        DateQuery::Day {
            year: date.year().to_string(),
            month: format!("{:02}", date.month()),
            day: format!("{:02}", date.day()),
        }
    }
}

fn pad2(part: &str) -> String {
    if part.len() >= 2 {
        part.to_string()
    } else {
        format!("0{part}")
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// The absolute path of a partition directory under `root`, anchored at the
/// process working directory. Components are joined as given, unrendered.
pub fn partition_path(
    root: &Path,
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    if let Some(year) = year {
        path.push(year);
    }
    if let Some(month) = month {
        path.push(month);
    }
    if let Some(day) = day {
        path.push(day);
    }
    absolute(path)
}

/// The absolute path of a year directory, with templates rendered against
/// `when`.
pub fn year_path(root: &Path, year: &str, when: &Zoned) -> Result<PathBuf> {
    absolute(root.join(render_date(year, when)))
}

/// The absolute path of a month directory, with templates rendered against
/// `when`.
pub fn month_path(root: &Path, year: &str, month: &str, when: &Zoned) -> Result<PathBuf> {
    let path = year_path(root, year, when)?;
    Ok(path.join(render_date(month, when)))
}

/// The absolute path of a day's partition file, templates rendered against
/// `when` and the extension appended.
pub fn file_path(
    root: &Path,
    year: &str,
    month: &str,
    day: &str,
    extension: &str,
    when: &Zoned,
) -> Result<PathBuf> {
    let dir = month_path(root, year, month, when)?;
    Ok(dir.join(format!("{}{extension}", render_date(day, when))))
}

/// Create the month directory for a write, recursively and idempotently.
pub fn ensure_dir(root: &Path, year: &str, month: &str, when: &Zoned) -> Result<PathBuf> {
    let path = month_path(root, year, month, when)?;
    fs::create_dir_all(&path)?;
    Ok(path)
}

// A sorted listing; ENOENT maps to NotFound so missing partitions surface
// uniformly on every resolution path.
fn list_dir(path: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            Error::NotFound { path: path.to_path_buf() }
        } else {
            Error::Io(err)
        }
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// The year directories under `root`, lexically sorted.
pub fn find_years(root: &Path) -> Result<Vec<String>> {
    list_dir(&partition_path(root, None, None, None)?)
}

/// The month directories of a year, lexically sorted.
pub fn find_months(root: &Path, year: &str) -> Result<Vec<String>> {
    list_dir(&partition_path(root, Some(year), None, None)?)
}

/// The day files of a month, lexically sorted.
pub fn find_days(root: &Path, year: &str, month: &str) -> Result<Vec<String>> {
    list_dir(&partition_path(root, Some(year), Some(month), None)?)
}

/// Every partition file under one month, in day order.
pub fn resolve_month(
    root: &Path,
    extension: &str,
    year: &str,
    month: &str,
) -> Result<Vec<PathBuf>> {
    let dir = partition_path(root, Some(year), Some(month), None)?;
    let days = find_days(root, year, month)?;
    Ok(days
        .into_iter()
        .filter(|day| day.ends_with(extension))
        .map(|day| dir.join(day))
        .collect())
}

/// Every partition file under one year, in month-then-day order.
pub fn resolve_year(root: &Path, extension: &str, year: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for month in find_months(root, year)? {
        files.extend(resolve_month(root, extension, year, &month)?);
    }
    Ok(files)
}

/// Every partition file under every year, lexically sorted.
pub fn resolve_all(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for year in find_years(root)? {
        files.extend(resolve_year(root, extension, &year)?);
    }
    files.sort();
    Ok(files)
}

/// The ordered list of files a read operation targets.
///
/// An exact day resolves to that single file; a year or month query lists
/// the matching subtree; no query scans every partition. The result is
/// always partition-ascending.
pub fn resolve_targets(
    root: &Path,
    extension: &str,
    query: Option<&DateQuery>,
    when: &Zoned,
) -> Result<Vec<PathBuf>> {
    match query {
        Some(DateQuery::Day { year, month, day }) => {
            Ok(vec![file_path(root, year, month, day, extension, when)?])
        }
        Some(DateQuery::Month { year, month }) => resolve_month(root, extension, year, month),
        Some(DateQuery::Year(year)) => resolve_year(root, extension, year),
        None => resolve_all(root, extension),
    }
}
