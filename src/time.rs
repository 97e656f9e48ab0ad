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

//! Date and time template rendering, and calendar-date parsing for filters.

use jiff::Zoned;
use jiff::civil::Date;

use crate::Error;
use crate::Result;

/// Replace every case-insensitive occurrence of `placeholder` in `input`.
///
/// `placeholder` must be lowercase.
fn replace_ci(input: &str, placeholder: &str, value: &str) -> String {
    let lowered = input.to_ascii_lowercase();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    while let Some(found) = lowered[pos..].find(placeholder) {
        let at = pos + found;
        out.push_str(&input[pos..at]);
        out.push_str(value);
        pos = at + placeholder.len();
    }
    out.push_str(&input[pos..]);
    out
}

/// Render `%year`, `%month`, and `%day` in `template` with zero-padded
/// values from `when`. Placeholders match case-insensitively; anything
/// unmatched is left verbatim.
pub fn render_date(template: &str, when: &Zoned) -> String {
    let rendered = replace_ci(template, "%year", &when.year().to_string());
    let rendered = replace_ci(&rendered, "%month", &format!("{:02}", when.month()));
    replace_ci(&rendered, "%day", &format!("{:02}", when.day()))
}

/// Render `%hour`, `%minute`, and `%second` in `template` with zero-padded
/// values from `when`. Placeholders match case-insensitively; anything
/// unmatched is left verbatim.
pub fn render_time(template: &str, when: &Zoned) -> String {
    let rendered = replace_ci(template, "%hour", &format!("{:02}", when.hour()));
    let rendered = replace_ci(&rendered, "%minute", &format!("{:02}", when.minute()));
    replace_ci(&rendered, "%second", &format!("{:02}", when.second()))
}

/// Parse a `-` or `/` separated calendar date such as `2024-03-15` or
/// `2024/03/15`. A missing month or day defaults to 1, so `2024-03` is the
/// first of March and `2024` is New Year's Day.
pub fn parse_date(input: &str) -> Result<Date> {
    let invalid = || Error::InvalidDate(input.to_string());

    let parts: Vec<&str> = input
        .trim()
        .split(['-', '/'])
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(invalid());
    }

    let year: i16 = parts[0].parse().map_err(|_| invalid())?;
    let month: i8 = match parts.get(1) {
        Some(part) => part.parse().map_err(|_| invalid())?,
        None => 1,
    };
    let day: i8 = match parts.get(2) {
        Some(part) => part.parse().map_err(|_| invalid())?,
        None => 1,
    };

    Date::new(year, month, day).map_err(|_| invalid())
}

/// Whether `date` falls within `[start, end]`. Either bound may be open;
/// both absent means no constraint.
pub fn in_range(date: Date, start: Option<Date>, end: Option<Date>) -> bool {
    start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
}
