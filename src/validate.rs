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

//! Option validation, run over the full tree at construction and over the
//! `write`/`read` subtrees before every write and load.
//!
//! Failures collect into a sorted field-path → message map and abort the
//! operation before any side effect. Checks that the type system already
//! enforces (levels, booleans, numbers) have no runtime counterpart here;
//! what remains are the value predicates.

use crate::Error;
use crate::Result;
use crate::ValidationErrors;
use crate::options::Options;
use crate::options::ReadOptions;
use crate::options::WriteOptions;
use crate::time::parse_date;

/// Validate the full option tree.
pub fn validate(options: &Options) -> Result<()> {
    let mut errors = ValidationErrors::default();

    require(&mut errors, "name", &options.name);
    require(&mut errors, "root", &options.root.to_string_lossy());
    check_extension(&mut errors, "extension", &options.extension);
    check_write(&mut errors, "write", &options.write);
    check_read(&mut errors, "read", &options.read);

    finish(errors)
}

/// Validate the `write` subtree; field paths are relative to it.
pub fn validate_write(write: &WriteOptions) -> Result<()> {
    let mut errors = ValidationErrors::default();
    check_write(&mut errors, "", write);
    finish(errors)
}

/// Validate the `read` subtree; field paths are relative to it.
pub fn validate_read(read: &ReadOptions) -> Result<()> {
    let mut errors = ValidationErrors::default();
    check_read(&mut errors, "", read);
    finish(errors)
}

fn check_write(errors: &mut ValidationErrors, prefix: &str, write: &WriteOptions) {
    require(errors, &key(prefix, "format.date"), &write.format.date);
    require(errors, &key(prefix, "format.time"), &write.format.time);
    require(errors, &key(prefix, "file.year"), &write.file.year);
    require(errors, &key(prefix, "file.month"), &write.file.month);
    require(errors, &key(prefix, "file.day"), &write.file.day);
}

fn check_read(errors: &mut ValidationErrors, prefix: &str, read: &ReadOptions) {
    if read.lines < 1 {
        errors.insert(key(prefix, "lines"), "lines must be at least 1.");
    }
    check_filter_date(errors, &key(prefix, "filter.start"), read.filter.start.as_deref());
    check_filter_date(errors, &key(prefix, "filter.end"), read.filter.end.as_deref());
}

fn check_filter_date(errors: &mut ValidationErrors, path: &str, bound: Option<&str>) {
    if let Some(bound) = bound
        && parse_date(bound).is_err()
    {
        let field = path.rsplit('.').next().unwrap_or(path);
        errors.insert(path, format!("{field} must be a date string."));
    }
}

fn check_extension(errors: &mut ValidationErrors, path: &str, extension: &str) {
    if extension.len() < 2 || !extension.starts_with('.') {
        errors.insert(path, format!("{path} must be a valid extension."));
    }
}

fn require(errors: &mut ValidationErrors, path: &str, value: &str) {
    if value.is_empty() {
        let field = path.rsplit('.').next().unwrap_or(path);
        errors.insert(path, format!("{field} is required."));
    }
}

fn key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") }
}

fn finish(errors: ValidationErrors) -> Result<()> {
    if errors.is_empty() { Ok(()) } else { Err(Error::Validation(errors)) }
}
