// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stateless transformations of results into report artifacts.
//!
//! - [`json`]: per-[`Feature`] JSON and run-wide stats artifacts
//! - [`junit`]: per-[`Feature`] [JUnit XML][1] artifacts
//!
//! [`Feature`]: gherkin::Feature
//! [1]: https://llg.cubic.org/docs/junit

pub mod json;
pub mod junit;

use std::{
    fs,
    io::Write as _,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{Error, Result};

pub use self::{
    json::{write_feature_json, write_run_stats, STATS_FILE_NAME},
    junit::{feature_xml, write_feature_xml},
};

/// Number of nanoseconds in a millisecond.
const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Number of nanoseconds in a second.
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Converts `nanos` into seconds.
#[allow(clippy::cast_precision_loss)] // exact up to 2^53 nanos (~104 days)
#[must_use]
pub fn seconds_of(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_SECOND
}

/// Converts `nanos` into milliseconds.
#[allow(clippy::cast_precision_loss)] // exact up to 2^53 nanos (~104 days)
#[must_use]
pub fn millis_of(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_MILLI
}

/// Formats `nanos` as seconds with up to 6 fractional digits and `.` as the
/// decimal separator, omitting trailing zeros (`1500000000` gives `1.5`,
/// `2000000000` gives `2`).
#[must_use]
pub fn format_seconds(nanos: u64) -> String {
    let micros = nanos / 1_000 + u64::from(nanos % 1_000 >= 500);
    let (secs, frac) = (micros / 1_000_000, micros % 1_000_000);
    if frac == 0 {
        return secs.to_string();
    }
    let frac = format!("{frac:06}");
    format!("{secs}.{}", frac.trim_end_matches('0'))
}

/// Title and detail parts of a multi-line error message.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorDetail {
    /// First line of the message.
    pub title: String,

    /// Rest of the message, empty for single-line ones.
    pub detail: String,
}

/// Splits an error `message` into its [`ErrorDetail`].
///
/// Carriage returns are dropped and tabs become two spaces before splitting
/// on the first newline. Both parts are trimmed.
#[must_use]
pub fn split_error_detail(message: &str) -> ErrorDetail {
    let cleaned = message.replace('\r', "").replace('\t', "  ");
    let (title, detail) =
        cleaned.split_once('\n').unwrap_or((cleaned.as_str(), ""));
    ErrorDetail {
        title: title.trim().to_owned(),
        detail: detail.trim().to_owned(),
    }
}

/// Writes `contents` into the `file_name` under `target_dir`, creating the
/// directory if needed.
///
/// Contents go into a temporary sibling file first and then replace the
/// target in a single rename, so readers never see a partially written file.
pub(crate) fn write_artifact(
    target_dir: &Path,
    file_name: &str,
    contents: &str,
) -> Result<PathBuf> {
    let path = target_dir.join(file_name);
    fs::create_dir_all(target_dir).map_err(|e| Error::io(target_dir, e))?;

    let mut tmp =
        NamedTempFile::new_in(target_dir).map_err(|e| Error::io(&path, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| Error::io(&path, e))?;
    _ = tmp.persist(&path).map_err(|e| Error::io(&path, e.error))?;

    tracing::debug!(path = %path.display(), "report artifact written");
    Ok(path)
}
