// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! JSON report artifacts.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    result::{FeatureResult, Results},
    Result,
};

use super::write_artifact;

/// File name of the run-wide stats artifact.
pub const STATS_FILE_NAME: &str = "results-json.txt";

/// [`Serialize`]able view of a [`FeatureResult`] enriched with its derived
/// counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureReport<'a> {
    /// Reported [`FeatureResult`] itself.
    #[serde(flatten)]
    result: &'a FeatureResult,

    /// [`FeatureResult::scenario_count()`].
    scenario_count: usize,

    /// [`FeatureResult::passed_count()`].
    passed_count: usize,

    /// [`FeatureResult::failed_count()`].
    failed_count: usize,

    /// [`FeatureResult::duration_nanos()`] in milliseconds.
    duration_millis: f64,

    /// [`FeatureResult::is_failed()`].
    failed: bool,
}

impl<'a> From<&'a FeatureResult> for FeatureReport<'a> {
    fn from(result: &'a FeatureResult) -> Self {
        Self {
            result,
            scenario_count: result.scenario_count(),
            passed_count: result.passed_count(),
            failed_count: result.failed_count(),
            duration_millis: super::millis_of(result.duration_nanos()),
            failed: result.is_failed(),
        }
    }
}

/// Renders the given [`FeatureResult`] as a single-element JSON array.
///
/// # Errors
///
/// If serialization fails.
pub fn feature_json(result: &FeatureResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&[FeatureReport::from(result)])?)
}

/// Writes the given [`FeatureResult`] as a single-element JSON array into
/// `target_dir`.
///
/// `file_name` defaults to `<qualified name>.json`.
///
/// # Errors
///
/// If serialization or writing the file fails.
pub fn write_feature_json(
    target_dir: impl AsRef<Path>,
    result: &FeatureResult,
    file_name: Option<&str>,
) -> Result<PathBuf> {
    let json = feature_json(result)?;
    let file_name = file_name.map_or_else(
        || format!("{}.json", result.feature.qualified_name),
        ToOwned::to_owned,
    );
    write_artifact(target_dir.as_ref(), &file_name, &json)
}

/// Writes a snapshot of the run-wide [`Results`] into
/// [`STATS_FILE_NAME`] under `target_dir`, replacing the previous one.
///
/// # Errors
///
/// If serialization or writing the file fails.
pub fn write_run_stats(
    target_dir: impl AsRef<Path>,
    results: &Results,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&results.to_map())?;
    write_artifact(target_dir.as_ref(), STATS_FILE_NAME, &json)
}
