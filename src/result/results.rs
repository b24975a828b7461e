// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Run-wide statistics.

use std::{
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
    time::Instant,
};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};

use super::FeatureResult;

/// Format of [`ResultsSnapshot::result_date`].
const RESULT_DATE_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

/// Aggregate counts and timings across all the top-level [`Feature`]s of a
/// single run.
///
/// Updated concurrently by workers finishing [`Feature`]s, so uses atomics
/// only and never blocks.
///
/// [`Feature`]: gherkin::Feature
#[derive(Debug)]
pub struct Results {
    /// Number of threads the run is executed with.
    threads: usize,

    /// [`Instant`] the run has started at.
    started: Instant,

    /// Wall-clock date the run has started at.
    started_at: DateTime<Local>,

    /// Number of [`Feature`]s with all [`Scenario`]s passed.
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    features_passed: AtomicUsize,

    /// Number of [`Feature`]s with at least one failed [`Scenario`].
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    features_failed: AtomicUsize,

    /// Number of [`Feature`]s without any executed [`Scenario`].
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    features_skipped: AtomicUsize,

    /// Number of passed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    scenarios_passed: AtomicUsize,

    /// Number of failed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    scenarios_failed: AtomicUsize,

    /// Summed duration of all the [`Feature`]s in nanoseconds.
    ///
    /// [`Feature`]: gherkin::Feature
    total_time_nanos: AtomicU64,
}

impl Default for Results {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Results {
    /// Creates new empty [`Results`] of a run executed with the given number
    /// of `threads`.
    #[must_use]
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            started: Instant::now(),
            started_at: Local::now(),
            features_passed: AtomicUsize::new(0),
            features_failed: AtomicUsize::new(0),
            features_skipped: AtomicUsize::new(0),
            scenarios_passed: AtomicUsize::new(0),
            scenarios_failed: AtomicUsize::new(0),
            total_time_nanos: AtomicU64::new(0),
        }
    }

    /// Accounts the given [`FeatureResult`].
    ///
    /// Called [`Feature`]s (with non-zero [`FeatureResult::call_depth`]) are
    /// ignored, so returns `false` for them.
    ///
    /// [`Feature`]: gherkin::Feature
    pub fn add_feature(&self, result: &FeatureResult) -> bool {
        if result.call_depth > 0 {
            return false;
        }

        let counter = if result.is_empty() {
            &self.features_skipped
        } else if result.is_failed() {
            &self.features_failed
        } else {
            &self.features_passed
        };
        _ = counter.fetch_add(1, Ordering::Relaxed);

        let failed = result.failed_count();
        _ = self.scenarios_failed.fetch_add(failed, Ordering::Relaxed);
        _ = self
            .scenarios_passed
            .fetch_add(result.scenario_count() - failed, Ordering::Relaxed);
        _ = self
            .total_time_nanos
            .fetch_add(result.duration_nanos(), Ordering::Relaxed);
        true
    }

    /// Returns number of failed [`Scenario`]s accounted so far.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn failed_scenarios(&self) -> usize {
        self.scenarios_failed.load(Ordering::Relaxed)
    }

    /// Indicates whether any accounted [`Scenario`] has failed.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.failed_scenarios() > 0
    }

    /// Takes a point-in-time [`ResultsSnapshot`].
    #[must_use]
    pub fn snapshot(&self) -> ResultsSnapshot {
        let elapsed_time = self.started.elapsed().as_secs_f64() * 1000.0;
        let total_time =
            crate::aggregate::millis_of(self.total_time_nanos.load(Ordering::Relaxed));
        #[allow(clippy::cast_precision_loss)] // thread counts are tiny
        let efficiency = if elapsed_time > 0.0 {
            total_time / (elapsed_time * self.threads as f64)
        } else {
            0.0
        };

        ResultsSnapshot {
            version: env!("CARGO_PKG_VERSION"),
            threads: self.threads,
            features_passed: self.features_passed.load(Ordering::Relaxed),
            features_failed: self.features_failed.load(Ordering::Relaxed),
            features_skipped: self.features_skipped.load(Ordering::Relaxed),
            scenarios_passed: self.scenarios_passed.load(Ordering::Relaxed),
            scenarios_failed: self.scenarios_failed.load(Ordering::Relaxed),
            elapsed_time,
            total_time,
            efficiency,
            result_date: self.started_at.format(RESULT_DATE_FORMAT).to_string(),
        }
    }

    /// Returns a JSON object form of the current [`ResultsSnapshot`].
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self.snapshot()) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => unreachable!(
                "`ResultsSnapshot` always serializes into a JSON object",
            ),
        }
    }
}

/// Point-in-time copy of [`Results`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSnapshot {
    /// Version of this crate produced the snapshot.
    pub version: &'static str,

    /// Number of threads the run is executed with.
    pub threads: usize,

    /// Number of passed [`Feature`]s.
    ///
    /// [`Feature`]: gherkin::Feature
    pub features_passed: usize,

    /// Number of failed [`Feature`]s.
    ///
    /// [`Feature`]: gherkin::Feature
    pub features_failed: usize,

    /// Number of [`Feature`]s without executed [`Scenario`]s.
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    pub features_skipped: usize,

    /// Number of passed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub scenarios_passed: usize,

    /// Number of failed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub scenarios_failed: usize,

    /// Wall-clock milliseconds since the run has started.
    pub elapsed_time: f64,

    /// Summed [`Feature`] milliseconds.
    ///
    /// [`Feature`]: gherkin::Feature
    pub total_time: f64,

    /// Ratio of [`ResultsSnapshot::total_time`] to the available thread time.
    pub efficiency: f64,

    /// Date the run has started at.
    pub result_date: String,
}

impl ResultsSnapshot {
    /// Returns total number of accounted [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub const fn scenarios_total(&self) -> usize {
        self.scenarios_passed + self.scenarios_failed
    }
}
