// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Scenario`] outcomes.
//!
//! [`Scenario`]: gherkin::Scenario

use serde::Serialize;

use super::{StepError, StepResult};

/// Reference to an executed [`Scenario`] of a `.feature` file.
///
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScenarioRef {
    /// Name of the [`Scenario`], possibly blank.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub name: String,

    /// Line number of the [`Scenario`] in its `.feature` file.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub line: usize,
}

impl ScenarioRef {
    /// Creates a new [`ScenarioRef`].
    #[must_use]
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }

    /// Returns the name to display in reports.
    ///
    /// Blank names fall back to `line <n>`.
    #[must_use]
    pub fn name_for_report(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            format!("line {}", self.line)
        } else {
            name.to_owned()
        }
    }
}

impl From<&gherkin::Scenario> for ScenarioRef {
    fn from(sc: &gherkin::Scenario) -> Self {
        Self::new(sc.name.as_str(), sc.position.line)
    }
}

/// Outcome of a single executed [`Scenario`].
///
/// Append-only while the [`Scenario`] runs, frozen once it completes.
///
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    /// [`Scenario`] this result belongs to.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub scenario: ScenarioRef,

    /// [`StepResult`]s in execution order.
    pub step_results: Vec<StepResult>,

    /// Total elapsed time in nanoseconds.
    pub duration_nanos: u64,
}

impl ScenarioResult {
    /// Creates a new empty [`ScenarioResult`].
    #[must_use]
    pub const fn new(scenario: ScenarioRef) -> Self {
        Self {
            scenario,
            step_results: Vec::new(),
            duration_nanos: 0,
        }
    }

    /// Appends the given [`StepResult`], accounting its duration.
    pub fn add_step_result(&mut self, step: StepResult) {
        self.duration_nanos += step.duration_nanos;
        self.step_results.push(step);
    }

    /// Overrides the total elapsed time with the measured wall-clock one.
    #[must_use]
    pub fn with_duration(mut self, duration_nanos: u64) -> Self {
        self.duration_nanos = duration_nanos;
        self
    }

    /// Indicates whether any [`StepResult`] has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.step_results.iter().any(StepResult::is_failed)
    }

    /// Returns the [`StepError`] of the first failed [`StepResult`].
    #[must_use]
    pub fn error(&self) -> Option<&StepError> {
        self.step_results
            .iter()
            .filter(|s| s.is_failed())
            .find_map(|s| s.error.as_ref())
    }
}
