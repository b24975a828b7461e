// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Feature`] outcomes.
//!
//! [`Feature`]: gherkin::Feature

use std::{env, path::PathBuf};

use serde::Serialize;

use super::ScenarioResult;

/// File extension of `.feature` files.
const FEATURE_EXTENSION: &str = ".feature";

/// Reference to an executed [`Feature`].
///
/// [`Feature`]: gherkin::Feature
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRef {
    /// Name of the [`Feature`], possibly blank.
    ///
    /// [`Feature`]: gherkin::Feature
    pub name: String,

    /// Path of the `.feature` file, rendered with `/` separators.
    pub display_uri: String,

    /// Dot-separated name of the `.feature` file without its extension
    /// (`auth/login.feature` becomes `auth.login`).
    pub qualified_name: String,

    /// Filesystem path of the `.feature` file.
    #[serde(skip)]
    pub path: PathBuf,

    /// Line number of the [`Feature`] keyword in its `.feature` file.
    ///
    /// [`Feature`]: gherkin::Feature
    pub line: usize,
}

impl FeatureRef {
    /// Creates a new [`FeatureRef`] deriving its display URI and qualified
    /// name from the given `path`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        line: usize,
    ) -> Self {
        let path = path.into();
        let display_uri = path.to_string_lossy().replace('\\', "/");
        let qualified_name = qualified_name(&display_uri);
        Self {
            name: name.into(),
            display_uri,
            qualified_name,
            path,
            line,
        }
    }

    /// Returns the name to display in reports.
    ///
    /// Blank names fall back to the [`FeatureRef::display_uri`].
    #[must_use]
    pub fn name_for_report(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            &self.display_uri
        } else {
            name
        }
    }

    /// Returns the absolute path of the `.feature` file, resolving relative
    /// paths against the current working directory.
    #[must_use]
    pub fn absolute_path(&self) -> PathBuf {
        if self.path.is_absolute() {
            return self.path.clone();
        }
        env::current_dir()
            .map(|cwd| cwd.join(&self.path))
            .unwrap_or_else(|_| self.path.clone())
    }
}

impl From<&gherkin::Feature> for FeatureRef {
    fn from(feat: &gherkin::Feature) -> Self {
        let path = feat.path.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{}{FEATURE_EXTENSION}", feat.name))
        });
        Self::new(feat.name.as_str(), path, feat.position.line)
    }
}

/// Converts a `/`-separated `.feature` file path into a dot-separated name.
fn qualified_name(display_uri: &str) -> String {
    let trimmed = display_uri
        .strip_prefix("./")
        .unwrap_or(display_uri)
        .trim_start_matches('/');
    trimmed
        .strip_suffix(FEATURE_EXTENSION)
        .unwrap_or(trimmed)
        .replace('/', ".")
}

/// Outcome of a single executed [`Feature`].
///
/// [`Feature`]: gherkin::Feature
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResult {
    /// [`Feature`] this result belongs to.
    ///
    /// [`Feature`]: gherkin::Feature
    pub feature: FeatureRef,

    /// [`ScenarioResult`]s in execution order.
    pub scenario_results: Vec<ScenarioResult>,

    /// Nesting level of this execution: `0` when run directly by the suite,
    /// greater when called from another [`Scenario`]'s steps.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub call_depth: usize,
}

impl FeatureResult {
    /// Creates a new empty top-level [`FeatureResult`].
    #[must_use]
    pub const fn new(feature: FeatureRef) -> Self {
        Self {
            feature,
            scenario_results: Vec::new(),
            call_depth: 0,
        }
    }

    /// Marks this [`FeatureResult`] as called from another [`Scenario`] at
    /// the given nesting `depth`.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn called_at(mut self, depth: usize) -> Self {
        self.call_depth = depth;
        self
    }

    /// Appends the given [`ScenarioResult`].
    pub fn add_scenario_result(&mut self, scenario: ScenarioResult) {
        self.scenario_results.push(scenario);
    }

    /// Returns number of executed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenario_results.len()
    }

    /// Returns number of failed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenario_results.iter().filter(|s| s.is_failed()).count()
    }

    /// Returns number of passed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.scenario_count() - self.failed_count()
    }

    /// Returns total duration of all the [`Scenario`]s in nanoseconds.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn duration_nanos(&self) -> u64 {
        self.scenario_results.iter().map(|s| s.duration_nanos).sum()
    }

    /// Indicates whether any [`Scenario`] has failed.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.scenario_results.iter().any(ScenarioResult::is_failed)
    }

    /// Indicates whether no [`Scenario`] was executed.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenario_results.is_empty()
    }
}
