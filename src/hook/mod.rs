// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution hooks observing a running suite.
//!
//! - [`RuntimeHook`]: capability trait invoked by the runtime at lifecycle
//!   points, with no-op defaults
//! - [`ReportingHook`]: [`RuntimeHook`] producing report artifacts and
//!   [TeamCity service messages][1]
//! - [`cli`]: options of a [`ReportingHook`]
//! - [`html`]: HTML report collaborator
//! - [`lock`]: non-blocking advisory lock
//! - [`teamcity`]: service message formatting
//!
//! [1]: https://www.jetbrains.com/help/teamcity/service-messages.html

pub mod cli;
pub mod html;
pub mod lock;
pub mod reporting;
pub mod teamcity;

use crate::{
    result::{FeatureRef, FeatureResult, ScenarioResult, StepRef, StepResult},
    Result,
};

pub use self::{
    cli::Cli, html::HtmlReport, lock::TryLock, reporting::ReportingHook,
};

/// Observer of a running suite, invoked by the runtime at defined lifecycle
/// points.
///
/// Every callback may be invoked concurrently from independent workers and
/// must not block indefinitely. Callbacks not overridden are no-ops.
///
/// Callbacks returning `bool` tell whether execution should continue.
pub trait RuntimeHook: Send + Sync {
    /// Called once before any [`Feature`] runs.
    ///
    /// [`Feature`]: gherkin::Feature
    fn before_suite(&self, _suite: &SuiteContext) {}

    /// Called once after all the [`Feature`]s have finished.
    ///
    /// # Errors
    ///
    /// If producing run-wide artifacts fails.
    ///
    /// [`Feature`]: gherkin::Feature
    fn after_suite(&self, _suite: &SuiteContext) -> Result<()> {
        Ok(())
    }

    /// Called before a [`Feature`] runs.
    ///
    /// [`Feature`]: gherkin::Feature
    fn before_feature(&self, _ctx: &FeatureContext<'_>) -> bool {
        true
    }

    /// Called after a [`Feature`] has finished.
    ///
    /// # Errors
    ///
    /// If producing the [`Feature`]'s artifacts fails.
    ///
    /// [`Feature`]: gherkin::Feature
    fn after_feature(&self, _ctx: &FeatureContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called before a [`Scenario`] runs.
    ///
    /// [`Scenario`]: gherkin::Scenario
    fn before_scenario(&self, _ctx: &ScenarioContext<'_>) -> bool {
        true
    }

    /// Called after a [`Scenario`] has finished.
    ///
    /// [`Scenario`]: gherkin::Scenario
    fn after_scenario(&self, _ctx: &ScenarioContext<'_>) {}

    /// Called before a [`Step`] runs.
    ///
    /// [`Step`]: gherkin::Step
    fn before_step(&self, _step: &StepRef, _ctx: &ScenarioContext<'_>) -> bool {
        true
    }

    /// Called after a [`Step`] has finished.
    ///
    /// [`Step`]: gherkin::Step
    fn after_step(&self, _result: &StepResult, _ctx: &ScenarioContext<'_>) {}
}

/// Run-wide information passed to suite callbacks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SuiteContext {
    /// Number of top-level [`Feature`]s in the run.
    ///
    /// [`Feature`]: gherkin::Feature
    pub feature_count: usize,

    /// Number of threads the run is executed with.
    pub threads: usize,
}

/// Read-only view of a [`Feature`] execution passed to feature callbacks.
///
/// [`Feature`]: gherkin::Feature
#[derive(Clone, Copy, Debug)]
pub struct FeatureContext<'a> {
    /// Result of the [`Feature`] (empty in [`RuntimeHook::before_feature()`]).
    ///
    /// [`Feature`]: gherkin::Feature
    pub result: &'a FeatureResult,

    /// Nesting level: `0` for top-level [`Feature`]s, greater for called
    /// ones.
    ///
    /// [`Feature`]: gherkin::Feature
    pub depth: usize,
}

impl<'a> FeatureContext<'a> {
    /// Creates a new [`FeatureContext`] taking the nesting level from
    /// [`FeatureResult::call_depth`].
    #[must_use]
    pub const fn new(result: &'a FeatureResult) -> Self {
        Self {
            result,
            depth: result.call_depth,
        }
    }
}

/// Read-only view of a [`Scenario`] execution passed to scenario and step
/// callbacks.
///
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Copy, Debug)]
pub struct ScenarioContext<'a> {
    /// [`Feature`] the [`Scenario`] belongs to.
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    pub feature: &'a FeatureRef,

    /// Result of the [`Scenario`] so far.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub result: &'a ScenarioResult,

    /// Nesting level: `0` for [`Scenario`]s of top-level [`Feature`]s,
    /// greater for called ones.
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    pub depth: usize,
}

impl<'a> ScenarioContext<'a> {
    /// Creates a new [`ScenarioContext`].
    #[must_use]
    pub const fn new(
        feature: &'a FeatureRef,
        result: &'a ScenarioResult,
        depth: usize,
    ) -> Self {
        Self {
            feature,
            result,
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ScenarioRef;

    struct Noop;

    impl RuntimeHook for Noop {}

    #[test]
    fn defaults_are_no_ops() {
        let hook = Noop;
        let feature = FeatureRef::new("f", "f.feature", 1);
        let feat_res = FeatureResult::new(feature.clone());
        let sc_res = ScenarioResult::new(ScenarioRef::new("s", 2));
        let step = StepRef::new("Given", "x", 3);
        let sc = ScenarioContext::new(&feature, &sc_res, 0);

        hook.before_suite(&SuiteContext::default());
        assert!(hook.before_feature(&FeatureContext::new(&feat_res)));
        assert!(hook.before_scenario(&sc));
        assert!(hook.before_step(&step, &sc));
        hook.after_step(&StepResult::passed(step.clone(), 1), &sc);
        hook.after_scenario(&sc);
        assert!(hook.after_feature(&FeatureContext::new(&feat_res)).is_ok());
        assert!(hook.after_suite(&SuiteContext::default()).is_ok());
    }

    #[test]
    fn feature_context_takes_call_depth() {
        let res = FeatureResult::new(FeatureRef::new("f", "f.feature", 1)).called_at(3);

        assert_eq!(FeatureContext::new(&res).depth, 3);
    }

    #[test]
    fn hooks_are_object_safe() {
        let hooks: Vec<Box<dyn RuntimeHook>> = vec![Box::new(Noop)];

        assert!(hooks[0].before_feature(&FeatureContext::new(&FeatureResult::new(
            FeatureRef::new("f", "f.feature", 1),
        ))));
    }
}
