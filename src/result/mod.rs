// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Outcomes of executed [`Feature`]s, [`Scenario`]s and [`Step`]s.
//!
//! Records are produced incrementally by an execution engine and handed
//! read-only to [`RuntimeHook`]s once finished:
//!
//! - [`step`]: [`StepResult`] and its [`Status`]/[`StepError`]
//! - [`scenario`]: [`ScenarioResult`]
//! - [`feature`]: [`FeatureResult`] with its caller depth
//! - [`results`]: run-wide [`Results`]
//!
//! [`Feature`]: gherkin::Feature
//! [`RuntimeHook`]: crate::RuntimeHook
//! [`Scenario`]: gherkin::Scenario
//! [`Step`]: gherkin::Step

pub mod feature;
pub mod results;
pub mod scenario;
pub mod step;

pub use self::{
    feature::{FeatureRef, FeatureResult},
    results::{Results, ResultsSnapshot},
    scenario::{ScenarioRef, ScenarioResult},
    step::{Status, StepError, StepRef, StepResult},
};
