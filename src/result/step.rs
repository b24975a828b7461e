// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Step`] outcomes.
//!
//! [`Step`]: gherkin::Step

use derive_more::with_trait::Display;
use serde::Serialize;

/// Reference to an executed [`Step`] of a `.feature` file.
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StepRef {
    /// Keyword prefix of the [`Step`] (`Given`, `When`, `*`, etc.).
    ///
    /// [`Step`]: gherkin::Step
    pub prefix: String,

    /// Text of the [`Step`] following its keyword.
    ///
    /// [`Step`]: gherkin::Step
    pub text: String,

    /// Line number of the [`Step`] in its `.feature` file.
    ///
    /// [`Step`]: gherkin::Step
    pub line: usize,
}

impl StepRef {
    /// Creates a new [`StepRef`].
    #[must_use]
    pub fn new(
        prefix: impl Into<String>,
        text: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            text: text.into(),
            line,
        }
    }
}

impl From<&gherkin::Step> for StepRef {
    fn from(step: &gherkin::Step) -> Self {
        Self::new(step.keyword.trim(), step.value.as_str(), step.position.line)
    }
}

/// Possible outcomes of a [`Step`].
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// [`Step`] passed.
    ///
    /// [`Step`]: gherkin::Step
    #[display("passed")]
    Passed,

    /// [`Step`] failed.
    ///
    /// [`Step`]: gherkin::Step
    #[display("failed")]
    Failed,

    /// [`Step`] was skipped.
    ///
    /// [`Step`]: gherkin::Step
    #[display("skipped")]
    Skipped,
}

/// Error a [`Step`] has failed with.
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepError {
    /// Message of the error, if any was provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Full stack trace text of the error, if captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl StepError {
    /// Creates a new [`StepError`] with the given `message` only.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            stack_trace: None,
        }
    }

    /// Attaches the full `stack_trace` text to this [`StepError`].
    #[must_use]
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Returns the message of this [`StepError`], or an empty string if there
    /// is none.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Returns the full text of this [`StepError`]: its stack trace if
    /// captured, or its message otherwise.
    #[must_use]
    pub fn full_text(&self) -> &str {
        self.stack_trace.as_deref().unwrap_or_else(|| self.message())
    }
}

/// Outcome of a single executed [`Step`].
///
/// Immutable once the [`Step`] has finished.
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// [`Step`] this result belongs to.
    ///
    /// [`Step`]: gherkin::Step
    pub step: StepRef,

    /// [`Status`] of the [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    pub status: Status,

    /// [`StepError`] of a [`Status::Failed`] [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,

    /// Elapsed time in nanoseconds.
    pub duration_nanos: u64,
}

impl StepResult {
    /// Creates a [`Status::Passed`] [`StepResult`].
    #[must_use]
    pub const fn passed(step: StepRef, duration_nanos: u64) -> Self {
        Self {
            step,
            status: Status::Passed,
            error: None,
            duration_nanos,
        }
    }

    /// Creates a [`Status::Skipped`] [`StepResult`].
    #[must_use]
    pub const fn skipped(step: StepRef) -> Self {
        Self {
            step,
            status: Status::Skipped,
            error: None,
            duration_nanos: 0,
        }
    }

    /// Creates a [`Status::Failed`] [`StepResult`] with the given `error`.
    #[must_use]
    pub const fn failed(
        step: StepRef,
        error: StepError,
        duration_nanos: u64,
    ) -> Self {
        Self {
            step,
            status: Status::Failed,
            error: Some(error),
            duration_nanos,
        }
    }

    /// Indicates whether this [`StepResult`] is [`Status::Failed`].
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == Status::Failed
    }
}
