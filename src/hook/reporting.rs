// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default [`RuntimeHook`] producing report artifacts and live progress.

use std::{
    fmt, io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, PoisonError,
    },
};

use crate::{
    aggregate::{self, split_error_detail},
    result::{FeatureResult, Results},
    Result,
};

use super::{
    cli::Cli,
    html::HtmlReport,
    lock::TryLock,
    teamcity::{self, Message},
    FeatureContext, RuntimeHook, ScenarioContext, SuiteContext,
};

/// [`RuntimeHook`] writing per-feature [JSON] and [JUnit XML][1] artifacts,
/// run-wide statistics and, optionally, HTML reports and
/// [TeamCity service messages][2].
///
/// Shared between workers (usually via [`Arc`]), so every callback may be
/// entered concurrently. Only top-level [`Feature`]s and their [`Scenario`]s
/// are reported, the called ones are ignored.
///
/// [`Arc`]: std::sync::Arc
/// [`Feature`]: gherkin::Feature
/// [`Scenario`]: gherkin::Scenario
/// [JSON]: https://json.org
/// [1]: https://llg.cubic.org/docs/junit
/// [2]: https://www.jetbrains.com/help/teamcity/service-messages.html
pub struct ReportingHook<Out: io::Write = io::Stdout> {
    /// Options fixed for the whole run.
    cli: Cli,

    /// Run-wide counters.
    results: Results,

    /// Lock guarding writes of the run-wide statistics file.
    stats_lock: TryLock,

    /// HTML report collaborator, used only if [`Cli::html`] is set.
    html: Option<Box<dyn HtmlReport>>,

    /// Whether the HTML summary has been persisted already.
    summary_saved: AtomicBool,

    /// Whether the missing [`HtmlReport`] has been reported already.
    html_missing_reported: AtomicBool,

    /// Output service messages are written into.
    output: Mutex<Out>,
}

impl<Out: io::Write> fmt::Debug for ReportingHook<Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportingHook")
            .field("cli", &self.cli)
            .field("results", &self.results)
            .field("stats_lock", &self.stats_lock)
            .field("html", &self.html.is_some())
            .field("summary_saved", &self.summary_saved)
            .field("html_missing_reported", &self.html_missing_reported)
            .finish_non_exhaustive()
    }
}

impl ReportingHook {
    /// Creates a new [`ReportingHook`] printing service messages to
    /// [`io::Stdout`].
    #[must_use]
    pub fn new(cli: Cli) -> Self {
        Self::with_output(cli, io::stdout())
    }
}

impl<Out: io::Write> ReportingHook<Out> {
    /// Creates a new [`ReportingHook`] printing service messages to the given
    /// `output`.
    ///
    /// Announces itself right away if [`Cli::ide`] is set.
    #[must_use]
    pub fn with_output(cli: Cli, output: Out) -> Self {
        let hook = Self {
            results: Results::new(cli.threads),
            cli,
            stats_lock: TryLock::new(),
            html: None,
            summary_saved: AtomicBool::new(false),
            html_missing_reported: AtomicBool::new(false),
            output: Mutex::new(output),
        };
        if hook.cli.ide {
            hook.emit(&Message::EnteredTheMatrix);
        }
        hook
    }

    /// Attaches the given [`HtmlReport`], used only if [`Cli::html`] is set.
    #[must_use]
    pub fn with_html_report(mut self, html: impl HtmlReport + 'static) -> Self {
        self.html = Some(Box::new(html));
        self
    }

    /// Returns the run-wide [`Results`] accumulated so far.
    #[must_use]
    pub const fn results(&self) -> &Results {
        &self.results
    }

    /// Returns the [`Cli`] options of this [`ReportingHook`].
    #[must_use]
    pub const fn cli(&self) -> &Cli {
        &self.cli
    }

    /// Returns the [`HtmlReport`] to drive, if HTML reports are enabled.
    ///
    /// Warns once if they are enabled without any [`HtmlReport`] attached.
    fn html(&self) -> Option<&dyn HtmlReport> {
        if !self.cli.html {
            return None;
        }
        let html = self.html.as_deref();
        if html.is_none()
            && !self.html_missing_reported.swap(true, Ordering::Relaxed)
        {
            tracing::warn!(
                "HTML reports are enabled, but no `HtmlReport` is attached, \
                 skipping them"
            );
        }
        html
    }

    /// Persists the HTML report of the given top-level [`FeatureResult`] and
    /// adds it to the summary, if HTML reports are enabled.
    fn save_html(&self, result: &FeatureResult) -> Result<()> {
        let Some(html) = self.html() else {
            return Ok(());
        };
        let path = html.save_feature(&self.cli.output_dir, result)?;
        html.add_to_summary(result);
        tracing::debug!(path = %path.display(), "HTML report saved");
        Ok(())
    }

    /// Writes the given [`Message`] as a single line into the output.
    ///
    /// Failures are logged and otherwise ignored.
    fn emit(&self, msg: &Message<'_>) {
        let line = msg.render(&teamcity::now());
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to write service message");
        }
    }

    /// Writes the run-wide statistics, unless another worker is doing it
    /// right now.
    fn try_write_stats(&self) -> Result<()> {
        let Some(_guard) = self.stats_lock.try_lock() else {
            tracing::debug!("run stats are being written already, skipping");
            return Ok(());
        };
        _ = aggregate::write_run_stats(&self.cli.output_dir, &self.results)?;
        Ok(())
    }
}

impl<Out: io::Write + Send> RuntimeHook for ReportingHook<Out> {
    fn after_suite(&self, _: &SuiteContext) -> Result<()> {
        let Some(html) = self.html() else {
            return Ok(());
        };
        if self.summary_saved.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let path = html.save_summary(&self.cli.output_dir)?;
        tracing::info!(path = %path.display(), "HTML summary saved");
        Ok(())
    }

    fn before_feature(&self, ctx: &FeatureContext<'_>) -> bool {
        if self.cli.ide && ctx.depth == 0 {
            let feature = &ctx.result.feature;
            let location = format!(
                "{}:{}",
                feature.absolute_path().display(),
                feature.line,
            );
            self.emit(&Message::TestSuiteStarted {
                location: &location,
                name: feature.name_for_report(),
            });
        }
        true
    }

    fn after_feature(&self, ctx: &FeatureContext<'_>) -> Result<()> {
        if ctx.depth > 0 {
            return Ok(());
        }
        let result = ctx.result;
        if self.cli.ide {
            self.emit(&Message::TestSuiteFinished {
                name: result.feature.name_for_report(),
            });
        }

        _ = self.results.add_feature(result);
        if result.scenario_count() == 0 {
            tracing::debug!(
                feature = %result.feature.display_uri,
                "no scenarios, skipping artifacts"
            );
            return Ok(());
        }

        // Every artifact is attempted, a failed one doesn't stop the rest.
        let dir = &self.cli.output_dir;
        let attempts = [
            self.save_html(result),
            aggregate::write_feature_json(dir, result, None).map(drop),
            aggregate::write_feature_xml(dir, result, None).map(drop),
            self.try_write_stats(),
        ];

        let mut failure = None;
        for err in attempts.into_iter().filter_map(|r| r.err()) {
            if failure.is_some() {
                tracing::warn!(error = %err, "report artifact failed");
            } else {
                failure = Some(err);
            }
        }
        failure.map_or(Ok(()), Err)
    }

    fn before_scenario(&self, ctx: &ScenarioContext<'_>) -> bool {
        if self.cli.ide && ctx.depth == 0 {
            let location = format!(
                "{}:{}",
                ctx.feature.absolute_path().display(),
                ctx.result.scenario.line,
            );
            self.emit(&Message::TestStarted {
                location: &location,
                name: &ctx.result.scenario.name_for_report(),
            });
        }
        true
    }

    fn after_scenario(&self, ctx: &ScenarioContext<'_>) {
        if !self.cli.ide || ctx.depth > 0 {
            return;
        }
        let result = ctx.result;
        let name = result.scenario.name_for_report();
        if result.is_failed() {
            let detail = split_error_detail(
                result.error().map(|e| e.message()).unwrap_or_default(),
            );
            self.emit(&Message::TestFailed {
                details: &detail.detail,
                message: &detail.title,
                name: &name,
            });
        }
        self.emit(&Message::TestFinished {
            duration_millis: result.duration_nanos / 1_000_000,
            name: &name,
        });
    }
}
