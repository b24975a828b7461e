// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [JUnit XML report][1] artifacts.
//!
//! Every [`Feature`] becomes a single `testsuite` document with a `testcase`
//! per [`Scenario`]. Step outcomes are rendered as dotted lines into either a
//! `failure` or a `system-out` element of their `testcase`.
//!
//! [`Feature`]: gherkin::Feature
//! [`Scenario`]: gherkin::Scenario
//! [1]: https://llg.cubic.org/docs/junit

use std::{
    borrow::Cow,
    fmt,
    iter,
    path::{Path, PathBuf},
};

use crate::{
    result::{FeatureResult, ScenarioResult, StepError, StepResult},
    Result,
};

use super::{format_seconds, write_artifact};

/// XML declaration opening every document.
const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n";

/// Minimal width of a rendered step line before its status word.
const STEP_LINE_WIDTH: usize = 75;

/// Renders the given [`FeatureResult`] as a [JUnit XML][1] document.
///
/// [1]: https://llg.cubic.org/docs/junit
#[must_use]
pub fn feature_xml(result: &FeatureResult) -> String {
    let mut xml = String::from(XML_DECLARATION);
    render_suite(&mut xml, result)
        .unwrap_or_else(|_| unreachable!("writing into `String` never fails"));
    xml
}

/// Writes the given [`FeatureResult`] as a [JUnit XML][1] document into
/// `target_dir`.
///
/// `file_name` defaults to `<qualified name>.xml`.
///
/// # Errors
///
/// If writing the file fails.
///
/// [1]: https://llg.cubic.org/docs/junit
pub fn write_feature_xml(
    target_dir: impl AsRef<Path>,
    result: &FeatureResult,
    file_name: Option<&str>,
) -> Result<PathBuf> {
    let xml = feature_xml(result);
    let file_name = file_name.map_or_else(
        || format!("{}.xml", result.feature.qualified_name),
        ToOwned::to_owned,
    );
    write_artifact(target_dir.as_ref(), &file_name, &xml)
}

/// Renders the `testsuite` element of a [`FeatureResult`].
fn render_suite(out: &mut impl fmt::Write, result: &FeatureResult) -> fmt::Result {
    writeln!(
        out,
        "<testsuite name=\"{}\" skipped=\"0\" tests=\"{}\" failures=\"{}\" \
         time=\"{}\">",
        escape(&result.feature.display_uri, Escape::Attribute),
        result.scenario_count(),
        result.failed_count(),
        format_seconds(result.duration_nanos()),
    )?;
    for (ordinal, sc) in (1..).zip(&result.scenario_results) {
        render_case(out, &result.feature.qualified_name, ordinal, sc)?;
    }
    out.write_str("</testsuite>\n")
}

/// Renders the `testcase` element of a [`ScenarioResult`] at the given
/// 1-based `ordinal`.
fn render_case(
    out: &mut impl fmt::Write,
    class_name: &str,
    ordinal: usize,
    sc: &ScenarioResult,
) -> fmt::Result {
    let name = if sc.scenario.name.trim().is_empty() {
        Cow::Owned(ordinal.to_string())
    } else {
        Cow::Borrowed(sc.scenario.name.as_str())
    };
    writeln!(
        out,
        "  <testcase classname=\"{}\" name=\"{}\" time=\"{}\">",
        escape(class_name, Escape::Attribute),
        escape(&name, Escape::Attribute),
        format_seconds(sc.duration_nanos),
    )?;

    let (lines, failure) = step_lines(&sc.step_results);
    let lines = escape(&lines, Escape::Text);
    match failure {
        Some(message) => writeln!(
            out,
            "    <failure message=\"{}\">{lines}</failure>",
            escape(message, Escape::Attribute),
        )?,
        None => writeln!(out, "    <system-out>{lines}</system-out>")?,
    }

    out.write_str("  </testcase>\n")
}

/// Renders every [`StepResult`] as a dotted status line, appending the full
/// error text after each failed one.
///
/// Returns the rendered lines along with the message of the first failure,
/// if any [`StepResult`] has failed.
fn step_lines(steps: &[StepResult]) -> (String, Option<&str>) {
    let mut out = String::new();
    let mut failure = None;

    for step in steps {
        let line = format!("{} {} ", step.step.prefix, step.step.text);
        let dots = STEP_LINE_WIDTH.saturating_sub(line.chars().count()).max(1);
        out.push_str(&line);
        out.extend(iter::repeat('.').take(dots));
        out.push(' ');
        out.push_str(&step.status.to_string());
        out.push('\n');

        if step.is_failed() {
            let error = step.error.as_ref();
            _ = failure.get_or_insert_with(|| error.map_or("", StepError::message));
            out.push_str("\nStack Trace:\n");
            out.push_str(error.map_or("", StepError::full_text));
            out.push('\n');
        }
    }

    (out, failure)
}

/// Context a string is escaped for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Escape {
    /// Element text content.
    Text,

    /// Double-quoted attribute value.
    Attribute,
}

/// Escapes the given `input` for embedding into XML.
fn escape(input: &str, ctx: Escape) -> Cow<'_, str> {
    let needs_escape = |c: char| match c {
        '&' | '<' | '>' => true,
        '"' | '\n' | '\r' | '\t' => ctx == Escape::Attribute,
        _ => false,
    };
    if !input.contains(needs_escape) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if ctx == Escape::Attribute => out.push_str("&quot;"),
            '\n' if ctx == Escape::Attribute => out.push_str("&#10;"),
            '\r' if ctx == Escape::Attribute => out.push_str("&#13;"),
            '\t' if ctx == Escape::Attribute => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{FeatureRef, ScenarioRef, StepRef};

    fn passing(name: &str, nanos: u64) -> ScenarioResult {
        let mut sc = ScenarioResult::new(ScenarioRef::new(name, 3));
        sc.add_step_result(StepResult::passed(StepRef::new("Given", "a cat", 4), nanos));
        sc
    }

    fn failing(name: &str) -> ScenarioResult {
        let mut sc = ScenarioResult::new(ScenarioRef::new(name, 8));
        sc.add_step_result(StepResult::failed(
            StepRef::new("When", "it barks", 9),
            StepError::new("cats <don't> bark")
                .with_stack_trace("cats <don't> bark\n  at barks.feature:9"),
            500_000_000,
        ));
        sc.add_step_result(StepResult::skipped(StepRef::new("Then", "nothing", 10)));
        sc
    }

    fn feature(scenarios: Vec<ScenarioResult>) -> FeatureResult {
        let mut res = FeatureResult::new(FeatureRef::new("Cats", "animals/cats.feature", 1));
        for sc in scenarios {
            res.add_scenario_result(sc);
        }
        res
    }

    #[test]
    fn renders_suite_attributes() {
        let xml = feature_xml(&feature(vec![
            passing("purr", 1_000_000_000),
            failing("bark"),
        ]));

        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(
            "<testsuite name=\"animals/cats.feature\" skipped=\"0\" tests=\"2\" \
             failures=\"1\" time=\"1.5\">",
        ), "{xml}");
        assert_eq!(xml.matches("<testcase ").count(), 2);
        assert!(xml.trim_end().ends_with("</testsuite>"));
    }

    #[test]
    fn renders_testcases_in_order() {
        let xml = feature_xml(&feature(vec![passing("first", 0), passing("second", 0)]));

        let first = xml.find("name=\"first\"").unwrap();
        let second = xml.find("name=\"second\"").unwrap();
        assert!(first < second);
        assert!(xml.contains("classname=\"animals.cats\""));
    }

    #[test]
    fn blank_scenario_name_falls_back_to_ordinal() {
        let xml = feature_xml(&feature(vec![passing("named", 0), passing("   ", 0)]));

        assert!(xml.contains("name=\"2\""), "{xml}");
    }

    #[test]
    fn passed_scenario_goes_to_system_out() {
        let xml = feature_xml(&feature(vec![passing("purr", 250_000)]));

        assert!(xml.contains("time=\"0.00025\""), "{xml}");
        assert!(xml.contains("<system-out>Given a cat ...."));
        assert!(!xml.contains("<failure"));
    }

    #[test]
    fn failed_scenario_goes_to_failure() {
        let xml = feature_xml(&feature(vec![failing("bark")]));

        assert!(xml.contains("<failure message=\"cats &lt;don't&gt; bark\">"), "{xml}");
        assert!(xml.contains("Stack Trace:\ncats &lt;don't&gt; bark\n  at barks.feature:9\n"));
        assert!(xml.contains(" skipped\n"), "all steps are rendered: {xml}");
        assert!(!xml.contains("<system-out>"));
    }

    #[test]
    fn step_lines_are_padded_to_width() {
        let steps = vec![StepResult::passed(StepRef::new("Given", "x", 1), 0)];

        let (lines, failure) = step_lines(&steps);

        assert!(failure.is_none());
        let line = lines.lines().next().unwrap();
        assert!(line.starts_with("Given x ..."));
        assert_eq!(line, format!("Given x {} passed", ".".repeat(75 - 8)));
    }

    #[test]
    fn long_step_line_gets_single_dot() {
        let text = "y".repeat(100);
        let steps = vec![StepResult::passed(StepRef::new("And", text.clone(), 1), 0)];

        let (lines, _) = step_lines(&steps);

        assert_eq!(lines, format!("And {text} . passed\n"));
    }

    #[test]
    fn failure_message_is_first_error() {
        let steps = vec![
            StepResult::failed(StepRef::new("When", "a", 1), StepError::new("first"), 0),
            StepResult::failed(StepRef::new("Then", "b", 2), StepError::new("second"), 0),
        ];

        let (lines, failure) = step_lines(&steps);

        assert_eq!(failure, Some("first"));
        assert_eq!(lines.matches("Stack Trace:").count(), 2);
    }

    #[test]
    fn missing_error_message_renders_empty() {
        let steps = vec![StepResult::failed(
            StepRef::new("When", "a", 1),
            StepError::default(),
            0,
        )];

        let (_, failure) = step_lines(&steps);

        assert_eq!(failure, Some(""));
    }

    #[test]
    fn escapes_attributes_and_text() {
        assert_eq!(escape("a\"b\nc", Escape::Attribute), "a&quot;b&#10;c");
        assert_eq!(escape("a\"b\nc", Escape::Text), "a\"b\nc");
        assert_eq!(escape("x & <y>", Escape::Text), "x &amp; &lt;y&gt;");
        assert!(matches!(escape("plain", Escape::Attribute), Cow::Borrowed(_)));
    }
}
