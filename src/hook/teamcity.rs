// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [TeamCity service messages][1] consumed by CI servers and IDEs to render
//! live test progress.
//!
//! Everything here is a pure function over explicit fields, so may be freely
//! called from concurrent workers.
//!
//! [1]: https://www.jetbrains.com/help/teamcity/service-messages.html

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

/// Prefix of every service message line.
pub const PREFIX: &str = "##teamcity";

/// [`chrono::format::strftime`] pattern of message timestamps
/// (`yyyy-MM-dd'T'hh:mm:ss.SSSZ`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%I:%M:%S%.3f%z";

/// Escapes a free-text value placed into a service message.
///
/// `|` goes first, otherwise the escapes of later substitutions would be
/// escaped again.
#[must_use]
pub fn escape(source: &str) -> String {
    source
        .replace('|', "||")
        .replace('\n', "|n")
        .replace('\r', "|r")
        .replace('\'', "|'")
        .replace('[', "|[")
        .replace(']', "|]")
}

/// Formats the given moment as a message timestamp.
#[must_use]
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Returns the current local time as a message timestamp.
#[must_use]
pub fn now() -> String {
    format_timestamp(&Local::now())
}

/// Single service message.
///
/// Free-text fields are passed raw and escaped while rendering.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Message<'a> {
    /// Reporting has started.
    EnteredTheMatrix,

    /// A top-level [`Feature`] has started.
    ///
    /// [`Feature`]: gherkin::Feature
    TestSuiteStarted {
        /// `<absolute path>:<line>` of the [`Feature`].
        ///
        /// [`Feature`]: gherkin::Feature
        location: &'a str,

        /// Name of the [`Feature`].
        ///
        /// [`Feature`]: gherkin::Feature
        name: &'a str,
    },

    /// A top-level [`Feature`] has finished.
    ///
    /// [`Feature`]: gherkin::Feature
    TestSuiteFinished {
        /// Name of the [`Feature`].
        ///
        /// [`Feature`]: gherkin::Feature
        name: &'a str,
    },

    /// A top-level [`Scenario`] has started.
    ///
    /// [`Scenario`]: gherkin::Scenario
    TestStarted {
        /// `<absolute feature path>:<line>` of the [`Scenario`].
        ///
        /// [`Scenario`]: gherkin::Scenario
        location: &'a str,

        /// Name of the [`Scenario`].
        ///
        /// [`Scenario`]: gherkin::Scenario
        name: &'a str,
    },

    /// A top-level [`Scenario`] has failed.
    ///
    /// [`Scenario`]: gherkin::Scenario
    TestFailed {
        /// Details of the failure (everything after its first line).
        details: &'a str,

        /// Title of the failure (its first line).
        message: &'a str,

        /// Name of the [`Scenario`].
        ///
        /// [`Scenario`]: gherkin::Scenario
        name: &'a str,
    },

    /// A top-level [`Scenario`] has finished.
    ///
    /// [`Scenario`]: gherkin::Scenario
    TestFinished {
        /// Duration of the [`Scenario`] in whole milliseconds.
        ///
        /// [`Scenario`]: gherkin::Scenario
        duration_millis: u64,

        /// Name of the [`Scenario`].
        ///
        /// [`Scenario`]: gherkin::Scenario
        name: &'a str,
    },
}

impl Message<'_> {
    /// Renders this [`Message`] as a single line (without a trailing newline)
    /// stamped with the given `timestamp`.
    #[must_use]
    pub fn render(&self, timestamp: &str) -> String {
        match *self {
            Self::EnteredTheMatrix => {
                format!("{PREFIX}[enteredTheMatrix timestamp='{timestamp}']")
            }
            Self::TestSuiteStarted { location, name } => format!(
                "{PREFIX}[testSuiteStarted timestamp='{timestamp}' \
                 locationHint='file://{location}' name='{}']",
                escape(name),
            ),
            Self::TestSuiteFinished { name } => format!(
                "{PREFIX}[testSuiteFinished timestamp='{timestamp}' \
                 name='{}']",
                escape(name),
            ),
            Self::TestStarted { location, name } => format!(
                "{PREFIX}[testStarted timestamp='{timestamp}' \
                 locationHint='{location}' captureStandardOutput='true' \
                 name='{}']",
                escape(name),
            ),
            Self::TestFailed {
                details,
                message,
                name,
            } => format!(
                "{PREFIX}[testFailed timestamp='{timestamp}' details='{}' \
                 message='{}' name='{}' ]",
                escape(details),
                escape(message),
                escape(name),
            ),
            Self::TestFinished {
                duration_millis,
                name,
            } => format!(
                "{PREFIX}[testFinished timestamp='{timestamp}' \
                 duration='{duration_millis}' name='{}']",
                escape(name),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone as _};

    use super::*;

    const TS: &str = "2024-03-05T01:02:03.004+0000";

    #[test]
    fn escapes_protocol_characters() {
        assert_eq!(escape("a|b"), "a||b");
        assert_eq!(escape("a[b]"), "a|[b|]");
        assert_eq!(escape("x\ny"), "x|ny");
        assert_eq!(escape("x\r\ny"), "x|r|ny");
        assert_eq!(escape("it's"), "it|'s");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn escapes_pipe_first() {
        assert_eq!(escape("|\n"), "|||n");
        assert_eq!(escape("[|]"), "|[|||]");
    }

    #[test]
    fn formats_timestamp_with_twelve_hour_clock_and_offset() {
        let at = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, 13, 2, 3)
            .unwrap();

        assert_eq!(format_timestamp(&at), "2024-03-05T01:02:03.000+0200");
    }

    #[test]
    fn renders_entered_the_matrix() {
        assert_eq!(
            Message::EnteredTheMatrix.render(TS),
            format!("##teamcity[enteredTheMatrix timestamp='{TS}']"),
        );
    }

    #[test]
    fn renders_suite_messages() {
        let started = Message::TestSuiteStarted {
            location: "/w/cats.feature:1",
            name: "Cats [v2]",
        };
        let finished = Message::TestSuiteFinished { name: "Cats [v2]" };

        assert_eq!(
            started.render(TS),
            format!(
                "##teamcity[testSuiteStarted timestamp='{TS}' \
                 locationHint='file:///w/cats.feature:1' name='Cats |[v2|]']",
            ),
        );
        assert_eq!(
            finished.render(TS),
            format!("##teamcity[testSuiteFinished timestamp='{TS}' name='Cats |[v2|]']"),
        );
    }

    #[test]
    fn renders_test_messages() {
        let started = Message::TestStarted {
            location: "/w/cats.feature:3",
            name: "meow",
        };
        let failed = Message::TestFailed {
            details: "at line 4\nat line 5",
            message: "expected 'a'",
            name: "meow",
        };
        let finished = Message::TestFinished {
            duration_millis: 1234,
            name: "meow",
        };

        assert_eq!(
            started.render(TS),
            format!(
                "##teamcity[testStarted timestamp='{TS}' \
                 locationHint='/w/cats.feature:3' \
                 captureStandardOutput='true' name='meow']",
            ),
        );
        assert_eq!(
            failed.render(TS),
            format!(
                "##teamcity[testFailed timestamp='{TS}' \
                 details='at line 4|nat line 5' message='expected |'a|'' \
                 name='meow' ]",
            ),
        );
        assert_eq!(
            finished.render(TS),
            format!(
                "##teamcity[testFinished timestamp='{TS}' duration='1234' \
                 name='meow']",
            ),
        );
    }
}
