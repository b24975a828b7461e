// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of a [`ReportingHook`].
//!
//! [`ReportingHook`]: super::ReportingHook

use std::path::PathBuf;

use smart_default::SmartDefault;

/// Default directory report artifacts are written into.
pub const DEFAULT_OUTPUT_DIR: &str = "target/bdd-reports";

/// CLI options of a [`ReportingHook`], fixed for the whole run.
///
/// Meant to be flattened into the CLI of a runner.
///
/// [`ReportingHook`]: super::ReportingHook
#[derive(Clone, Debug, Eq, PartialEq, SmartDefault, clap::Args)]
#[group(skip)]
pub struct Cli {
    /// Generate HTML reports of features and a run summary.
    #[arg(id = "report-html", long = "report-html", global = true)]
    pub html: bool,

    /// Directory to write report artifacts into.
    #[arg(
        id = "report-dir",
        long = "report-dir",
        value_name = "dir",
        default_value = DEFAULT_OUTPUT_DIR,
        global = true
    )]
    #[default(PathBuf::from(DEFAULT_OUTPUT_DIR))]
    pub output_dir: PathBuf,

    /// Print TeamCity service messages for IDE and CI integration.
    #[arg(id = "report-ide", long = "report-ide", global = true)]
    pub ide: bool,

    /// Number of threads the run is executed with.
    #[arg(
        id = "report-threads",
        long = "report-threads",
        value_name = "n",
        default_value_t = 1,
        global = true
    )]
    #[default = 1]
    pub threads: usize,
}

impl Cli {
    /// Creates new [`Cli`] writing artifacts into the given `output_dir`,
    /// with other options set to defaults.
    #[must_use]
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Opts {
        #[command(flatten)]
        report: Cli,
    }

    #[test]
    fn default_matches_parsed_defaults() {
        let opts = Opts::try_parse_from(["runner"]).unwrap();

        assert_eq!(opts.report, Cli::default());
        assert_eq!(opts.report.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(opts.report.threads, 1);
        assert!(!opts.report.html);
        assert!(!opts.report.ide);
    }

    #[test]
    fn parses_all_options() {
        let opts = Opts::try_parse_from([
            "runner",
            "--report-html",
            "--report-ide",
            "--report-dir",
            "out/reports",
            "--report-threads",
            "4",
        ])
        .unwrap();

        assert!(opts.report.html);
        assert!(opts.report.ide);
        assert_eq!(opts.report.output_dir, PathBuf::from("out/reports"));
        assert_eq!(opts.report.threads, 4);
    }

    #[test]
    fn rejects_non_numeric_threads() {
        assert!(Opts::try_parse_from(["runner", "--report-threads", "many"]).is_err());
    }

    #[test]
    fn with_output_dir_keeps_other_defaults() {
        let cli = Cli::with_output_dir("elsewhere");

        assert_eq!(cli.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(cli.threads, 1);
        assert!(!cli.html);
    }
}
