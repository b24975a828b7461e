// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTML report collaborator.

use std::path::{Path, PathBuf};

use crate::{result::FeatureResult, Result};

/// Renderer of HTML reports, driven by a [`ReportingHook`].
///
/// Implementors are shared between concurrent workers, so must guard their
/// summary state themselves.
///
/// [`ReportingHook`]: super::ReportingHook
pub trait HtmlReport: Send + Sync {
    /// Persists the HTML report of a single top-level [`FeatureResult`] under
    /// `target_dir`, returning the path of the written file.
    ///
    /// # Errors
    ///
    /// If rendering or writing the report fails.
    fn save_feature(
        &self,
        target_dir: &Path,
        result: &FeatureResult,
    ) -> Result<PathBuf>;

    /// Accumulates the given top-level [`FeatureResult`] into the run
    /// summary.
    fn add_to_summary(&self, result: &FeatureResult);

    /// Persists the accumulated run summary under `target_dir`, returning the
    /// path of the written file.
    ///
    /// # Errors
    ///
    /// If rendering or writing the summary fails.
    fn save_summary(&self, target_dir: &Path) -> Result<PathBuf>;
}
