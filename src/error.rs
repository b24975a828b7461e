// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of report generation.

use std::{io, path::PathBuf};

use derive_more::{Display, Error, From};

/// Error occurred while producing a report artifact.
///
/// Artifact failures are never recovered at this layer: they're propagated to
/// the invoking runtime, failing that artifact only, not the whole run.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Failed to write an artifact to the filesystem.
    #[display("failed to write report `{}`: {source}", path.display())]
    #[from(ignore)]
    Io {
        /// Path of the artifact being written.
        path: PathBuf,

        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to serialize an artifact into JSON.
    #[display("failed to serialize report into JSON: {_0}")]
    Json(serde_json::Error),

    /// HTML report collaborator failed.
    #[display("HTML report failed: {_0}")]
    #[from(ignore)]
    Html(
        #[error(not(source))]
        Box<dyn std::error::Error + Send + Sync + 'static>,
    ),
}

impl Error {
    /// Creates an [`Error::Io`] for the given artifact `path`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps an error reported by an HTML report collaborator.
    #[must_use]
    pub fn html(
        err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self::Html(err.into())
    }

    /// Returns the artifact path this [`Error`] relates to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Json(_) | Self::Html(_) => None,
        }
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
