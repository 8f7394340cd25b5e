use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain the module identifier from `go.mod`.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to open {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("module name not found in {path}")]
    MissingModule { path: PathBuf },
}

/// Fatal errors. Each variant names the stage that could not run.
///
/// A coverage value under the threshold is not an error; see
/// [`crate::model::Verdict`].
#[derive(Error, Debug)]
pub enum NewcovError {
    #[error("error parsing go.mod: {0}")]
    Manifest(#[from] ManifestError),

    #[error("error reading cover profile {path}: {source}")]
    CoverProfile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error reading diff: {0}")]
    Diff(String),

    #[error("function extraction cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, NewcovError>;
