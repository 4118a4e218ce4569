use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the identification engine and its resolvers.
///
/// Everything here aborts the run except [`LicenseError::Missing`], which the
/// scan records on that package's row.
#[derive(Error, Debug)]
pub enum LicenseError {
    /// The requested package is unknown or has nothing buildable in it.
    #[error("{0}")]
    Missing(String),

    #[error("dependency resolution failed: {0}")]
    Resolution(String),

    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read license file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "packages share the same license file {} but no common prefix: {}",
        path.display(),
        packages.join(", ")
    )]
    GroupingConflict { path: PathBuf, packages: Vec<String> },

    #[error("invalid license template {name}: {reason}")]
    Corpus { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, LicenseError>;
