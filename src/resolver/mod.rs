//! Dependency enumeration backends.
//!
//! A [`Resolver`] turns root package identifiers into the flat list of
//! packages to report on, together with where their sources live.
//!
//! - [`go`] — drives `go list` for Go packages.
//! - [`listing`] — reads a JSON package listing produced by any other tool.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::PackageInfo;

pub mod go;
pub mod listing;

pub trait Resolver {
    /// Sorted, deduplicated transitive dependencies of `package`, excluding
    /// the package itself.
    ///
    /// Fails with [`LicenseError::Missing`](crate::error::LicenseError::Missing)
    /// when `package` cannot be found or has nothing to build.
    fn dependencies(&self, package: &str) -> Result<Vec<String>>;

    /// Identifiers belonging to the language's standard distribution.
    fn standard_packages(&self) -> Result<HashSet<String>>;

    /// Metadata for each of `packages`, in the same order.
    fn package_info(&self, packages: &[String]) -> Result<Vec<PackageInfo>>;
}
