use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::error::{self, LicenseError};
use crate::models::PackageInfo;

/// A package listing written by an external tool:
///
/// ```json
/// {
///   "standard": ["fmt"],
///   "packages": [
///     {"import_path": "colors/red", "dir": "src/colors/red", "deps": ["colors/blue"]}
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    standard: Vec<String>,
    #[serde(default)]
    packages: Vec<ListedPackage>,
}

#[derive(Debug, Deserialize)]
struct ListedPackage {
    #[serde(flatten)]
    info: PackageInfo,
    /// Direct dependencies only; the closure is computed here.
    #[serde(default)]
    deps: Vec<String>,
}

fn not_found(package: &str) -> String {
    format!("cannot find package \"{}\" in listing", package)
}

/// Resolves packages from a JSON listing instead of a language toolchain.
pub struct ListingResolver {
    standard: HashSet<String>,
    packages: HashMap<String, ListedPackage>,
}

impl ListingResolver {
    /// Load a listing from disk. Relative `dir` and `source_root` entries
    /// are taken relative to the listing file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read package listing {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&content, base)
            .with_context(|| format!("Invalid package listing {}", path.display()))
    }

    pub fn parse(content: &str, base: &Path) -> Result<Self> {
        let listing: Listing = serde_json::from_str(content)?;
        let mut packages = HashMap::with_capacity(listing.packages.len());
        for mut p in listing.packages {
            if p.info.dir.as_os_str().is_empty() && p.info.error.is_none() {
                bail!("package {} has neither a `dir` nor an `error`", p.info.import_path);
            }
            if !p.info.dir.as_os_str().is_empty() {
                p.info.dir = base.join(&p.info.dir);
            }
            if !p.info.source_root.as_os_str().is_empty() {
                p.info.source_root = base.join(&p.info.source_root);
            }
            packages.insert(p.info.import_path.clone(), p);
        }
        Ok(Self {
            standard: listing.standard.into_iter().collect(),
            packages,
        })
    }
}

impl super::Resolver for ListingResolver {
    fn dependencies(&self, package: &str) -> error::Result<Vec<String>> {
        let root = self
            .packages
            .get(package)
            .ok_or_else(|| LicenseError::Missing(not_found(package)))?;
        if let Some(err) = &root.info.error {
            return Err(LicenseError::Missing(err.clone()));
        }

        let mut seen = BTreeSet::new();
        let mut stack: Vec<&str> = root.deps.iter().map(String::as_str).collect();
        while let Some(dep) = stack.pop() {
            if dep == package || !seen.insert(dep.to_string()) {
                continue;
            }
            if let Some(listed) = self.packages.get(dep) {
                stack.extend(listed.deps.iter().map(String::as_str));
            }
        }
        Ok(seen.into_iter().collect())
    }

    fn standard_packages(&self) -> error::Result<HashSet<String>> {
        Ok(self.standard.clone())
    }

    fn package_info(&self, packages: &[String]) -> error::Result<Vec<PackageInfo>> {
        Ok(packages
            .iter()
            .map(|id| match self.packages.get(id) {
                Some(listed) => listed.info.clone(),
                None => PackageInfo {
                    import_path: id.clone(),
                    name: String::new(),
                    dir: Default::default(),
                    source_root: Default::default(),
                    error: Some(not_found(id)),
                },
            })
            .collect())
    }
}
