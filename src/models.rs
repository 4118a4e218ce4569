use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::license::matcher::MatchResult;
use crate::license::templates::Template;

/// One package as reported by a [`Resolver`](crate::resolver::Resolver).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageInfo {
    /// Unique, `/`-separated package identifier.
    pub import_path: String,
    #[serde(default)]
    pub name: String,
    /// Directory holding the package sources.
    #[serde(default)]
    pub dir: PathBuf,
    /// Top of the tree the package lives in. The license search never climbs
    /// above it.
    #[serde(default)]
    pub source_root: PathBuf,
    /// Set when the resolver could not load the package.
    #[serde(default)]
    pub error: Option<String>,
}

/// A report row: one package, or after grouping, every package sharing one
/// license file.
#[derive(Debug, Clone, PartialEq)]
pub struct License<'a> {
    pub package: String,
    /// License file, `None` when nothing license-like was found.
    pub path: Option<PathBuf>,
    pub template: Option<&'a Template>,
    pub score: f64,
    pub extra_words: Vec<String>,
    pub missing_words: Vec<String>,
    pub err: Option<String>,
    pub risk: LicenseRisk,
    pub verdict: PolicyVerdict,
}

impl<'a> License<'a> {
    /// Row for a package without any license file.
    pub fn unlicensed(package: &str) -> Self {
        Self {
            package: package.to_string(),
            path: None,
            template: None,
            score: 0.0,
            extra_words: Vec::new(),
            missing_words: Vec::new(),
            err: None,
            risk: LicenseRisk::Unknown,
            verdict: PolicyVerdict::Warn,
        }
    }

    /// Row for a package the resolver failed to load.
    pub fn failed(package: &str, err: &str) -> Self {
        Self {
            err: Some(err.to_string()),
            ..Self::unlicensed(package)
        }
    }

    /// Row for a package whose license file at `path` was scored.
    pub fn matched(package: &str, path: PathBuf, result: MatchResult<'a>) -> Self {
        Self {
            path: Some(path),
            template: result.template,
            score: result.score,
            extra_words: result.extra_words,
            missing_words: result.missing_words,
            ..Self::unlicensed(package)
        }
    }

    /// Whether the best template is trustworthy at the given threshold.
    pub fn is_identified(&self, confidence: f64) -> bool {
        self.template.is_some() && self.score >= confidence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LicenseRisk {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Unknown,
}

impl std::fmt::Display for LicenseRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseRisk::Permissive => write!(f, "Permissive"),
            LicenseRisk::WeakCopyleft => write!(f, "Weak Copyleft"),
            LicenseRisk::StrongCopyleft => write!(f, "Strong Copyleft"),
            LicenseRisk::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PolicyVerdict {
    Pass,
    Warn,
    Error,
}

impl std::fmt::Display for PolicyVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyVerdict::Pass => write!(f, "pass"),
            PolicyVerdict::Warn => write!(f, "warn"),
            PolicyVerdict::Error => write!(f, "error"),
        }
    }
}
