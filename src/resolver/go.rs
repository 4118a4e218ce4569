use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;

use crate::error::{LicenseError, Result};
use crate::models::PackageInfo;

/// Fragments of `go list` diagnostics meaning the package does not exist or
/// has nothing to build.
const MISSING_MARKERS: &[&str] = &[
    "cannot find package",
    "no Go files",
    "no buildable Go source files",
    "is not in std",
    "no required module provides package",
    "matched no packages",
];

/// Subset of the `go list -json` package record we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackage {
    import_path: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    dir: PathBuf,
    #[serde(default)]
    root: PathBuf,
    #[serde(default)]
    deps: Vec<String>,
    error: Option<GoPackageError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackageError {
    err: String,
}

impl GoPackage {
    fn into_info(self) -> PackageInfo {
        // Packages that failed to load have no Dir; guess the GOPATH layout.
        let dir = if self.dir.as_os_str().is_empty() && !self.root.as_os_str().is_empty() {
            self.root.join("src").join(&self.import_path)
        } else {
            self.dir
        };
        PackageInfo {
            import_path: self.import_path,
            name: self.name,
            dir,
            source_root: self.root,
            error: self.error.map(|e| e.err),
        }
    }
}

fn is_missing(output: &str) -> bool {
    MISSING_MARKERS.iter().any(|m| output.contains(m))
}

/// `go list -json` prints one object per package, back to back.
fn parse_packages(data: &[u8]) -> Result<Vec<GoPackage>> {
    serde_json::Deserializer::from_slice(data)
        .into_iter::<GoPackage>()
        .map(|p| {
            p.map_err(|e| LicenseError::Resolution(format!("cannot decode go list output: {}", e)))
        })
        .collect()
}

/// Resolves Go packages with the `go` tool found on `PATH`.
pub struct GoResolver {
    gopath: Option<PathBuf>,
}

impl GoResolver {
    pub fn new() -> Self {
        Self { gopath: None }
    }

    /// Resolve against a specific GOPATH tree instead of the ambient
    /// environment. This also switches `go` to GOPATH mode.
    pub fn with_gopath(gopath: PathBuf) -> Self {
        Self {
            gopath: Some(gopath),
        }
    }

    fn run<I, S>(&self, args: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new("go");
        cmd.args(args);
        if let Some(gopath) = &self.gopath {
            cmd.env("GOPATH", gopath).env("GO111MODULE", "off");
        }
        tracing::debug!("Running {:?}", cmd);

        let output = cmd
            .output()
            .map_err(|e| LicenseError::Resolution(format!("cannot run go: {}", e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if is_missing(&stderr) {
                return Err(LicenseError::Missing(stderr));
            }
            return Err(LicenseError::Resolution(format!(
                "go list exited with {}: {}",
                output.status, stderr
            )));
        }
        Ok(output.stdout)
    }
}

impl super::Resolver for GoResolver {
    fn dependencies(&self, package: &str) -> Result<Vec<String>> {
        let out = self.run(["list", "-e", "-json", package])?;
        let mut packages = parse_packages(&out)?;
        if packages.len() != 1 {
            return Err(LicenseError::Resolution(format!(
                "{} matched {} packages, expected exactly one",
                package,
                packages.len()
            )));
        }
        let root = packages.remove(0);
        if let Some(err) = root.error {
            return Err(LicenseError::Missing(err.err));
        }

        let mut deps = root.deps;
        deps.sort();
        deps.dedup();
        Ok(deps)
    }

    fn standard_packages(&self) -> Result<HashSet<String>> {
        let out = self.run(["list", "std"])?;
        Ok(String::from_utf8_lossy(&out)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn package_info(&self, packages: &[String]) -> Result<Vec<PackageInfo>> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }
        let mut args = vec!["list", "-e", "-json"];
        args.extend(packages.iter().map(String::as_str));
        let records = parse_packages(&self.run(args)?)?;

        if records.len() != packages.len() {
            return Err(LicenseError::Resolution(format!(
                "requested {} packages, go list returned {}",
                packages.len(),
                records.len()
            )));
        }
        records
            .into_iter()
            .zip(packages)
            .map(|(record, wanted)| {
                if &record.import_path != wanted {
                    return Err(LicenseError::Resolution(format!(
                        "expected package {}, go list returned {}",
                        wanted, record.import_path
                    )));
                }
                Ok(record.into_info())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_OUTPUT: &str = r#"{
	"Dir": "/gopath/src/colors/red",
	"ImportPath": "colors/red",
	"Name": "red",
	"Root": "/gopath",
	"Deps": ["colors/blue", "fmt"]
}
{
	"ImportPath": "colors/missing",
	"Root": "/gopath",
	"Error": {
		"ImportStack": ["colors/broken", "colors/missing"],
		"Pos": "",
		"Err": "cannot find package \"colors/missing\" in any of:\n\t/gopath/src/colors/missing (from $GOPATH)"
	}
}
"#;

    #[test]
    fn test_parse_stream() {
        let packages = parse_packages(LIST_OUTPUT.as_bytes()).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].import_path, "colors/red");
        assert_eq!(packages[0].deps, vec!["colors/blue", "fmt"]);
        assert!(packages[0].error.is_none());
        assert!(packages[1]
            .error
            .as_ref()
            .unwrap()
            .err
            .starts_with("cannot find package"));
    }

    #[test]
    fn test_into_info() {
        let mut packages = parse_packages(LIST_OUTPUT.as_bytes()).unwrap().into_iter();

        let red = packages.next().unwrap().into_info();
        assert_eq!(red.name, "red");
        assert_eq!(red.dir, PathBuf::from("/gopath/src/colors/red"));
        assert_eq!(red.source_root, PathBuf::from("/gopath"));
        assert_eq!(red.error, None);

        let missing = packages.next().unwrap().into_info();
        assert_eq!(missing.dir, PathBuf::from("/gopath/src/colors/missing"));
        assert!(missing.error.is_some());
    }

    #[test]
    fn test_garbage_output_is_resolution_error() {
        let err = parse_packages(b"{\"ImportPath\": ").unwrap_err();
        assert!(matches!(err, LicenseError::Resolution(_)));
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing(
            "can't load package: package colors/missing: cannot find package \"colors/missing\""
        ));
        assert!(is_missing("package colors/cmd: no Go files in /gopath/src/colors/cmd"));
        assert!(is_missing("package nope is not in std (/usr/lib/go/src/nope)"));
        assert!(!is_missing("go: cannot find main module"));
    }
}
