use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{LicenseError, Result};

lazy_static! {
    static ref LICENSE_NAME: Regex = Regex::new(
        r"(?i)^(?:((?:un)?licen[sc]e)|((?:un)?licen[sc]e\.(?:md|markdown|txt))|(copy(?:ing|right)(?:\.[^.]+)?)|((?:un)?licen[sc]e(?:[-_.0-9]+|[-_.0-9]*\.[^.]+)))$"
    )
    .expect("license file name regex should compile");
}

/// Weight between 0 and 1 of how likely `name` is a license file.
pub fn score_license_name(name: &str) -> f64 {
    let Some(caps) = LICENSE_NAME.captures(name) else {
        return 0.0;
    };
    if caps.get(1).is_some() {
        1.0
    } else if caps.get(2).is_some() {
        0.9
    } else if caps.get(3).is_some() {
        0.8
    } else {
        0.7
    }
}

/// Best license-like regular file directly inside `dir`.
///
/// Names are visited in sorted order so ties resolve the same way on every
/// platform.
fn best_candidate(dir: &Path) -> Result<Option<String>> {
    let read_err = |source: std::io::Error| LicenseError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_file() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut best_score = 0.0;
    let mut best_name = None;
    for name in names {
        let score = score_license_name(&name);
        if score > best_score {
            best_score = score;
            best_name = Some(name);
        }
    }
    Ok(best_name)
}

/// Look for the license file of the package at `dir`.
///
/// The search starts in `dir` and climbs one directory per segment of
/// `import_path`, never leaving `source_root` when it is set. The first
/// directory holding any candidate wins, even if a parent holds a
/// better-named file.
pub fn find_license(dir: &Path, import_path: &str, source_root: &Path) -> Result<Option<PathBuf>> {
    let depth = import_path.split('/').filter(|s| !s.is_empty()).count().max(1);
    let bounded = !source_root.as_os_str().is_empty();

    let mut current = dir.to_path_buf();
    for _ in 0..depth {
        if bounded && !current.starts_with(source_root) {
            break;
        }
        if let Some(name) = best_candidate(&current)? {
            let path = current.join(name);
            tracing::debug!("{}: license file {}", import_path, path.display());
            return Ok(Some(path));
        }
        if !current.pop() {
            break;
        }
    }

    tracing::debug!("{}: no license file found", import_path);
    Ok(None)
}
