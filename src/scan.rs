use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use crate::error::{LicenseError, Result};
use crate::license::matcher::{match_templates, MatchResult};
use crate::license::templates::Template;
use crate::license::words::WordSet;
use crate::locator::find_license;
use crate::models::{License, PackageInfo};
use crate::resolver::Resolver;

/// Scores license files against the corpus, at most once per file.
pub struct MatchCache<'a> {
    templates: &'a [Template],
    results: HashMap<PathBuf, MatchResult<'a>>,
}

impl<'a> MatchCache<'a> {
    pub fn new(templates: &'a [Template]) -> Self {
        Self {
            templates,
            results: HashMap::new(),
        }
    }

    pub fn score(&mut self, path: &Path) -> Result<MatchResult<'a>> {
        if let Some(result) = self.results.get(path) {
            tracing::trace!("Cache hit for {}", path.display());
            return Ok(result.clone());
        }

        let data = std::fs::read(path).map_err(|source| LicenseError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let result = match_templates(&WordSet::from_bytes(&data), self.templates);
        if let Some(t) = result.template {
            tracing::debug!("{} matches {} ({:.3})", path.display(), t.title, result.score);
        }
        self.results.insert(path.to_path_buf(), result.clone());
        Ok(result)
    }
}

fn license_for<'a>(info: &PackageInfo, cache: &mut MatchCache<'a>) -> Result<License<'a>> {
    if let Some(err) = &info.error {
        return Ok(License::failed(&info.import_path, err));
    }
    match find_license(&info.dir, &info.import_path, &info.source_root)? {
        Some(path) => {
            let result = cache.score(&path)?;
            Ok(License::matched(&info.import_path, path, result))
        }
        None => Ok(License::unlicensed(&info.import_path)),
    }
}

/// One license row per non-standard package reachable from `roots`.
///
/// Rows come out as the sorted union of every root's dependencies, followed
/// by the roots not already listed, in the order given. Packages the
/// resolver cannot find become rows carrying its error.
pub fn list_licenses<'a>(
    resolver: &dyn Resolver,
    templates: &'a [Template],
    roots: &[String],
    progress: &ProgressBar,
) -> Result<Vec<License<'a>>> {
    let standard = resolver.standard_packages()?;

    let mut deps = BTreeSet::new();
    let mut failed: HashMap<String, String> = HashMap::new();
    for root in roots {
        match resolver.dependencies(root) {
            Ok(found) => {
                tracing::info!("{}: {} dependencies", root, found.len());
                deps.extend(found);
            }
            Err(LicenseError::Missing(err)) => {
                tracing::warn!("{}: {}", root, err);
                failed.insert(root.clone(), err);
            }
            Err(e) => return Err(e),
        }
    }

    let mut order: Vec<String> = deps.iter().cloned().collect();
    for root in roots {
        if deps.insert(root.clone()) {
            order.push(root.clone());
        }
    }
    order.retain(|id| !standard.contains(id));

    let wanted: Vec<String> = order
        .iter()
        .filter(|id| !failed.contains_key(*id))
        .cloned()
        .collect();
    let mut infos: HashMap<String, PackageInfo> = resolver
        .package_info(&wanted)?
        .into_iter()
        .map(|info| (info.import_path.clone(), info))
        .collect();

    progress.set_length(order.len() as u64);
    let mut cache = MatchCache::new(templates);
    let mut rows = Vec::with_capacity(order.len());
    for id in &order {
        progress.set_message(id.clone());
        let row = match failed.get(id) {
            Some(err) => License::failed(id, err),
            None => {
                let info = infos.remove(id).ok_or_else(|| {
                    LicenseError::Resolution(format!("no package information for {}", id))
                })?;
                license_for(&info, &mut cache)?
            }
        };
        rows.push(row);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(rows)
}
