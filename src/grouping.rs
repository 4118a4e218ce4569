use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{LicenseError, Result};
use crate::models::License;

#[derive(Default)]
struct TrieNode<'s> {
    children: HashMap<&'s str, usize>,
    /// Some package path ends here.
    terminal: bool,
}

/// Longest common prefix of `/`-separated package paths, by whole segments.
///
/// Segments are stored in an arena-backed trie; the prefix is read by
/// following single-child nodes from the root, stopping at any node a
/// package path ends on. That stop is a deliberate departure from a plain
/// single-child walk: `["a", "a/x"]` yields `a`, since `a/x` is not a prefix
/// of `a`.
pub fn longest_common_prefix<'s>(packages: impl IntoIterator<Item = &'s str>) -> String {
    let mut nodes: Vec<TrieNode<'s>> = vec![TrieNode::default()];
    let mut labels: Vec<&'s str> = vec![""];

    for package in packages {
        let mut current = 0;
        for part in package.split('/') {
            current = match nodes[current].children.get(part) {
                Some(&next) => next,
                None => {
                    let next = nodes.len();
                    nodes.push(TrieNode::default());
                    labels.push(part);
                    nodes[current].children.insert(part, next);
                    next
                }
            };
        }
        nodes[current].terminal = true;
    }

    let mut prefix = Vec::new();
    let mut current = 0;
    while nodes[current].children.len() == 1 && !nodes[current].terminal {
        let Some(&next) = nodes[current].children.values().next() else {
            break;
        };
        prefix.push(labels[next]);
        current = next;
    }
    prefix.join("/")
}

enum Slot<'a> {
    Row(License<'a>),
    Group(usize),
}

/// Collapse rows sharing a license file into one row named after the
/// packages' common prefix.
///
/// Rows without a license file are kept as they are. Output follows the
/// order in which each file, or unlicensed row, first appears.
pub fn group_licenses(rows: Vec<License<'_>>) -> Result<Vec<License<'_>>> {
    let mut slots = Vec::new();
    let mut groups: Vec<Vec<License<'_>>> = Vec::new();
    let mut by_path: HashMap<PathBuf, usize> = HashMap::new();

    for row in rows {
        let Some(path) = row.path.clone() else {
            slots.push(Slot::Row(row));
            continue;
        };
        match by_path.get(&path) {
            Some(&i) => groups[i].push(row),
            None => {
                by_path.insert(path, groups.len());
                slots.push(Slot::Group(groups.len()));
                groups.push(vec![row]);
            }
        }
    }

    let mut grouped = Vec::with_capacity(slots.len());
    for slot in slots {
        let members = match slot {
            Slot::Row(row) => {
                grouped.push(row);
                continue;
            }
            Slot::Group(i) => std::mem::take(&mut groups[i]),
        };

        let prefix = longest_common_prefix(members.iter().map(|r| r.package.as_str()));
        let mut members = members.into_iter();
        let Some(mut first) = members.next() else {
            continue;
        };
        if members.len() == 0 {
            grouped.push(first);
            continue;
        }
        if prefix.is_empty() {
            let mut packages = vec![first.package];
            packages.extend(members.map(|r| r.package));
            return Err(LicenseError::GroupingConflict {
                path: first.path.unwrap_or_default(),
                packages,
            });
        }

        tracing::debug!(
            "Grouped {} packages under {}",
            members.len() + 1,
            prefix
        );
        first.package = prefix;
        grouped.push(first);
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::matcher::MatchResult;
    use crate::license::templates::Template;

    fn row<'a>(package: &str, path: &str, template: &'a Template) -> License<'a> {
        License::matched(
            package,
            PathBuf::from(path),
            MatchResult {
                template: Some(template),
                score: 0.95,
                extra_words: vec!["extra".to_string()],
                missing_words: Vec::new(),
            },
        )
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(longest_common_prefix(["a/x", "a/y", "a/z"]), "a");
        assert_eq!(longest_common_prefix(["a/b/x", "a/b/y/z"]), "a/b");
        assert_eq!(longest_common_prefix(["a/x", "b/x"]), "");
        assert_eq!(longest_common_prefix(["only/one/path"]), "only/one/path");
        assert_eq!(longest_common_prefix(["a", "a/x"]), "a");
        assert_eq!(longest_common_prefix(["ab/x", "abc/x"]), "");
    }

    #[test]
    fn test_shared_file_collapses() {
        let mit = Template::new("MIT License", "permission");
        let rows = vec![
            row("a/x", "/src/a/LICENSE", &mit),
            row("a/y", "/src/a/LICENSE", &mit),
            row("a/z", "/src/a/LICENSE", &mit),
        ];
        let grouped = group_licenses(rows).unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].package, "a");
        assert_eq!(grouped[0].path, Some(PathBuf::from("/src/a/LICENSE")));
        assert_eq!(grouped[0].template.unwrap().title, "MIT License");
        assert_eq!(grouped[0].score, 0.95);
        assert_eq!(grouped[0].extra_words, vec!["extra"]);
    }

    #[test]
    fn test_unlicensed_rows_pass_through() {
        let mit = Template::new("MIT License", "permission");
        let rows = vec![
            License::unlicensed("colors/green"),
            row("colors/red/a", "/src/colors/red/LICENSE", &mit),
            License::failed("colors/missing", "cannot find package"),
            License::unlicensed("colors/purple"),
            row("colors/red/b", "/src/colors/red/LICENSE", &mit),
            row("colors/blue", "/src/colors/blue/LICENSE", &mit),
        ];
        let grouped = group_licenses(rows).unwrap();
        let packages: Vec<&str> = grouped.iter().map(|r| r.package.as_str()).collect();
        assert_eq!(
            packages,
            vec![
                "colors/green",
                "colors/red",
                "colors/missing",
                "colors/purple",
                "colors/blue"
            ]
        );
        assert_eq!(grouped[2].err.as_deref(), Some("cannot find package"));
    }

    #[test]
    fn test_unrelated_sharing_is_conflict() {
        let mit = Template::new("MIT License", "permission");
        let rows = vec![
            row("colors/red", "/vendor/LICENSE", &mit),
            row("couleurs/rouge", "/vendor/LICENSE", &mit),
        ];
        match group_licenses(rows) {
            Err(LicenseError::GroupingConflict { path, packages }) => {
                assert_eq!(path, PathBuf::from("/vendor/LICENSE"));
                assert_eq!(packages, vec!["colors/red", "couleurs/rouge"]);
            }
            other => panic!("expected grouping conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(group_licenses(Vec::new()).unwrap().is_empty());
    }
}
