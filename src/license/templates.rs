use include_dir::{include_dir, Dir};

use crate::error::{LicenseError, Result};
use crate::license::words::WordSet;

/// Reference license texts bundled into the binary.
static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/licenses");

/// A well-known license text candidates are compared against.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub title: String,
    pub nickname: String,
    pub spdx_id: String,
    pub words: WordSet,
}

impl Template {
    /// Build a template directly from a license body, bypassing front matter.
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            nickname: String::new(),
            spdx_id: String::new(),
            words: WordSet::from_text(body),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    FrontMatter,
    Body,
}

/// Parse one template document: anything before the first `---` line is
/// ignored, `key: value` lines up to the closing `---` fill the metadata and
/// the rest is the license text.
pub fn parse_template(name: &str, content: &str) -> Result<Template> {
    let mut template = Template::new("", "");
    let mut section = Section::Preamble;
    let mut body = String::new();

    for raw in content.lines() {
        match section {
            Section::Preamble => {
                if raw.trim() == "---" {
                    section = Section::FrontMatter;
                }
            }
            Section::FrontMatter => {
                let line = raw.trim();
                if line == "---" {
                    section = Section::Body;
                } else if let Some(value) = line.strip_prefix("title:") {
                    template.title = value.trim().to_string();
                } else if let Some(value) = line.strip_prefix("nickname:") {
                    template.nickname = value.trim().to_string();
                } else if let Some(value) = line.strip_prefix("spdx-id:") {
                    template.spdx_id = value.trim().to_string();
                }
            }
            Section::Body => {
                body.push_str(raw);
                body.push('\n');
            }
        }
    }

    if section != Section::Body {
        return Err(LicenseError::Corpus {
            name: name.to_string(),
            reason: "front matter is not terminated by a `---` line".to_string(),
        });
    }

    template.words = WordSet::from_text(&body);
    if template.words.is_empty() {
        return Err(LicenseError::Corpus {
            name: name.to_string(),
            reason: "license text has no words".to_string(),
        });
    }
    Ok(template)
}

/// Load every bundled template, ordered by file name.
///
/// A single malformed template fails the whole load.
pub fn load_templates() -> Result<Vec<Template>> {
    let mut files: Vec<_> = TEMPLATES_DIR.files().collect();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    let mut templates = Vec::with_capacity(files.len());
    for file in files {
        let name = file.path().display().to_string();
        let content = file.contents_utf8().ok_or_else(|| LicenseError::Corpus {
            name: name.clone(),
            reason: "not valid UTF-8".to_string(),
        })?;
        templates.push(parse_template(&name, content)?);
    }
    tracing::debug!("Loaded {} license templates", templates.len());
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_front_matter() {
        let content = "ignored preamble\n---\ntitle: Example License\nnickname: Ex\nspdx-id: EX-1.0\nfeatured: true\n---\n\nPermission is granted.\n";
        let t = parse_template("example.txt", content).unwrap();
        assert_eq!(t.title, "Example License");
        assert_eq!(t.nickname, "Ex");
        assert_eq!(t.spdx_id, "EX-1.0");
        assert_eq!(t.words.len(), 3);
        assert!(t.words.contains("permission"));
        // Front matter never leaks into the word set.
        assert!(!t.words.contains("featured"));
    }

    #[test]
    fn test_missing_keys_left_empty() {
        let t = parse_template("bare.txt", "---\n---\nbody text\n").unwrap();
        assert_eq!(t.title, "");
        assert_eq!(t.nickname, "");
        assert_eq!(t.words.len(), 2);
    }

    #[test]
    fn test_body_keeps_later_separators() {
        let t = parse_template("sep.txt", "---\ntitle: T\n---\none\n---\ntwo\n").unwrap();
        assert!(t.words.contains("one"));
        assert!(t.words.contains("two"));
    }

    #[test]
    fn test_unterminated_front_matter_is_error() {
        let err = parse_template("broken.txt", "---\ntitle: Broken\nbody\n").unwrap_err();
        assert!(matches!(err, LicenseError::Corpus { .. }));
        assert!(parse_template("none.txt", "just text\n").is_err());
    }

    #[test]
    fn test_empty_body_is_error() {
        let err = parse_template("empty.txt", "---\ntitle: Empty\n---\n\n").unwrap_err();
        assert!(matches!(err, LicenseError::Corpus { .. }));
    }

    #[test]
    fn test_bundled_corpus_loads() {
        let templates = load_templates().unwrap();
        assert_eq!(templates.len(), 24);
        assert!(templates.iter().all(|t| !t.title.is_empty()));
        assert!(templates.iter().all(|t| !t.spdx_id.is_empty()));
        assert!(templates.iter().all(|t| !t.words.is_empty()));

        let mit = templates.iter().find(|t| t.spdx_id == "MIT").unwrap();
        assert_eq!(mit.title, "MIT License");
        // The `Copyright (c) [year] [fullname]` line is not part of the words.
        assert!(!mit.words.contains("fullname"));
    }

    #[test]
    fn test_corpus_order_is_stable() {
        let first: Vec<String> = load_templates().unwrap().into_iter().map(|t| t.title).collect();
        let second: Vec<String> = load_templates().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "BSD Zero Clause License");
    }
}
