use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::models::{License, LicenseRisk, PolicyVerdict};

#[derive(Debug, Serialize)]
struct JsonRow<'r> {
    package: &'r str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'r Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<&'r str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spdx_id: Option<&'r str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    identified: bool,
    risk: &'r LicenseRisk,
    verdict: &'r PolicyVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'r str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_words: Option<&'r [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_words: Option<&'r [String]>,
}

fn to_json_rows<'r>(rows: &'r [License<'_>], confidence: f64, words: bool) -> Vec<JsonRow<'r>> {
    rows.iter()
        .map(|row| JsonRow {
            package: &row.package,
            path: row.path.as_deref(),
            license: row.template.map(|t| t.title.as_str()),
            spdx_id: row
                .template
                .map(|t| t.spdx_id.as_str())
                .filter(|id| !id.is_empty()),
            score: row.err.is_none().then_some(row.score),
            identified: row.is_identified(confidence),
            risk: &row.risk,
            verdict: &row.verdict,
            error: row.err.as_deref(),
            extra_words: words.then_some(row.extra_words.as_slice()),
            missing_words: words.then_some(row.missing_words.as_slice()),
        })
        .collect()
}

/// Print the rows as a pretty JSON array on stdout.
pub fn render(rows: &[License<'_>], confidence: f64, words: bool) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&to_json_rows(rows, confidence, words))?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::license::matcher::MatchResult;
    use crate::license::templates::Template;

    #[test]
    fn test_rows() {
        let mit = Template {
            spdx_id: "MIT".to_string(),
            ..Template::new("MIT License", "permission")
        };
        let rows = vec![
            License::matched(
                "colors/red",
                PathBuf::from("/src/colors/red/LICENSE"),
                MatchResult {
                    template: Some(&mit),
                    score: 0.5,
                    extra_words: vec!["evil".to_string()],
                    missing_words: Vec::new(),
                },
            ),
            License::failed("colors/missing", "cannot find package"),
        ];

        let value = serde_json::to_value(to_json_rows(&rows, 0.9, false)).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "package": "colors/red",
                    "path": "/src/colors/red/LICENSE",
                    "license": "MIT License",
                    "spdx_id": "MIT",
                    "score": 0.5,
                    "identified": false,
                    "risk": "Unknown",
                    "verdict": "Warn"
                },
                {
                    "package": "colors/missing",
                    "identified": false,
                    "risk": "Unknown",
                    "verdict": "Warn",
                    "error": "cannot find package"
                }
            ])
        );
    }

    #[test]
    fn test_words_only_when_requested() {
        let rows = vec![License::unlicensed("colors/green")];
        let value = serde_json::to_value(to_json_rows(&rows, 0.9, true)).unwrap();
        assert_eq!(value[0]["score"], json!(0.0));
        assert_eq!(value[0]["extra_words"], json!([]));
        assert_eq!(value[0]["missing_words"], json!([]));
    }
}
