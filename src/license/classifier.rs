use crate::license::spdx::classify_spdx_id;
use crate::models::{License, LicenseRisk};

/// Policy key used for rows without a trustworthy match.
pub const UNKNOWN: &str = "unknown";

/// SPDX identifier of the row's license, or [`UNKNOWN`] when no template
/// matched with at least `confidence`.
pub fn license_key<'r>(row: &'r License<'_>, confidence: f64) -> &'r str {
    match row.template {
        Some(t) if row.score >= confidence && !t.spdx_id.is_empty() => &t.spdx_id,
        _ => UNKNOWN,
    }
}

/// Classify a report row into a risk level.
///
/// Rows below the confidence threshold, without a license file, or that
/// failed to resolve are [`LicenseRisk::Unknown`].
pub fn classify(row: &License<'_>, confidence: f64) -> LicenseRisk {
    if row.err.is_some() {
        return LicenseRisk::Unknown;
    }
    match license_key(row, confidence) {
        UNKNOWN => LicenseRisk::Unknown,
        id => classify_spdx_id(id),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::license::matcher::MatchResult;
    use crate::license::templates::Template;

    fn template(spdx_id: &str) -> Template {
        Template {
            spdx_id: spdx_id.to_string(),
            ..Template::new("Some License", "body")
        }
    }

    fn row<'a>(t: &'a Template, score: f64) -> License<'a> {
        License::matched(
            "example.com/pkg",
            PathBuf::from("/src/example.com/pkg/LICENSE"),
            MatchResult {
                template: Some(t),
                score,
                ..MatchResult::default()
            },
        )
    }

    #[test]
    fn test_confident_match() {
        let gpl = template("GPL-3.0");
        let r = row(&gpl, 0.98);
        assert_eq!(license_key(&r, 0.9), "GPL-3.0");
        assert_eq!(classify(&r, 0.9), LicenseRisk::StrongCopyleft);
    }

    #[test]
    fn test_below_confidence_is_unknown() {
        let mit = template("MIT");
        let r = row(&mit, 0.6);
        assert_eq!(license_key(&r, 0.9), UNKNOWN);
        assert_eq!(classify(&r, 0.9), LicenseRisk::Unknown);
        assert_eq!(classify(&r, 0.5), LicenseRisk::Permissive);
    }

    #[test]
    fn test_no_file_and_errors() {
        assert_eq!(classify(&License::unlicensed("a/b"), 0.9), LicenseRisk::Unknown);
        assert_eq!(
            classify(&License::failed("a/b", "cannot find package"), 0.0),
            LicenseRisk::Unknown
        );
    }
}
