use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::license::classifier::license_key;
use crate::models::{License, LicenseRisk, PolicyVerdict};

/// Render a colored terminal report.
pub fn render(
    rows: &[License<'_>],
    packages: &[String],
    confidence: f64,
    words: bool,
    quiet: bool,
) -> Result<()> {
    let total = rows.len();
    let pass_count = rows.iter().filter(|r| r.verdict == PolicyVerdict::Pass).count();
    let warn_count = rows.iter().filter(|r| r.verdict == PolicyVerdict::Warn).count();
    let error_count = rows.iter().filter(|r| r.verdict == PolicyVerdict::Error).count();

    if quiet {
        println!(
            "Total: {}  Pass: {}  Warn: {}  Error: {}",
            total,
            pass_count.to_string().green(),
            warn_count.to_string().yellow(),
            error_count.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "dep-licenses".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Packages: {}\n", packages.join(" "));

    render_table(rows, confidence, words);
    println!();

    let pass_licenses = summarize_licenses(rows, confidence, &PolicyVerdict::Pass);
    let warn_licenses = summarize_licenses(rows, confidence, &PolicyVerdict::Warn);
    let error_licenses = summarize_licenses(rows, confidence, &PolicyVerdict::Error);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total rows : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Pass  : {:>4}  {}", "✓".green(), pass_count, pass_licenses)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Warn  : {:>4}  {}", "⚠".yellow(), warn_count, warn_licenses)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Error : {:>4}  {}", "✗".red(), error_count, error_licenses)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    Ok(())
}

fn render_table(rows: &[License<'_>], confidence: f64, words: bool) {
    let mut header = vec![
        Cell::new("Package").add_attribute(Attribute::Bold),
        Cell::new("License").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Risk").add_attribute(Attribute::Bold),
        Cell::new("Verdict").add_attribute(Attribute::Bold),
    ];
    if words {
        header.push(Cell::new("Words").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for row in rows {
        let (verdict_str, verdict_color) = match row.verdict {
            PolicyVerdict::Pass => ("✓ pass", Color::Green),
            PolicyVerdict::Warn => ("⚠ warn", Color::Yellow),
            PolicyVerdict::Error => ("✗ error", Color::Red),
        };

        let risk_color = match row.risk {
            LicenseRisk::Permissive => Color::Green,
            LicenseRisk::WeakCopyleft => Color::Yellow,
            LicenseRisk::StrongCopyleft => Color::Red,
            LicenseRisk::Unknown => Color::DarkGrey,
        };

        let mut license = Cell::new(license_cell(row, confidence));
        if row.err.is_some() {
            license = license.fg(Color::Red);
        }

        let mut cells = vec![
            Cell::new(&row.package),
            license,
            Cell::new(score_cell(row)).set_alignment(CellAlignment::Right),
            Cell::new(row.risk.to_string()).fg(risk_color),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
        ];
        if words {
            cells.push(Cell::new(words_cell(row)));
        }
        table.add_row(cells);
    }

    println!("{}", table);
}

/// Matched title, `? (title)` below the confidence threshold, `?` when
/// nothing matched, or the resolver error.
fn license_cell(row: &License<'_>, confidence: f64) -> String {
    if let Some(err) = &row.err {
        return format!("error: {}", err.lines().next().unwrap_or_default());
    }
    match row.template {
        Some(t) if row.score >= confidence => t.title.clone(),
        Some(t) => format!("? ({})", t.title),
        None => "?".to_string(),
    }
}

fn score_cell(row: &License<'_>) -> String {
    if row.err.is_some() || row.template.is_none() {
        return String::new();
    }
    format!("{}%", (row.score * 100.0) as i64)
}

fn words_cell(row: &License<'_>) -> String {
    row.extra_words
        .iter()
        .map(|w| format!("+{}", w))
        .chain(row.missing_words.iter().map(|w| format!("-{}", w)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn summarize_licenses(rows: &[License<'_>], confidence: f64, verdict: &PolicyVerdict) -> String {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for row in rows.iter().filter(|r| &r.verdict == verdict) {
        *counts.entry(license_key(row, confidence)).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(lic, cnt)| format!("{} ({})", lic, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::license::matcher::MatchResult;
    use crate::license::templates::Template;

    fn matched<'a>(t: &'a Template, score: f64) -> License<'a> {
        License::matched(
            "colors/red",
            PathBuf::from("/src/colors/red/LICENSE"),
            MatchResult {
                template: Some(t),
                score,
                extra_words: vec!["good".to_string(), "evil".to_string()],
                missing_words: vec!["warranty".to_string()],
            },
        )
    }

    #[test]
    fn test_license_cell() {
        let mit = Template::new("MIT License", "permission");
        assert_eq!(license_cell(&matched(&mit, 0.98), 0.9), "MIT License");
        assert_eq!(license_cell(&matched(&mit, 0.42), 0.9), "? (MIT License)");
        assert_eq!(license_cell(&License::unlicensed("a"), 0.9), "?");
        assert_eq!(
            license_cell(&License::failed("a", "cannot find package\n\tdetails"), 0.9),
            "error: cannot find package"
        );
    }

    #[test]
    fn test_score_cell_truncates() {
        let mit = Template::new("MIT License", "permission");
        assert_eq!(score_cell(&matched(&mit, 0.987)), "98%");
        assert_eq!(score_cell(&matched(&mit, 1.0)), "100%");
        assert_eq!(score_cell(&License::unlicensed("a")), "");
        assert_eq!(score_cell(&License::failed("a", "missing")), "");
    }

    #[test]
    fn test_words_cell() {
        let mit = Template::new("MIT License", "permission");
        assert_eq!(words_cell(&matched(&mit, 0.9)), "+good +evil -warranty");
        assert_eq!(words_cell(&License::unlicensed("a")), "");
    }

    #[test]
    fn test_summarize_licenses() {
        let mit = Template {
            spdx_id: "MIT".to_string(),
            ..Template::new("MIT License", "permission")
        };
        let rows = vec![
            matched(&mit, 1.0),
            matched(&mit, 0.95),
            License::unlicensed("a"),
        ];
        assert_eq!(
            summarize_licenses(&rows, 0.9, &PolicyVerdict::Warn),
            "[MIT (2), unknown (1)]"
        );
        assert_eq!(summarize_licenses(&rows, 0.9, &PolicyVerdict::Error), "");
    }
}
