//! `dep-licenses` — list a package's dependencies and identify their licenses.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load config ([`config::load_config`]) and the bundled license corpus
//!    ([`license::templates`]).
//! 3. Enumerate dependencies with a [`resolver::Resolver`].
//! 4. Locate and score each package's license file ([`scan`], [`locator`]).
//! 5. Unless `--all`, collapse packages sharing a license file ([`grouping`]).
//! 6. Classify licenses and apply policy ([`license::classifier`], [`config::apply_policy`]).
//! 7. Render the requested report ([`report`]).
//! 8. Exit `0` (clean) or `1` (at least one [`models::PolicyVerdict::Error`]).

mod cli;
mod config;
mod error;
mod grouping;
mod license;
mod locator;
mod models;
mod report;
mod resolver;
mod scan;

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::{Cli, ReportFormat};
use config::{apply_policy, load_config};
use grouping::group_licenses;
use license::classifier::{classify, license_key};
use license::templates::load_templates;
use models::PolicyVerdict;
use resolver::go::GoResolver;
use resolver::listing::ListingResolver;
use resolver::Resolver;
use scan::list_licenses;

fn configure_tracing(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{filter::LevelFilter, EnvFilter};

    let level_filter = if cli.quiet {
        LevelFilter::ERROR
    } else {
        match cli.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("DEP_LICENSES_LOG")
        .from_env()
        .context("Failed to parse filters from DEP_LICENSES_LOG environment variable")?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn progress_bar(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_tracing(&cli)?;

    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if let Some(confidence) = cli.confidence {
        config.confidence = confidence;
        config.validate()?;
    }

    let templates = load_templates()?;
    tracing::info!("Loaded {} license templates", templates.len());

    let resolver: Box<dyn Resolver> = match (&cli.packages_file, &cli.gopath) {
        (Some(listing), _) => Box::new(ListingResolver::load(listing)?),
        (None, Some(gopath)) => Box::new(GoResolver::with_gopath(gopath.clone())),
        (None, None) => Box::new(GoResolver::new()),
    };

    let pb = progress_bar(cli.quiet)?;
    let mut rows = list_licenses(resolver.as_ref(), &templates, &cli.packages, &pb)?;
    if !cli.all {
        rows = group_licenses(rows)?;
    }

    // Classify licenses and apply policy verdicts
    for row in &mut rows {
        row.risk = classify(row, config.confidence);
        row.verdict = apply_policy(&config, license_key(row, config.confidence));
    }

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&rows, &cli.packages, config.confidence, cli.words, cli.quiet)?;
        }
        ReportFormat::Json => {
            report::json::render(&rows, config.confidence, cli.words)?;
        }
    }

    // Exit code: 1 if any error verdict found
    if rows.iter().any(|r| r.verdict == PolicyVerdict::Error) {
        std::process::exit(1);
    }

    Ok(())
}
