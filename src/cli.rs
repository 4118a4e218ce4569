use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "dep-licenses",
    about = "Identify the licenses of a package's dependencies",
    version
)]
pub struct Cli {
    /// Packages whose dependencies are listed
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Show every package instead of grouping those sharing a license file
    #[arg(short, long)]
    pub all: bool,

    /// Show words added to (+) or missing from (-) the matched license
    #[arg(short, long)]
    pub words: bool,

    /// Minimum score for a license to be considered identified [default: 0.9]
    #[arg(long, value_name = "FLOAT")]
    pub confidence: Option<f64>,

    /// Config file [default: ./.dep-licenses/config.toml, fallback ~/.config/dep-licenses/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// GOPATH to resolve packages against instead of the environment's
    #[arg(long, value_name = "DIR", conflicts_with = "packages_file")]
    pub gopath: Option<PathBuf>,

    /// Read packages from a JSON listing instead of running `go list`
    #[arg(long = "packages", value_name = "FILE")]
    pub packages_file: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Log more details to stderr (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print the summary line and errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
