//! Report renderers for license scan results.
//!
//! - [`terminal`] — colored table of every row plus a summary box; `--quiet` prints only the summary line.
//! - [`json`] — machine-readable rows for CI pipelines.

pub mod json;
pub mod terminal;
