//! License text identification.
//!
//! - [`words`] — normalizes text into the word sets everything is compared on.
//! - [`templates`] — the bundled corpus of well-known license texts.
//! - [`matcher`] — Dice-coefficient scoring of a candidate against the corpus.
//! - [`spdx`] — maps SPDX identifiers to [`LicenseRisk`](crate::models::LicenseRisk).
//! - [`classifier`] — turns a scored report row into a policy key and risk level.

pub mod classifier;
pub mod matcher;
pub mod spdx;
pub mod templates;
pub mod words;
