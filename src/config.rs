use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::license::classifier::UNKNOWN;
use crate::models::PolicyVerdict;

/// Root configuration structure, deserialized from `.dep-licenses/config.toml`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum score for a matched template to count as the package's
    /// license. Rows below it are reported as unknown.
    pub confidence: f64,
    /// License policy rules.
    pub policy: PolicyConfig,
}

/// Defines how licenses are evaluated.
#[derive(Debug, Deserialize)]
pub struct PolicyConfig {
    /// Verdict applied to any license not explicitly listed in `licenses`.
    /// Defaults to `warn`.
    #[serde(default = "default_policy_action")]
    pub default: PolicyAction,
    /// Per-license overrides keyed by SPDX identifier (e.g. `"MIT"`, `"GPL-3.0"`),
    /// or `"unknown"` for packages whose license was not identified.
    #[serde(default)]
    pub licenses: HashMap<String, PolicyAction>,
}

fn default_policy_action() -> PolicyAction {
    PolicyAction::Warn
}

/// The action to take when a package's license matches a policy rule.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Pass,
    Warn,
    /// Package violates policy; the CLI exits with code 1.
    Error,
}

impl PolicyAction {
    pub fn to_verdict(&self) -> PolicyVerdict {
        match self {
            PolicyAction::Pass => PolicyVerdict::Pass,
            PolicyAction::Warn => PolicyVerdict::Warn,
            PolicyAction::Error => PolicyVerdict::Error,
        }
    }
}

impl Default for PolicyConfig {
    /// Permissive licenses pass, weak-copyleft licenses and unidentified
    /// packages warn, and strong-copyleft licenses (GPL, AGPL) produce an error.
    fn default() -> Self {
        let mut licenses = HashMap::new();
        for id in [
            "0BSD",
            "AFL-3.0",
            "Apache-2.0",
            "Artistic-2.0",
            "BSD-2-Clause",
            "BSD-3-Clause",
            "BSD-3-Clause-Clear",
            "CC0-1.0",
            "ISC",
            "MIT",
            "MS-PL",
            "Unlicense",
            "WTFPL",
            "Zlib",
        ] {
            licenses.insert(id.to_string(), PolicyAction::Pass);
        }
        for id in ["EPL-1.0", "LGPL-2.1", "LGPL-3.0", "MPL-2.0", "MS-RL", "OFL-1.1", "OSL-3.0"] {
            licenses.insert(id.to_string(), PolicyAction::Warn);
        }
        for id in ["GPL-2.0", "GPL-3.0", "AGPL-3.0"] {
            licenses.insert(id.to_string(), PolicyAction::Error);
        }
        licenses.insert(UNKNOWN.to_string(), PolicyAction::Warn);

        PolicyConfig {
            default: PolicyAction::Warn,
            licenses,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            confidence: 0.9,
            policy: PolicyConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence) {
            bail!("confidence must be between 0 and 1, got {}", self.confidence);
        }
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    config.validate()?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.dep-licenses/config.toml`
/// 3. `~/.config/dep-licenses/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".dep-licenses").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("dep-licenses").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

/// Verdict for a policy key: an SPDX identifier or [`UNKNOWN`].
pub fn apply_policy(config: &Config, license: &str) -> PolicyVerdict {
    match config.policy.licenses.get(license) {
        Some(action) => action.to_verdict(),
        None => config.policy.default.to_verdict(),
    }
}
