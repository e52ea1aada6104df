//! Toolkit configuration stored in `toolkit.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::rewrite::{RuleSet, default_rule_pairs};

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "toolkit.toml";

/// Toolkit configuration (TOML).
///
/// Every section is optional. Missing fields default to the passenger CSV
/// next to the config file and the `components/ui` tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolkitConfig {
    pub top_fares: TopFaresConfig,
    pub fix_imports: FixImportsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TopFaresConfig {
    /// CSV file to rank. Relative paths resolve against the config directory.
    pub csv_path: PathBuf,

    /// Column interpreted as the numeric ranking key.
    pub key_field: String,

    /// Number of records to report.
    pub limit: usize,
}

impl Default for TopFaresConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("train.csv"),
            key_field: "Fare".to_string(),
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FixImportsConfig {
    /// Directory to walk. Relative paths resolve against the config directory.
    pub root: PathBuf,

    /// File extensions (without the dot) eligible for rewriting.
    pub extensions: Vec<String>,

    /// Substitution rules, applied in order.
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleConfig {
    /// Regular expression (`regex` crate syntax).
    pub pattern: String,

    /// Replacement template; `${1}` expands to the first capture group.
    #[serde(default)]
    pub replacement: String,
}

impl Default for FixImportsConfig {
    fn default() -> Self {
        Self {
            root: Path::new("components").join("ui"),
            extensions: vec!["tsx".to_string(), "ts".to_string()],
            rules: default_rule_pairs()
                .into_iter()
                .map(|(pattern, replacement)| RuleConfig {
                    pattern,
                    replacement,
                })
                .collect(),
        }
    }
}

impl FixImportsConfig {
    /// Compile the configured rules in order.
    pub fn rule_set(&self) -> Result<RuleSet> {
        RuleSet::compile(
            self.rules
                .iter()
                .map(|rule| (rule.pattern.as_str(), rule.replacement.as_str())),
        )
        .context("compile fix_imports.rules")
    }
}

impl ToolkitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_fares.key_field.trim().is_empty() {
            return Err(anyhow!("top_fares.key_field must be non-empty"));
        }
        if self.top_fares.csv_path.as_os_str().is_empty() {
            return Err(anyhow!("top_fares.csv_path must be non-empty"));
        }
        if self.fix_imports.root.as_os_str().is_empty() {
            return Err(anyhow!("fix_imports.root must be non-empty"));
        }
        if self.fix_imports.extensions.is_empty() {
            return Err(anyhow!("fix_imports.extensions must be a non-empty array"));
        }
        for (index, extension) in self.fix_imports.extensions.iter().enumerate() {
            let trimmed = extension.trim();
            if trimmed.is_empty() || trimmed.starts_with('.') {
                return Err(anyhow!(
                    "fix_imports.extensions[{}] must be a bare extension like \"ts\"",
                    index
                ));
            }
        }
        self.fix_imports.rule_set()?;
        Ok(())
    }

    /// Resolve relative paths against `base`, leaving absolute paths as-is.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.top_fares.csv_path = resolve(base, &self.top_fares.csv_path);
        self.fix_imports.root = resolve(base, &self.fix_imports.root);
        self
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ToolkitConfig::default()`. Relative paths
/// in the result are resolved against the directory containing `path`.
pub fn load_config(path: &Path) -> Result<ToolkitConfig> {
    let base = config_dir(path);
    if !path.exists() {
        let cfg = ToolkitConfig::default();
        cfg.validate()?;
        return Ok(cfg.resolve_paths(&base));
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ToolkitConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg.resolve_paths(&base))
}

fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ToolkitConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = config_dir(path);
    fs::create_dir_all(&parent)
        .with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
