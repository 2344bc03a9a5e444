use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub osis: OsisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            metadata_file: default_metadata_file(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_metadata_file() -> String {
    "metadata.toml".to_string()
}
fn default_include_globs() -> Vec<String> {
    vec!["**/*.toml".to_string()]
}

/// How row identifiers are generated.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Fresh UUIDv4 per record per run.
    #[default]
    Random,
    /// Derived from author, file name and entry position; stable across runs.
    Content,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

/// What the OSIS emitter does with a record whose book has no abbreviation.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownBookPolicy {
    /// Emit the section without `annotateRef`.
    #[default]
    Degrade,
    /// Leave the record out of the document.
    Skip,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OsisConfig {
    #[serde(default = "default_work")]
    pub work: String,
    #[serde(default = "default_ref_work")]
    pub ref_work: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub unknown_book: UnknownBookPolicy,
}

impl Default for OsisConfig {
    fn default() -> Self {
        Self {
            work: default_work(),
            ref_work: default_ref_work(),
            lang: default_lang(),
            title: default_title(),
            unknown_book: UnknownBookPolicy::default(),
        }
    }
}

fn default_work() -> String {
    "historicalChristianFaith".to_string()
}
fn default_ref_work() -> String {
    "Commentary".to_string()
}
fn default_lang() -> String {
    "en".to_string()
}
fn default_title() -> String {
    "Historical Christian Commentaries".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let metadata_file = &config.input.metadata_file;
    if metadata_file.is_empty() || metadata_file.contains(['/', '\\']) {
        anyhow::bail!(
            "input.metadata_file must be a bare file name, got '{}'",
            metadata_file
        );
    }

    if config.input.include_globs.is_empty() {
        anyhow::bail!("input.include_globs must not be empty");
    }

    if config.osis.work.trim().is_empty() {
        anyhow::bail!("osis.work must not be empty");
    }

    Ok(())
}
