//! `labeler.toml` configuration.
//!
//! Sections:
//! - `[input]` - taxonomy export, example CSV and its column names
//! - `[output]` - labeled output file, label prefix, delimiter and escape
//! - `[rollup]` - minimum support per label
//! - `[text]` - stemmer selection
//! - `[synonyms]` - neighbor table, word list, output and similarity threshold
//!
//! Environment variables with the `LABELER_` prefix override file values:
//! - `LABELER_INPUT_TAXONOMY` → `input.taxonomy`
//! - `LABELER_INPUT_EXAMPLES` → `input.examples`
//! - `LABELER_OUTPUT_PATH` → `output.path`
//! - `LABELER_OUTPUT_LABEL_PREFIX` → `output.label_prefix`
//! - `LABELER_ROLLUP_MIN_SUPPORT` → `rollup.min_support`
//! - `LABELER_TEXT_STEMMER` → `text.stemmer`
//! - `LABELER_SYNONYMS_THRESHOLD` → `synonyms.threshold`

use anyhow::{bail, Context, Result};
use labeler_rollup::{OutputFormat, DEFAULT_LABEL_PREFIX};
use labeler_text::{ExampleColumns, StemmerKind, DEFAULT_SIMILARITY_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "labeler.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub rollup: RollupConfig,
    pub text: TextConfig,
    pub synonyms: SynonymsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Category export (JSON)
    pub taxonomy: PathBuf,
    /// Training queries (CSV with header)
    pub examples: PathBuf,
    pub category_column: String,
    pub text_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        let columns = ExampleColumns::default();
        Self {
            taxonomy: PathBuf::from("datasets/product_data/categories/categories.xml"),
            examples: PathBuf::from("datasets/train.csv"),
            category_column: columns.category,
            text_column: columns.text,
        }
    }
}

impl InputConfig {
    pub fn columns(&self) -> ExampleColumns {
        ExampleColumns {
            category: self.category_column.clone(),
            text: self.text_column.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub label_prefix: String,
    pub delimiter: char,
    pub escape: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let format = OutputFormat::default();
        Self {
            path: PathBuf::from("datasets/fasttext/labeled_queries.txt"),
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            delimiter: format.delimiter,
            escape: format.escape,
        }
    }
}

impl OutputConfig {
    pub fn format(&self) -> OutputFormat {
        OutputFormat {
            delimiter: self.delimiter,
            escape: self.escape,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    /// Minimum examples per emitted label
    pub min_support: usize,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self { min_support: 1 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub stemmer: StemmerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymsConfig {
    /// Nearest-neighbor table (JSON)
    pub neighbors: PathBuf,
    /// One word per line
    pub words: PathBuf,
    pub output: PathBuf,
    pub threshold: f32,
}

impl Default for SynonymsConfig {
    fn default() -> Self {
        Self {
            neighbors: PathBuf::from("datasets/fasttext/neighbors.json"),
            words: PathBuf::from("datasets/fasttext/top_words.txt"),
            output: PathBuf::from("datasets/fasttext/synonyms.csv"),
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl LabelerConfig {
    /// Load `path`, or `labeler.toml` from the working directory when present,
    /// or defaults; then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("Failed to parse TOML config")
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `LABELER_*` overrides resolved through `lookup`
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LABELER_INPUT_TAXONOMY") {
            self.input.taxonomy = PathBuf::from(v);
        }
        if let Some(v) = lookup("LABELER_INPUT_EXAMPLES") {
            self.input.examples = PathBuf::from(v);
        }
        if let Some(v) = lookup("LABELER_OUTPUT_PATH") {
            self.output.path = PathBuf::from(v);
        }
        if let Some(v) = lookup("LABELER_OUTPUT_LABEL_PREFIX") {
            self.output.label_prefix = v;
        }
        if let Some(v) = lookup("LABELER_ROLLUP_MIN_SUPPORT") {
            match v.trim().parse::<usize>() {
                Ok(min_support) => self.rollup.min_support = min_support,
                Err(_) => log::warn!("Ignoring LABELER_ROLLUP_MIN_SUPPORT={v}: not a count"),
            }
        }
        if let Some(v) = lookup("LABELER_TEXT_STEMMER") {
            match v.parse::<StemmerKind>() {
                Ok(stemmer) => self.text.stemmer = stemmer,
                Err(err) => log::warn!("Ignoring LABELER_TEXT_STEMMER: {err}"),
            }
        }
        if let Some(v) = lookup("LABELER_SYNONYMS_THRESHOLD") {
            match v.trim().parse::<f32>() {
                Ok(threshold) => self.synonyms.threshold = threshold,
                Err(_) => log::warn!("Ignoring LABELER_SYNONYMS_THRESHOLD={v}: not a number"),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let output = &self.output;
        if output.label_prefix.is_empty() {
            bail!("output.label_prefix must not be empty");
        }
        if output.label_prefix.chars().any(char::is_whitespace) {
            bail!(
                "output.label_prefix must not contain whitespace (got '{}')",
                output.label_prefix
            );
        }
        if output.delimiter == output.escape {
            bail!(
                "output.delimiter and output.escape must differ (both '{}')",
                output.delimiter
            );
        }
        if output.delimiter.is_whitespace() {
            bail!("output.delimiter must not be whitespace");
        }
        if self.input.category_column.is_empty() || self.input.text_column.is_empty() {
            bail!("input.category_column and input.text_column must not be empty");
        }
        if !(0.0..=1.0).contains(&self.synonyms.threshold) {
            bail!(
                "synonyms.threshold must be within [0, 1] (got {})",
                self.synonyms.threshold
            );
        }
        Ok(())
    }
}
