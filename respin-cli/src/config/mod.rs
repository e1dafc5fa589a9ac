//! `respin.toml` configuration
//!
//! Every field has a default, so a file only needs the values it changes.
//! Command-line flags override the file. Levels use the integer scales of
//! the legacy service (word quality 5 best to 1 all, 0 off).

use crate::error::CliError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "respin.toml";

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Rewrite options
    #[serde(default)]
    pub rewrite: RewriteConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Rewrite options
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RewriteConfig {
    /// Language code or embedded language name
    pub language: String,
    pub word_quality: i32,
    /// 6 follows the word quality
    pub phrase_quality: i32,
    pub pos_match: i32,
    /// 2 lookalike letters, 1 with accented letters, 0 off
    pub instant_unique: i32,
    /// 2 ordered, 1 random, 0 leave existing spintax alone
    pub existing_spin: i32,
    pub sentence_rewrite: bool,
    pub spin_tidy: bool,
    pub return_spin: bool,
    pub exclude_original: bool,
    /// 0 keeps every accepted synonym
    pub max_synonyms: usize,
    pub replace_frequency: u32,
    pub protected_terms: Vec<String>,
    /// `open|close` pairs separated by commas
    pub protected_tags: String,
    pub signatures: Vec<String>,
    /// Extra thesaurus file, TOML or line format
    pub thesaurus: Option<PathBuf>,
    /// Extra rules file
    pub rules: Option<PathBuf>,
    /// `#name#` placeholders and their values
    pub replacement_tags: BTreeMap<String, Vec<String>>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            word_quality: 4,
            phrase_quality: 2,
            pos_match: 3,
            instant_unique: 0,
            existing_spin: 0,
            sentence_rewrite: true,
            spin_tidy: true,
            return_spin: false,
            exclude_original: false,
            max_synonyms: 0,
            replace_frequency: 1,
            protected_terms: Vec::new(),
            protected_tags: String::new(),
            signatures: Vec::new(),
            thesaurus: None,
            rules: None,
            replacement_tags: BTreeMap::new(),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,

    /// Include metadata in JSON output
    pub include_metadata: bool,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            include_metadata: true,
            pretty_json: true,
        }
    }
}

impl CliConfig {
    /// Load `path`, or `respin.toml` from the working directory when it
    /// exists, or the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    log::debug!("using {DEFAULT_CONFIG_FILE} from the working directory");
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[rewrite]\nreturn_spin = true\nword_quality = 5\n").unwrap();

        let config = CliConfig::from_file(file.path()).unwrap();
        assert!(config.rewrite.return_spin);
        assert_eq!(config.rewrite.word_quality, 5);
        assert_eq!(config.rewrite.phrase_quality, 2);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[rewrite]\nword_quality = \"high\"\n").unwrap();

        let error = CliConfig::from_file(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Configuration error:"), "{error}");
        assert!(CliConfig::from_file(Path::new("/nonexistent/respin.toml")).is_err());
    }

    #[test]
    fn test_generated_toml_parses_back() {
        let config = CliConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[rewrite]"));
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
