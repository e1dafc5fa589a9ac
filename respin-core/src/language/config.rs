//! Configuration structures and validation
//!
//! This module defines the TOML schema of a language resource file.

use crate::domain::pos::TagRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root language configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub metadata: Metadata,
    pub sentences: Sentences,
    #[serde(default)]
    pub abbreviations: Abbreviations,
    pub tags: Vec<TagRow>,
    #[serde(default)]
    pub suffixes: Vec<SuffixRule>,
    #[serde(default)]
    pub lexicon: Lexicon,
}

/// Language metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

/// Sentence and clause boundaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentences {
    pub terminators: Vec<char>,
    #[serde(default)]
    pub closers: Vec<char>,
    #[serde(default)]
    pub clause_separators: Vec<String>,
}

/// Abbreviations, lowercased and without their final period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Abbreviations {
    #[serde(flatten)]
    pub categories: HashMap<String, Vec<String>>,
}

/// Words by tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    #[serde(flatten)]
    pub tags: HashMap<String, Vec<String>>,
}

/// Fallback tag for unknown words with a given ending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuffixRule {
    pub ending: String,
    pub tag: String,
    #[serde(default)]
    pub min_length: usize,
}

impl LanguageConfig {
    /// Validate configuration
    pub(crate) fn validate(&self) -> Result<(), String> {
        let code = &self.metadata.code;
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(format!("Invalid language code '{code}'"));
        }

        if self.sentences.terminators.is_empty() {
            return Err("No terminator characters defined".to_string());
        }

        // every tag the oracle can emit must be in the tag table
        let known = |tag: &str| self.tags.iter().any(|row| row.tag == tag);
        if let Some(tag) = self
            .lexicon
            .tags
            .keys()
            .map(String::as_str)
            .chain(self.suffixes.iter().map(|rule| rule.tag.as_str()))
            .find(|tag| !known(tag))
        {
            return Err(format!("Tag '{tag}' is not in the tag table"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[metadata]
code = "en"
name = "English"

[sentences]
terminators = ["."]

[[tags]]
tag = "NN"
id = 100
group = 10

[lexicon]
NN = ["cat"]
"#;

    #[test]
    fn test_minimal_config() {
        let config: LanguageConfig = toml::from_str(MINIMAL).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.abbreviations.categories.is_empty());
        assert_eq!(config.lexicon.tags["NN"], vec!["cat"]);
    }

    #[test]
    fn test_unknown_lexicon_tag() {
        let content = MINIMAL.replace("NN = [", "VB = [");
        let config: LanguageConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().unwrap_err().contains("VB"));
    }

    #[test]
    fn test_bad_code() {
        let content = MINIMAL.replace("code = \"en\"", "code = \"english\"");
        let config: LanguageConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_err());
    }
}
