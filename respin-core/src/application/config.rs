//! Settings and error handling for the application layer
//!
//! [`RewriteSettings`] is the full option set of one rewrite call. The
//! public [`Config`](crate::api::Config) is translated into it before any
//! work starts.

use crate::domain::pos::PosTagMatchType;
use crate::domain::spintax::SpinType;
use crate::domain::thesaurus::QualityRating;
use crate::domain::unique::InstantUniqueType;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Default option values
pub mod defaults {
    use crate::domain::pos::PosTagMatchType;
    use crate::domain::thesaurus::QualityRating;

    pub const WORD_QUALITY: QualityRating = QualityRating::BETTER;
    pub const PHRASE_QUALITY: QualityRating = QualityRating::AVERAGE;
    pub const POS_MATCH: PosTagMatchType = PosTagMatchType::Full;

    /// Longest phrase window is this many tokens after the first one
    pub const MAX_PHRASE_LENGTH: usize = 4;

    /// Depth limit for regenerated spintax
    pub const MAX_SPIN_DEPTH: usize = 5;

    pub const REPLACE_FREQUENCY: u32 = 1;
    pub const INSTANT_UNIQUE_FREQUENCY: u32 = 3;

    /// Versions produced by one multi-version call, at most
    pub const MAX_VERSIONS: usize = 20;
}

/// Options of one rewrite call
#[derive(Debug, Clone)]
pub struct RewriteSettings {
    /// How spintax already present in the input is resolved
    pub existing_spin: SpinType,
    /// Alternative index for ordered resolution
    pub ordered_index: usize,
    /// Run the sentence rules before the synonym pass
    pub sentence_rewrite: bool,
    pub word_quality: QualityRating,
    pub phrase_quality: QualityRating,
    pub pos_match: PosTagMatchType,
    pub instant_unique: InstantUniqueType,
    /// Re-tag the sentence with each candidate substituted
    pub check_grammar: bool,
    /// Only replace multi-word spans
    pub phrase_only: bool,
    /// Terms never replaced, matched on word boundaries
    pub protected_terms: Vec<String>,
    /// Emit spintax instead of a resolved text
    pub return_spin: bool,
    /// Each viable span is replaced with probability `1/replace_frequency`
    pub replace_frequency: u32,
    pub exclude_original: bool,
    pub dont_spin_existing_spin: bool,
    pub spin_tidy: bool,
    pub reorder_paragraphs: bool,
    /// Accepted candidates per span, 0 for no limit
    pub max_synonyms: usize,
    pub instant_unique_frequency: u32,
    /// `#name#` placeholders and their values
    pub replacement_tags: BTreeMap<String, Vec<String>>,
    /// Lines kept in place when paragraphs are reordered
    pub locked_lines: BTreeSet<usize>,
    /// Lines kept together with the line after them
    pub linked_lines: BTreeSet<usize>,
    pub signatures: Vec<String>,
    pub inhibit_proper_noun_spin: bool,
    pub max_phrase_length: usize,
}

impl Default for RewriteSettings {
    fn default() -> Self {
        Self {
            existing_spin: SpinType::None,
            ordered_index: 0,
            sentence_rewrite: true,
            word_quality: defaults::WORD_QUALITY,
            phrase_quality: defaults::PHRASE_QUALITY,
            pos_match: defaults::POS_MATCH,
            instant_unique: InstantUniqueType::None,
            check_grammar: false,
            phrase_only: false,
            protected_terms: Vec::new(),
            return_spin: false,
            replace_frequency: defaults::REPLACE_FREQUENCY,
            exclude_original: false,
            dont_spin_existing_spin: false,
            spin_tidy: true,
            reorder_paragraphs: false,
            max_synonyms: 0,
            instant_unique_frequency: defaults::INSTANT_UNIQUE_FREQUENCY,
            replacement_tags: BTreeMap::new(),
            locked_lines: BTreeSet::new(),
            linked_lines: BTreeSet::new(),
            signatures: Vec::new(),
            inhibit_proper_noun_spin: false,
            max_phrase_length: defaults::MAX_PHRASE_LENGTH,
        }
    }
}

impl RewriteSettings {
    /// Creates a new builder for RewriteSettings
    pub fn builder() -> RewriteSettingsBuilder {
        RewriteSettingsBuilder::new()
    }

    /// Whether the synonym pass has any quality level to work with
    pub fn spins_synonyms(&self) -> bool {
        !self.word_quality.is_none() || !self.phrase_quality.is_none()
    }

    /// Whether the call needs tags from a POS model
    pub fn needs_tags(&self) -> bool {
        self.pos_match != PosTagMatchType::None && self.spins_synonyms()
    }

    /// Validates the settings
    pub fn validate(&self) -> Result<(), ProcessingError> {
        if self.replace_frequency == 0 {
            return Err(ProcessingError::InvalidConfig {
                reason: "Replace frequency must be at least 1".to_string(),
            });
        }

        if self.instant_unique_frequency == 0 {
            return Err(ProcessingError::InvalidConfig {
                reason: "Instant unique frequency must be at least 1".to_string(),
            });
        }

        if self.replacement_tags.keys().any(|name| name.contains('#')) {
            return Err(ProcessingError::InvalidConfig {
                reason: "Replacement tag names cannot contain '#'".to_string(),
            });
        }

        Ok(())
    }
}

/// Errors raised by the application layer
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Invalid settings
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The POS model failed on a unit of work
    #[error("Language model failed: {0}")]
    Oracle(#[from] crate::domain::DomainError),

    /// Resource registration failed
    #[error("Failed to load resource: {reason}")]
    Load { reason: String },
}

/// Result type for application operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Builder for RewriteSettings with fluent API
#[derive(Debug, Clone, Default)]
pub struct RewriteSettingsBuilder {
    settings: RewriteSettings,
}

impl RewriteSettingsBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn existing_spin(mut self, mode: SpinType) -> Self {
        self.settings.existing_spin = mode;
        self
    }

    pub fn ordered_index(mut self, index: usize) -> Self {
        self.settings.ordered_index = index;
        self
    }

    pub fn sentence_rewrite(mut self, enabled: bool) -> Self {
        self.settings.sentence_rewrite = enabled;
        self
    }

    pub fn word_quality(mut self, quality: QualityRating) -> Self {
        self.settings.word_quality = quality;
        self
    }

    pub fn phrase_quality(mut self, quality: QualityRating) -> Self {
        self.settings.phrase_quality = quality;
        self
    }

    pub fn pos_match(mut self, kind: PosTagMatchType) -> Self {
        self.settings.pos_match = kind;
        self
    }

    pub fn instant_unique(mut self, kind: InstantUniqueType) -> Self {
        self.settings.instant_unique = kind;
        self
    }

    pub fn check_grammar(mut self, enabled: bool) -> Self {
        self.settings.check_grammar = enabled;
        self
    }

    pub fn phrase_only(mut self, enabled: bool) -> Self {
        self.settings.phrase_only = enabled;
        self
    }

    pub fn protected_terms(mut self, terms: Vec<String>) -> Self {
        self.settings.protected_terms = terms;
        self
    }

    pub fn return_spin(mut self, enabled: bool) -> Self {
        self.settings.return_spin = enabled;
        self
    }

    pub fn replace_frequency(mut self, frequency: u32) -> Self {
        self.settings.replace_frequency = frequency;
        self
    }

    pub fn exclude_original(mut self, enabled: bool) -> Self {
        self.settings.exclude_original = enabled;
        self
    }

    pub fn dont_spin_existing_spin(mut self, enabled: bool) -> Self {
        self.settings.dont_spin_existing_spin = enabled;
        self
    }

    pub fn spin_tidy(mut self, enabled: bool) -> Self {
        self.settings.spin_tidy = enabled;
        self
    }

    pub fn reorder_paragraphs(mut self, enabled: bool) -> Self {
        self.settings.reorder_paragraphs = enabled;
        self
    }

    pub fn max_synonyms(mut self, count: usize) -> Self {
        self.settings.max_synonyms = count;
        self
    }

    pub fn instant_unique_frequency(mut self, frequency: u32) -> Self {
        self.settings.instant_unique_frequency = frequency;
        self
    }

    pub fn replacement_tags(mut self, tags: BTreeMap<String, Vec<String>>) -> Self {
        self.settings.replacement_tags = tags;
        self
    }

    pub fn locked_lines(mut self, lines: BTreeSet<usize>) -> Self {
        self.settings.locked_lines = lines;
        self
    }

    pub fn linked_lines(mut self, lines: BTreeSet<usize>) -> Self {
        self.settings.linked_lines = lines;
        self
    }

    pub fn signatures(mut self, signatures: Vec<String>) -> Self {
        self.settings.signatures = signatures;
        self
    }

    pub fn inhibit_proper_noun_spin(mut self, enabled: bool) -> Self {
        self.settings.inhibit_proper_noun_spin = enabled;
        self
    }

    pub fn max_phrase_length(mut self, length: usize) -> Self {
        self.settings.max_phrase_length = length;
        self
    }

    /// Builds and validates the settings
    pub fn build(self) -> ProcessingResult<RewriteSettings> {
        self.settings.validate()?;
        Ok(self.settings)
    }

    /// Builds the settings without validation
    pub fn build_unchecked(self) -> RewriteSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RewriteSettings::default();
        assert_eq!(settings.word_quality, QualityRating::BETTER);
        assert_eq!(settings.phrase_quality, QualityRating::AVERAGE);
        assert_eq!(settings.pos_match, PosTagMatchType::Full);
        assert!(settings.sentence_rewrite);
        assert!(settings.spin_tidy);
        assert_eq!(settings.replace_frequency, 1);
        assert_eq!(settings.instant_unique_frequency, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_frequencies_are_rejected() {
        let result = RewriteSettings::builder().replace_frequency(0).build();
        assert!(matches!(result, Err(ProcessingError::InvalidConfig { .. })));

        let result = RewriteSettings::builder().instant_unique_frequency(0).build();
        assert!(result.is_err());

        // unchecked builds keep the value as given
        let settings = RewriteSettings::builder().replace_frequency(0).build_unchecked();
        assert_eq!(settings.replace_frequency, 0);
    }

    #[test]
    fn test_needs_tags() {
        let settings = RewriteSettings::default();
        assert!(settings.needs_tags());

        let settings = RewriteSettings::builder()
            .word_quality(QualityRating::NONE)
            .phrase_quality(QualityRating::NONE)
            .build()
            .unwrap();
        assert!(!settings.spins_synonyms());
        assert!(!settings.needs_tags());

        let settings = RewriteSettings::builder()
            .pos_match(PosTagMatchType::None)
            .build()
            .unwrap();
        assert!(!settings.needs_tags());
    }
}
