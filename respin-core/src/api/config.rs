//! Configuration API for rewriting

use crate::api::{Error, Language};
use crate::application::RewriteSettings;
use crate::domain::pos::PosTagMatchType;
use crate::domain::spintax::SpinType;
use crate::domain::thesaurus::QualityRating;
use crate::domain::unique::InstantUniqueType;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

pub use crate::application::defaults;

/// Phrase quality level meaning "same as the word quality"
pub const PHRASE_QUALITY_AS_WORD: i32 = 6;

/// Rewrite configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub(crate) language: Language,
    pub(crate) settings: RewriteSettings,
    /// `open|close,open|close` marker pairs whose content is kept verbatim
    pub(crate) protected_tags: String,
    /// Fixed seed for reproducible output
    pub(crate) seed: Option<u64>,
}

impl Config {
    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn settings(&self) -> &RewriteSettings {
        &self.settings
    }

    pub fn protected_tags(&self) -> &str {
        &self.protected_tags
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validate the configuration
    pub(crate) fn validate(&self) -> Result<(), Error> {
        self.settings.validate()?;
        Ok(())
    }
}

/// Fluent builder for configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    language: Option<String>,
    settings: RewriteSettings,
    phrase_quality_as_word: bool,
    protected_tags: Option<String>,
    seed: Option<u64>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language by code or embedded language name
    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    /// Start from complete settings, replacing everything set so far
    pub fn settings(mut self, settings: RewriteSettings) -> Self {
        self.settings = settings;
        self.phrase_quality_as_word = false;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn protected_tags(mut self, pairs: impl Into<String>) -> Self {
        self.protected_tags = Some(pairs.into());
        self
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
        self.phrase_quality_as_word = false;
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

    pub fn protected_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.protected_terms = terms.into_iter().map(Into::into).collect();
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

    pub fn replacement_tag<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings
            .replacement_tags
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn replacement_tags(mut self, tags: BTreeMap<String, Vec<String>>) -> Self {
        self.settings.replacement_tags = tags;
        self
    }

    pub fn locked_lines(mut self, lines: impl IntoIterator<Item = usize>) -> Self {
        self.settings.locked_lines = lines.into_iter().collect::<BTreeSet<_>>();
        self
    }

    pub fn linked_lines(mut self, lines: impl IntoIterator<Item = usize>) -> Self {
        self.settings.linked_lines = lines.into_iter().collect::<BTreeSet<_>>();
        self
    }

    pub fn signatures<I, S>(mut self, signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.signatures = signatures.into_iter().map(Into::into).collect();
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

    /// Word quality as a legacy level, clamped to `1..=5`
    pub fn word_quality_level(self, level: i32) -> Self {
        self.word_quality(QualityRating::from_level(level.clamp(1, 5)))
    }

    /// Phrase quality as a legacy level; [`PHRASE_QUALITY_AS_WORD`] follows
    /// the word quality and anything outside `1..=5` disables phrases
    pub fn phrase_quality_level(mut self, level: i32) -> Self {
        if level == PHRASE_QUALITY_AS_WORD {
            self.phrase_quality_as_word = true;
            self
        } else {
            self.phrase_quality(QualityRating::from_level(level))
        }
    }

    /// POS match as a legacy level, clamped to `0..=4`
    pub fn pos_match_level(self, level: i32) -> Self {
        self.pos_match(PosTagMatchType::from_level(level.clamp(0, 4)))
    }

    /// Instant unique as a legacy level: 2 best, 1 full, anything else off
    pub fn instant_unique_level(self, level: i32) -> Self {
        self.instant_unique(InstantUniqueType::from_level(level))
    }

    /// Existing spintax handling as a legacy level: 2 ordered, 1 random
    pub fn existing_spin_level(self, level: i32) -> Self {
        self.existing_spin(SpinType::from_level(level))
    }

    /// Build the configuration
    pub fn build(mut self) -> Result<Config, Error> {
        let mut config = Config::default();

        if let Some(code) = self.language {
            config.language = Language::from_str(&code)?;
        }

        if self.phrase_quality_as_word {
            self.settings.phrase_quality = self.settings.word_quality;
        }
        config.settings = self.settings;

        if let Some(pairs) = self.protected_tags {
            config.protected_tags = pairs;
        }

        config.seed = self.seed;

        config.validate()?;
        Ok(config)
    }
}

/// Parse a legacy integer parameter
///
/// Empty or unparsable text gives `default`; `true` and `false` count as 1
/// and 0.
pub fn parse_level(value: &str, default: i32) -> i32 {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "true" => 1,
        "false" => 0,
        other => other.parse().unwrap_or(default),
    }
}

/// Parse a legacy boolean parameter: `1` or `true` is set, empty gives `default`
pub fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "1" | "true" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::builder().build().unwrap();
        assert_eq!(config.language().code(), "en");
        assert_eq!(config.settings().word_quality, defaults::WORD_QUALITY);
        assert!(config.protected_tags().is_empty());
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_legacy_levels_clamp() {
        let config = Config::builder()
            .word_quality_level(9)
            .pos_match_level(-2)
            .instant_unique_level(2)
            .existing_spin_level(2)
            .build()
            .unwrap();
        assert_eq!(config.settings.word_quality, QualityRating::BEST);
        assert_eq!(config.settings.pos_match, PosTagMatchType::None);
        assert_eq!(config.settings.instant_unique, InstantUniqueType::Best);
        assert_eq!(config.settings.existing_spin, SpinType::Ordered);

        let config = Config::builder().word_quality_level(0).build().unwrap();
        assert_eq!(config.settings.word_quality, QualityRating::ALL);
    }

    #[test]
    fn test_phrase_quality_follows_word_quality() {
        let config = Config::builder()
            .phrase_quality_level(PHRASE_QUALITY_AS_WORD)
            .word_quality_level(5)
            .build()
            .unwrap();
        assert_eq!(config.settings.phrase_quality, QualityRating::BEST);

        let config = Config::builder().phrase_quality_level(0).build().unwrap();
        assert!(config.settings.phrase_quality.is_none());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::builder().replace_frequency(0).build(),
            Err(Error::Configuration(_))
        ));
        assert!(Config::builder().language("??").build().is_err());
    }

    #[test]
    fn test_legacy_parsing() {
        assert_eq!(parse_level("", 3), 3);
        assert_eq!(parse_level("true", 3), 1);
        assert_eq!(parse_level("false", 3), 0);
        assert_eq!(parse_level(" 4 ", 3), 4);
        assert_eq!(parse_level("x", 3), 3);
        assert!(parse_flag("1", false));
        assert!(parse_flag("", true));
        assert!(!parse_flag("0", true));
    }
}
