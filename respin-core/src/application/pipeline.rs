//! Whole-document rewrite
//!
//! Steps, in order: replacement tags, existing spintax, line-break
//! normalisation, the per-paragraph synonym pass, marker removal, paragraph
//! reordering and signatures. Cancellation is checked before each paragraph.
//! A paragraph that fails or panics is kept as written.

use super::config::RewriteSettings;
use super::paragraphs::{append_signatures, apply_replacement_tags, normalize_breaks, reorder_paragraphs};
use super::synonyms::SynonymPass;
use crate::domain::pos::PosOracle;
use crate::domain::rules::RuleSet;
use crate::domain::spintax::{spin_text, SpinOptions, SpinType};
use crate::domain::thesaurus::Thesaurus;
use crate::progress::{CancellationToken, ProgressListener, ProgressTracker};
use rand::Rng;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Shared, read-only inputs of one rewrite
#[derive(Clone, Copy)]
pub(crate) struct Resources<'a> {
    pub thesaurus: &'a Thesaurus,
    pub rules: Option<&'a RuleSet>,
    pub oracle: &'a dyn PosOracle,
}

/// Rewrite `source` paragraph by paragraph
///
/// A paragraph that fails is kept as written. On cancellation the source is
/// returned unchanged.
pub(crate) fn rewrite_document<R: Rng + ?Sized>(
    source: &str,
    settings: &RewriteSettings,
    resources: Resources<'_>,
    rng: &mut R,
    listener: Option<&dyn ProgressListener>,
    cancel: Option<&CancellationToken>,
) -> String {
    let mut pass = SynonymPass::new(
        settings,
        resources.thesaurus,
        resources.rules,
        resources.oracle,
        rng,
        ProgressTracker::new(listener),
    );
    pass.progress.start();

    let mut text = apply_replacement_tags(
        source,
        &settings.replacement_tags,
        settings.return_spin,
        pass.rng(),
    );

    if settings.existing_spin != SpinType::None {
        let mut options =
            SpinOptions::new(settings.existing_spin).with_exclude_original(settings.exclude_original);
        options.ordered_index = Some(settings.ordered_index);
        text = spin_text(&text, &options, pass.rng());
    }

    let text = normalize_breaks(&text);
    pass.set_total(text.len());

    let mut paragraphs = Vec::new();
    for paragraph in text.split('\n') {
        if cancel.is_some_and(|c| c.is_cancelled()) {
            log::debug!("rewrite cancelled after {} paragraphs", paragraphs.len());
            pass.progress.finish();
            return source.to_string();
        }
        if paragraph.trim().is_empty() {
            paragraphs.push(paragraph.to_string());
            continue;
        }
        match catch_unwind(AssertUnwindSafe(|| pass.spin_paragraph(paragraph))) {
            Ok(Ok(spun)) => paragraphs.push(spun),
            Ok(Err(e)) => {
                log::debug!("paragraph left unchanged: {e}");
                paragraphs.push(paragraph.to_string());
            }
            Err(_) => {
                log::warn!("paragraph left unchanged after a panic");
                paragraphs.push(paragraph.to_string());
            }
        }
    }

    let mut text = paragraphs.join("\n");
    if !settings.return_spin {
        text = text.replace("##", "");
    }

    if settings.reorder_paragraphs {
        match reorder_paragraphs(
            &text,
            &settings.locked_lines,
            &settings.linked_lines,
            cancel,
            pass.rng(),
        ) {
            Some(reordered) => text = reordered,
            None => log::debug!("paragraph reordering cancelled"),
        }
    }

    let text = append_signatures(text, &settings.signatures, settings.return_spin, pass.rng());
    pass.progress.finish();
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::domain::pos::{TagTable, TokenSpan};
    use crate::domain::rng::new_rng;
    use crate::domain::thesaurus::QualityRating;
    use crate::domain::unique::InstantUniqueType;
    use crate::language::embedded;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    fn rewrite(source: &str, settings: &RewriteSettings, seed: u64) -> String {
        let english = embedded("en").unwrap();
        let resources = Resources {
            thesaurus: &english.thesaurus,
            rules: Some(english.rules.as_ref()),
            oracle: english.oracle.as_ref(),
        };
        let mut rng = new_rng(Some(seed));
        rewrite_document(source, settings, resources, &mut rng, None, None)
    }

    #[test]
    fn test_paragraphs_are_spun_independently() {
        let settings = RewriteSettings::builder()
            .return_spin(true)
            .sentence_rewrite(false)
            .max_synonyms(1)
            .build()
            .unwrap();
        let out = rewrite("The quick fox.\n\nA big house.", &settings, 4);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("The {quick|fast}"), "{out}");
        assert!(lines[1].is_empty());
        assert!(lines[2].contains('{'), "{out}");
    }

    #[test]
    fn test_existing_spintax_is_resolved_first() {
        let settings = RewriteSettings::builder()
            .existing_spin(SpinType::Ordered)
            .ordered_index(1)
            .word_quality(QualityRating::NONE)
            .phrase_quality(QualityRating::NONE)
            .sentence_rewrite(false)
            .build()
            .unwrap();
        assert_eq!(rewrite("{red|green|blue} sky", &settings, 1), "green sky");
    }

    #[test]
    fn test_markers_removed_from_plain_output() {
        let settings = RewriteSettings::builder()
            .sentence_rewrite(false)
            .build()
            .unwrap();
        let out = rewrite("Keep ##this quick## part.", &settings, 2);
        assert_eq!(out, "Keep this quick part.");
    }

    #[test]
    fn test_replacement_tags_and_signatures() {
        let mut tags = BTreeMap::new();
        tags.insert("name".to_string(), vec!["Ann".to_string()]);
        let settings = RewriteSettings::builder()
            .word_quality(QualityRating::NONE)
            .phrase_quality(QualityRating::NONE)
            .sentence_rewrite(false)
            .replacement_tags(tags)
            .signatures(vec!["Regards".to_string()])
            .build()
            .unwrap();
        assert_eq!(rewrite("Hello #name#", &settings, 1), "Hello Ann\nRegards\n");
    }

    /// Delegates to the wrapped oracle but panics on paragraphs mentioning "boom"
    struct FailingOracle<'a>(&'a dyn PosOracle);

    impl PosOracle for FailingOracle<'_> {
        fn language(&self) -> &str {
            self.0.language()
        }

        fn sentences(&self, paragraph: &str) -> Result<Vec<String>, DomainError> {
            if paragraph.to_lowercase().contains("boom") {
                panic!("tagger crashed");
            }
            self.0.sentences(paragraph)
        }

        fn tokens(&self, sentence: &str) -> Result<Vec<String>, DomainError> {
            self.0.tokens(sentence)
        }

        fn tags(&self, tokens: &[String]) -> Result<Vec<String>, DomainError> {
            self.0.tags(tokens)
        }

        fn sentence_parts(&self, sentence: &str) -> Option<Vec<TokenSpan>> {
            self.0.sentence_parts(sentence)
        }

        fn tag_table(&self) -> &TagTable {
            self.0.tag_table()
        }
    }

    #[test]
    fn test_panicking_paragraph_is_kept() {
        let english = embedded("en").unwrap();
        let oracle = FailingOracle(english.oracle.as_ref());
        let resources = Resources {
            thesaurus: &english.thesaurus,
            rules: None,
            oracle: &oracle,
        };
        let settings = RewriteSettings::builder()
            .return_spin(true)
            .sentence_rewrite(false)
            .max_synonyms(1)
            .build()
            .unwrap();
        let mut rng = new_rng(Some(4));
        let out = rewrite_document(
            "Boom, the quick fox.\nThe quick fox.",
            &settings,
            resources,
            &mut rng,
            None,
            None,
        );
        assert_eq!(out, "Boom, the quick fox.\nThe {quick|fast} fox.");
    }

    #[test]
    fn test_instant_unique_skips_short_marker() {
        let settings = RewriteSettings::builder()
            .word_quality(QualityRating::NONE)
            .phrase_quality(QualityRating::NONE)
            .instant_unique(InstantUniqueType::Best)
            .instant_unique_frequency(1)
            .sentence_rewrite(false)
            .build()
            .unwrap();
        let out = rewrite("Keep ##a## safe", &settings, 6);
        let words: Vec<&str> = out.split(' ').collect();
        assert_eq!(words.len(), 3, "{out}");
        assert_eq!(words[1], "a", "{out}");
        assert_ne!(words[0], "Keep", "{out}");
        assert_ne!(words[2], "safe", "{out}");
    }

    #[test]
    fn test_cancel_returns_source() {
        let english = embedded("en").unwrap();
        let resources = Resources {
            thesaurus: &english.thesaurus,
            rules: None,
            oracle: english.oracle.as_ref(),
        };
        let token = CancellationToken::new();
        token.cancel();
        let settings = RewriteSettings::default();
        let mut rng = new_rng(Some(1));
        let source = "The quick fox.\nA big house.";
        let out = rewrite_document(source, &settings, resources, &mut rng, None, Some(&token));
        assert_eq!(out, source);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let seen = Mutex::new(Vec::new());
        let listener = |percent: f32| seen.lock().unwrap().push(percent);
        let english = embedded("en").unwrap();
        let resources = Resources {
            thesaurus: &english.thesaurus,
            rules: Some(english.rules.as_ref()),
            oracle: english.oracle.as_ref(),
        };
        let settings = RewriteSettings::default();
        let mut rng = new_rng(Some(9));
        rewrite_document(
            "The quick fox.\nA big house.\nAn important day.",
            &settings,
            resources,
            &mut rng,
            Some(&listener),
            None,
        );

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.first(), Some(&0.0));
        assert_eq!(seen.last(), Some(&100.0));
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]), "{seen:?}");
    }
}
