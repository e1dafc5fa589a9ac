//! Thesaurus substitution over one paragraph at a time
//!
//! Every sentence is tokenized and, for each token, phrase windows are tried
//! from the longest down to the single token. The first window with at
//! least one acceptable candidate is replaced and the scan resumes after it,
//! so a replaced phrase is never entered again. Replacements are recorded as
//! span edits against the paragraph and applied once at the end.

use super::config::{ProcessingResult, RewriteSettings};
use crate::domain::edit::EditList;
use crate::domain::pos::{get_locations, is_proper_noun, strip_html, OracleContext, PosOracle, PosTagMatchType};
use crate::domain::protect::ProtectedRegions;
use crate::domain::rules::RuleSet;
use crate::domain::spintax::with_article;
use crate::domain::thesaurus::{determine_case_code, Synonym, SynonymInfo, Thesaurus};
use crate::domain::unique::{apply_unique, CharSet};
use crate::progress::ProgressTracker;
use rand::Rng;
use std::ops::Range;

/// A sentence located in its paragraph, with its tokens
struct SentenceView<'s> {
    /// Sentence as written, markup included
    text: &'s str,
    /// Paragraph offset of `text`
    start: usize,
    /// Markup-free text the tokens were taken from
    stripped: String,
    tokens: Vec<String>,
    tags: Option<Vec<String>>,
    /// Paragraph offset of each token
    locations: Vec<Option<usize>>,
}

impl SentenceView<'_> {
    /// Paragraph range covered by tokens `i..=j`
    fn span(&self, i: usize, j: usize) -> Option<Range<usize>> {
        let from = (*self.locations.get(i)?)?;
        let to = (*self.locations.get(j)?)? + self.tokens.get(j)?.len();
        (from < to).then_some(from..to)
    }

    fn token(&self, index: Option<usize>) -> &str {
        index
            .and_then(|k| self.tokens.get(k))
            .map_or("", String::as_str)
    }
}

/// Synonym pass state shared by the paragraphs of one call
pub(crate) struct SynonymPass<'a, R: Rng + ?Sized> {
    settings: &'a RewriteSettings,
    thesaurus: &'a Thesaurus,
    rules: Option<&'a RuleSet>,
    oracle: OracleContext<'a>,
    charset: Option<&'static CharSet>,
    rng: &'a mut R,
    pub(super) progress: ProgressTracker<'a>,
    processed: usize,
    total: usize,
}

impl<'a, R: Rng + ?Sized> SynonymPass<'a, R> {
    pub(crate) fn new(
        settings: &'a RewriteSettings,
        thesaurus: &'a Thesaurus,
        rules: Option<&'a RuleSet>,
        oracle: &'a dyn PosOracle,
        rng: &'a mut R,
        progress: ProgressTracker<'a>,
    ) -> Self {
        Self {
            settings,
            thesaurus,
            rules,
            oracle: OracleContext::new(oracle),
            charset: settings.instant_unique.char_set(),
            rng,
            progress,
            processed: 0,
            total: 0,
        }
    }

    /// Text length progress is measured against
    pub(crate) fn set_total(&mut self, total: usize) {
        self.total = total;
        self.processed = 0;
    }

    pub(crate) fn rng(&mut self) -> &mut R {
        &mut *self.rng
    }

    fn advance(&mut self, chars: usize) {
        self.processed += chars;
        self.progress.report_fraction(self.processed, self.total);
    }

    /// Rewrite one paragraph
    ///
    /// A sentence that cannot be tokenized or tagged is left as it is; an
    /// error is returned only when the paragraph cannot be split.
    pub(crate) fn spin_paragraph(&mut self, paragraph: &str) -> ProcessingResult<String> {
        let settings = self.settings;
        let mut source = paragraph.to_string();
        if settings.sentence_rewrite {
            if let Some(rules) = self.rules {
                source = rules.rewrite_paragraph(&mut self.oracle, &source, settings.return_spin);
            }
        }

        let protected = ProtectedRegions::compute(
            &source,
            &settings.protected_terms,
            settings.dont_spin_existing_spin,
        );

        if !settings.spins_synonyms() {
            self.advance(source.len());
            return Ok(match self.charset {
                Some(set) => apply_unique(
                    &source,
                    set,
                    settings.instant_unique_frequency,
                    settings.return_spin,
                    Some(&protected),
                    self.rng,
                ),
                None => source,
            });
        }

        let mut edits = EditList::new();
        let mut offset = 0;
        for sentence in self.oracle.sentences(&source)? {
            let Some(found) = source
                .get(offset..)
                .and_then(|rest| rest.find(sentence.as_str()))
            else {
                log::debug!("sentence not found in paragraph: {sentence:?}");
                continue;
            };
            let start = offset + found;
            offset = start + sentence.len();

            if let Err(e) = self.spin_sentence(&source, start, &sentence, &protected, &mut edits) {
                log::debug!("sentence left unchanged: {e}");
            }
            self.advance(sentence.len());
        }
        Ok(edits.apply(&source))
    }

    fn spin_sentence(
        &mut self,
        source: &str,
        start: usize,
        sentence: &str,
        protected: &ProtectedRegions,
        edits: &mut EditList,
    ) -> ProcessingResult<()> {
        let settings = self.settings;
        let stripped = strip_html(sentence);
        let tokens = self.oracle.tokens(&stripped)?;
        if tokens.is_empty() {
            return Ok(());
        }
        let tags = if settings.pos_match != PosTagMatchType::None || settings.inhibit_proper_noun_spin {
            Some(self.oracle.tags(&tokens)?)
        } else {
            None
        };
        let view = SentenceView {
            text: sentence,
            start,
            locations: get_locations(sentence, &tokens, start),
            stripped,
            tokens,
            tags,
        };

        let mut i = 0;
        while i < view.tokens.len() {
            if view.locations[i].is_some() {
                let last = (i + settings.max_phrase_length).min(view.tokens.len() - 1);
                for j in (i..=last).rev() {
                    if let Some((range, text)) = self.replacement(source, &view, i, j, protected, edits) {
                        if !edits.push(range, text) {
                            log::debug!("replacement of tokens {i}..={j} overlaps an earlier edit");
                        }
                        i = j;
                        break;
                    }
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// Replacement for tokens `i..=j`, if the window is viable
    fn replacement(
        &mut self,
        source: &str,
        view: &SentenceView<'_>,
        i: usize,
        j: usize,
        protected: &ProtectedRegions,
        edits: &EditList,
    ) -> Option<(Range<usize>, String)> {
        let settings = self.settings;
        let is_phrase = j > i;
        if settings.phrase_only && !is_phrase {
            return None;
        }

        let mut range = view.span(i, j)?;
        if protected.overlaps(&range) || edits.overlaps(&range) {
            return None;
        }
        if settings.replace_frequency > 1 && self.rng.random_range(0..settings.replace_frequency) != 0 {
            return None;
        }

        let language = self.oracle.language();
        if settings.inhibit_proper_noun_spin {
            if let Some(tags) = &view.tags {
                if tags[i..=j].iter().any(|tag| is_proper_noun(language, tag)) {
                    return None;
                }
            }
        }

        let term = source.get(range.clone())?;
        let case = determine_case_code(language, term, &view.stripped);
        let candidates = self
            .thesaurus
            .synonym_details(term, case, self.oracle.tag_table())
            .unwrap_or_default();
        let mut accepted = self.accepted_candidates(view, i, j, term, candidates);

        if accepted.is_empty() {
            let set = self.charset.filter(|_| !is_phrase)?;
            let text = apply_unique(
                term,
                set,
                settings.instant_unique_frequency,
                settings.return_spin,
                None,
                self.rng,
            );
            return Some((range, text));
        }

        if !settings.exclude_original {
            let original = match self.charset {
                Some(set) => apply_unique(term, set, settings.instant_unique_frequency, false, None, self.rng),
                None => term.to_string(),
            };
            accepted.insert(0, original);
        }

        // "a quick" becomes "{a quick|a fast|an easy}" rather than "a {quick|easy}"
        if settings.spin_tidy && is_english(language) && i > 0 && is_article(&view.tokens[i - 1]) {
            if let Some(article) = view.span(i - 1, i - 1) {
                let gap = source.get(article.end..range.start).unwrap_or("x");
                let span = article.start..range.end;
                if gap.trim().is_empty() && !protected.overlaps(&span) && !edits.overlaps(&span) {
                    let capital = view.tokens[i - 1].starts_with(char::is_uppercase);
                    for candidate in accepted.iter_mut() {
                        if !starts_with_article(candidate) {
                            *candidate = with_article(candidate, capital);
                        }
                    }
                    range = span;
                }
            }
        }

        let text = if !settings.return_spin {
            let index = self.rng.random_range(0..accepted.len());
            accepted.swap_remove(index)
        } else if accepted.len() > 1 {
            format!("{{{}}}", accepted.join("|"))
        } else {
            accepted.remove(0)
        };
        Some((range, text))
    }

    /// Candidates passing every filter, in thesaurus order
    fn accepted_candidates(
        &mut self,
        view: &SentenceView<'_>,
        i: usize,
        j: usize,
        term: &str,
        candidates: Vec<Synonym>,
    ) -> Vec<String> {
        let settings = self.settings;
        let english = is_english(self.oracle.language());
        if settings.spin_tidy && english && ends_with_article(term) {
            return Vec::new();
        }

        let before = view.token(i.checked_sub(1));
        let after = view.token(Some(j + 1));
        let mut accepted: Vec<String> = Vec::new();

        for synonym in candidates {
            let text = synonym.text.as_str();
            if settings.spin_tidy && [term, before, after].iter().any(|word| same_text(text, word)) {
                continue;
            }
            if accepted.iter().any(|existing| same_text(existing, text)) {
                continue;
            }
            if settings.spin_tidy && text.contains('|') {
                continue;
            }
            let phrase_candidate = text.contains(' ');
            if settings.phrase_only && !phrase_candidate {
                continue;
            }
            if settings.spin_tidy && english && ends_with_article(text) {
                continue;
            }
            if !synonym
                .info
                .iter()
                .any(|info| self.accepts(view, i, j, text, phrase_candidate, info))
            {
                continue;
            }

            accepted.push(synonym.text);
            if settings.max_synonyms > 0 && accepted.len() >= settings.max_synonyms {
                break;
            }
        }
        accepted
    }

    /// Whether one POS entry of a candidate passes the POS, quality and
    /// grammar filters
    fn accepts(
        &mut self,
        view: &SentenceView<'_>,
        i: usize,
        j: usize,
        text: &str,
        phrase_candidate: bool,
        info: &SynonymInfo,
    ) -> bool {
        let settings = self.settings;
        let is_phrase = j > i;

        if let (false, Some(tags), true) = (is_phrase, &view.tags, settings.pos_match != PosTagMatchType::None) {
            let table = self.oracle.tag_table();
            if table.match_type(&tags[i], table.tag(info.pos)) < settings.pos_match {
                return false;
            }
        }

        let minimum = if is_phrase && phrase_candidate {
            settings.phrase_quality
        } else {
            settings.word_quality
        };
        if minimum.is_none() || !info.quality.satisfies(minimum) {
            return false;
        }

        if settings.check_grammar && settings.pos_match != PosTagMatchType::None {
            return self.is_pos_match(view, i, j, text);
        }
        true
    }

    /// Whether substituting `synonym` for tokens `i..=j` keeps the tags of
    /// the rest of the sentence
    fn is_pos_match(&mut self, view: &SentenceView<'_>, i: usize, j: usize, synonym: &str) -> bool {
        match self.try_pos_match(view, i, j, synonym) {
            Ok(matched) => matched,
            Err(e) => {
                log::debug!("grammar check of {synonym:?} failed: {e}");
                false
            }
        }
    }

    fn try_pos_match(
        &mut self,
        view: &SentenceView<'_>,
        i: usize,
        j: usize,
        synonym: &str,
    ) -> ProcessingResult<bool> {
        let Some(tags) = &view.tags else {
            return Ok(true);
        };
        let Some(span) = view.span(i, j) else {
            return Ok(false);
        };
        let (from, to) = (span.start - view.start, span.end - view.start);
        let (Some(head), Some(tail)) = (view.text.get(..from), view.text.get(to..)) else {
            return Ok(false);
        };

        let substituted = strip_html(&format!("{head}{synonym}{tail}"));
        let tokens = self.oracle.tokens(&substituted)?;
        let new_tags = self.oracle.tags(&tokens)?;
        let table = self.oracle.tag_table();
        let kind = self.settings.pos_match;
        let diff = new_tags.len() as isize - tags.len() as isize;

        let unchanged = |k: usize, new: usize| {
            new_tags
                .get(new)
                .is_some_and(|tag| table.tag_match(&tags[k], tag, kind, true))
        };
        if !(0..i).all(|k| unchanged(k, k)) {
            return Ok(false);
        }
        for k in j + 1..tags.len() {
            let shifted = k as isize + diff;
            if shifted < 0 || !unchanged(k, shifted as usize) {
                return Ok(false);
            }
        }

        let loose = |a: &str, b: &str| table.tag_match(a, b, PosTagMatchType::Loose, true);
        if diff > 0 && i == j {
            let last = i + diff as usize;
            return Ok((i..=last).any(|k| new_tags.get(k).is_some_and(|tag| loose(tag, &tags[i]))));
        }
        if j > i && !synonym.contains(' ') {
            return Ok(new_tags
                .get(i)
                .is_some_and(|new| (i..=j).any(|k| loose(&tags[k], new))));
        }
        Ok(true)
    }
}

fn is_english(language: &str) -> bool {
    language.eq_ignore_ascii_case("en")
}

fn is_article(word: &str) -> bool {
    word.eq_ignore_ascii_case("a") || word.eq_ignore_ascii_case("an")
}

fn starts_with_article(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.starts_with("a ") || lower.starts_with("an ")
}

fn ends_with_article(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.ends_with(" a") || lower.ends_with(" an")
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
