//! Sentence rewriting with a rule set
//!
//! Every clause of a sentence is matched against the rules in file order;
//! the first rule matching a clause wins and its first match is used. The
//! matched tokens are then rebuilt in the rule's replace order and spliced
//! back into the sentence, either directly or as a two-way spintax group
//! around the part that actually changed.

use super::command::Command;
use super::matcher::{find_matches, Bounds, Matcher, RuleRun};
use super::rule::{OrderItem, Rule, RuleSet};
use crate::domain::edit::EditList;
use crate::domain::error::DomainError;
use crate::domain::pos::{
    get_locations, is_proper_noun, starts_with_punctuation, OracleContext, TokenSpan,
};
use crate::domain::protect::ProtectedRegions;
use regex::Regex;
use std::sync::OnceLock;

fn html_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

/// Text emitted for one command
#[derive(Debug, Clone, Default)]
struct Piece {
    text: String,
    tag: Option<String>,
}

/// Tokens of one sentence with their tags and offsets in the sentence
struct TaggedSentence<'s> {
    sentence: &'s str,
    tokens: Vec<String>,
    tags: Vec<String>,
    locations: Vec<Option<usize>>,
}

impl TaggedSentence<'_> {
    /// Sentence text covered by tokens `range`
    fn text(&self, range: std::ops::Range<usize>) -> Option<(usize, &str)> {
        let last = range.end.checked_sub(1).filter(|&last| last >= range.start)?;
        let from = (*self.locations.get(range.start)?)?;
        let to = (*self.locations.get(last)?)? + self.tokens.get(last)?.len();
        self.sentence.get(from..to).map(|text| (from, text))
    }
}

impl RuleSet {
    /// Rewrite every sentence of a paragraph
    ///
    /// Sentences overlapping a `##...##` marker are left alone. Any failure
    /// returns the paragraph unchanged.
    pub fn rewrite_paragraph(
        &self,
        ctx: &mut OracleContext<'_>,
        paragraph: &str,
        return_spin: bool,
    ) -> String {
        if self.is_empty() || paragraph.trim().is_empty() {
            return paragraph.to_string();
        }
        match self.try_rewrite_paragraph(ctx, paragraph, return_spin) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("paragraph rewrite failed: {e}");
                paragraph.to_string()
            }
        }
    }

    fn try_rewrite_paragraph(
        &self,
        ctx: &mut OracleContext<'_>,
        paragraph: &str,
        return_spin: bool,
    ) -> Result<String, DomainError> {
        let markers = ProtectedRegions::compute::<&str>(paragraph, &[], false);
        let mut edits = EditList::new();
        let mut offset = 0;

        for sentence in ctx.sentences(paragraph)? {
            let Some(found) = paragraph
                .get(offset..)
                .and_then(|rest| rest.find(sentence.as_str()))
            else {
                log::debug!("sentence not found in paragraph: {sentence:?}");
                continue;
            };
            let range = offset + found..offset + found + sentence.len();
            offset = range.end;
            if markers.overlaps(&range) {
                continue;
            }

            let rewritten = self.rewrite_sentence(ctx, &sentence, return_spin);
            if rewritten != sentence {
                edits.push(range, rewritten);
            }
        }
        Ok(edits.apply(paragraph))
    }

    /// Rewrite one sentence; any failure returns it unchanged
    pub fn rewrite_sentence(
        &self,
        ctx: &mut OracleContext<'_>,
        sentence: &str,
        return_spin: bool,
    ) -> String {
        if self.is_empty() {
            return sentence.to_string();
        }
        match self.try_rewrite_sentence(ctx, sentence, return_spin) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("sentence rewrite failed: {e}");
                sentence.to_string()
            }
        }
    }

    fn try_rewrite_sentence(
        &self,
        ctx: &mut OracleContext<'_>,
        sentence: &str,
        return_spin: bool,
    ) -> Result<String, DomainError> {
        let mut stripped = html_tag_regex().replace_all(sentence, "").into_owned();
        if !stripped.is_empty() && !stripped.ends_with(crate::domain::pos::is_punctuation) {
            stripped.push('.');
        }

        let tokens = ctx.tokens(&stripped)?;
        if tokens.is_empty() {
            return Ok(sentence.to_string());
        }
        let tags = ctx.tags(&tokens)?;
        let locations = get_locations(sentence, &tokens, 0);

        let mut parts = ctx.sentence_parts(&stripped, tokens.len());
        if parts.last().map_or(true, |part| part.end + 1 != tokens.len()) {
            parts = vec![TokenSpan::new(0, tokens.len() - 1)];
        }

        let tagged = TaggedSentence {
            sentence,
            tokens,
            tags,
            locations,
        };
        let runs = self.select_runs(&tagged, &parts);
        Ok(self.apply_runs(ctx, &tagged, &runs, return_spin))
    }

    /// First match of the first matching rule for every clause
    fn select_runs(&self, tagged: &TaggedSentence<'_>, parts: &[TokenSpan]) -> Vec<RuleRun> {
        let count = tagged.tokens.len();
        let has_terminator = tagged.tags.last().is_some_and(|tag| tag == ".");
        let limit = count - usize::from(has_terminator);

        let mut selected = Vec::new();
        for part in parts {
            let start = part.start;
            let end = part.end.min(count - 1);
            if end < start {
                continue;
            }
            let mut len = end - start + 1;
            if starts_with_punctuation(&tagged.tokens[end]) {
                len -= 1;
            }
            let tokens = &tagged.tokens[start..start + len];
            let tags = &tagged.tags[start..start + len];

            let found = self
                .rules
                .iter()
                .enumerate()
                .map(|(index, rule)| find_matches(index, rule, tokens, tags, &self.words))
                .find(|runs| !runs.is_empty());

            if let Some(mut run) = found.and_then(|runs| runs.into_iter().next()) {
                run.offset(start);
                run.last.end = run.last.end.min(limit);
                run.last.start = run.last.start.min(run.last.end);
                selected.push(run);
            }
        }
        selected
    }

    /// Splice rule runs into the sentence, last run first
    fn apply_runs(
        &self,
        ctx: &mut OracleContext<'_>,
        tagged: &TaggedSentence<'_>,
        runs: &[RuleRun],
        return_spin: bool,
    ) -> String {
        let mut edits = EditList::new();
        for run in runs.iter().rev() {
            let Some(rule) = self.rules.get(run.rule) else {
                continue;
            };
            let span = run.span();
            let Some((from, source)) = tagged.text(span.clone()) else {
                continue;
            };
            if source.contains(['{', '|', '}']) {
                continue;
            }
            let Some(mut rewrite) = self.rewrite_part(ctx.language(), rule, tagged, span.start, span.end)
            else {
                continue;
            };
            if rewrite.is_empty() || without_spaces(source) == without_spaces(&rewrite) {
                continue;
            }

            // drop trailing punctuation the source does not have
            while source.chars().last().map_or(true, char::is_alphanumeric)
                && rewrite.chars().last().is_some_and(|c| !c.is_alphanumeric())
            {
                rewrite.pop();
            }

            if return_spin {
                match spin_difference(ctx, source, &rewrite) {
                    Some(spin) => rewrite = spin,
                    None => continue,
                }
            }
            edits.push(from..from + source.len(), rewrite);
        }
        edits.apply(tagged.sentence)
    }

    /// Rebuild tokens `start..end` in the rule's replace order
    ///
    /// Returns `None` when no command produced text or the result would
    /// start with punctuation.
    fn rewrite_part(
        &self,
        language: &str,
        rule: &Rule,
        tagged: &TaggedSentence<'_>,
        start: usize,
        end: usize,
    ) -> Option<String> {
        let matcher = Matcher::new(rule, &tagged.tokens, &tagged.tags, &self.words);
        let mut pieces: Vec<Piece> = Vec::with_capacity(rule.commands.len());
        let mut matched = false;
        let mut index = start;

        for (i, command) in rule.commands.iter().enumerate() {
            if index >= end {
                break;
            }
            match command {
                Command::Anchor => pieces.push(Piece::default()),
                Command::List {
                    name,
                    source,
                    result,
                    negated,
                } => {
                    let token = &tagged.tokens[index];
                    let text = if *negated {
                        None
                    } else {
                        self.words.get(name).and_then(|list| {
                            let position = list.position(*source, token)?;
                            list.group(*result)?.get(position).cloned()
                        })
                    };
                    pieces.push(Piece {
                        text: text.unwrap_or_else(|| token.clone()),
                        tag: None,
                    });
                    matched = true;
                    index += 1;
                }
                Command::Word { .. } | Command::WordRun { .. } => {
                    let mut bounds = Bounds::default();
                    let taken = matcher
                        .match_at(i, index, Some(&mut bounds))
                        .then_some(bounds.first)
                        .flatten();
                    let Some(taken) = taken else {
                        pieces.push(Piece::default());
                        continue;
                    };
                    let stop = taken.end.min(end);
                    let text = if stop <= index {
                        String::new()
                    } else {
                        tagged.text(index..stop)?.1.to_string()
                    };
                    pieces.push(Piece {
                        text,
                        tag: tagged.tags.get(index).cloned(),
                    });
                    matched = true;
                    index = stop.max(index);
                }
            }
        }
        if !matched {
            return None;
        }
        pieces.resize(rule.commands.len(), Piece::default());

        let mut out = String::new();
        for (i, item) in rule.order.iter().enumerate() {
            let (text, tag) = match item {
                OrderItem::Command(n) => (pieces[*n].text.as_str(), pieces[*n].tag.as_deref()),
                OrderItem::Literal(text) => (text.as_str(), None),
            };
            if text.is_empty() {
                continue;
            }

            if start == 0 && out.is_empty() {
                out.push_str(&upper_first(text));
            } else if should_lower(language, text, tag) {
                out.push_str(&lower_first(text));
            } else {
                out.push_str(text);
            }

            let next = rule.order[i + 1..].iter().find_map(|item| match item {
                OrderItem::Command(n) => Some(pieces[*n].text.as_str()).filter(|t| !t.is_empty()),
                OrderItem::Literal(text) => Some(text.as_str()),
            });
            if next.is_some_and(|next| !starts_with_punctuation(next)) {
                out.push(' ');
            }
        }

        if starts_with_punctuation(out.trim()) {
            return None;
        }
        Some(out)
    }
}

/// Wrap only the tokens that differ between `source` and `rewrite`
///
/// Leading and trailing tokens the two share stay outside the group.
fn spin_difference(ctx: &mut OracleContext<'_>, source: &str, rewrite: &str) -> Option<String> {
    let source_tokens = ctx.tokens(source).ok()?;
    let rewrite_tokens = ctx.tokens(rewrite).ok()?;
    let locations = get_locations(source, &source_tokens, 0);

    let lead = source_tokens
        .iter()
        .zip(&rewrite_tokens)
        .take_while(|(a, b)| a == b)
        .count();
    let trail = source_tokens
        .iter()
        .rev()
        .zip(rewrite_tokens.iter().rev())
        .take(source_tokens.len() - lead)
        .take_while(|(a, b)| a == b)
        .count();

    let head = match (lead, locations.get(lead)) {
        (0, _) => "",
        (_, Some(location)) => &source[..(*location)?],
        (_, None) => source,
    };
    let mut tail = if trail == 0 {
        String::new()
    } else {
        let location = (*locations.get(source_tokens.len() - trail)?)?;
        source[location..].to_string()
    };
    if !tail.is_empty() && tail.len() < source.len() {
        if let Some(c) = source[..source.len() - tail.len()]
            .chars()
            .last()
            .filter(|c| c.is_whitespace())
        {
            tail.insert(0, c);
        }
    }

    let middle = |text: &str| {
        let to = text.len().checked_sub(tail.len())?;
        text.get(head.len()..to).map(str::to_string)
    };
    let source_middle = middle(source).unwrap_or_default();
    let rewrite_middle = middle(rewrite).unwrap_or_default();
    Some(format!("{head}{{{source_middle}|{rewrite_middle}}}{tail}"))
}

fn without_spaces(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Incidental capitals are dropped unless the word is "I", a proper noun or
/// an acronym
fn should_lower(language: &str, text: &str, tag: Option<&str>) -> bool {
    let mut chars = text.chars();
    let first_upper = chars.next().is_some_and(char::is_uppercase);
    let second_upper = chars.next().is_some_and(char::is_uppercase);
    first_upper
        && text != "I"
        && !tag.is_some_and(|tag| is_proper_noun(language, tag))
        && !second_upper
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pos::oracle::testing::ScriptedOracle;

    const LEXICON: &[(&str, &str)] = &[
        ("the", "DT"),
        ("is", "VBZ"),
        ("warm", "JJ"),
        ("soft", "JJ"),
        ("and", "CC"),
        ("big", "JJ"),
        ("red", "JJ"),
        ("paris", "NNP"),
    ];

    fn rules(source: &str) -> RuleSet {
        let (set, errors) = RuleSet::parse("en", source);
        assert!(errors.is_empty(), "{errors:?}");
        set
    }

    #[test]
    fn test_swap_adjectives() {
        let oracle = ScriptedOracle::new(LEXICON);
        let mut ctx = OracleContext::new(&oracle);
        let set = rules("012JJ/2and/012JJ 2/1/0");
        assert_eq!(
            set.rewrite_sentence(&mut ctx, "The coat is warm and soft.", false),
            "The coat is soft and warm."
        );
        assert_eq!(
            set.rewrite_sentence(&mut ctx, "The coat is warm and soft.", true),
            "The coat is {warm and soft|soft and warm}."
        );
    }

    #[test]
    fn test_sentence_start_casing() {
        let oracle = ScriptedOracle::new(LEXICON);
        let mut ctx = OracleContext::new(&oracle);
        let set = rules("3/012JJ/2and/012JJ 3/2/1");
        assert_eq!(
            set.rewrite_sentence(&mut ctx, "Warm and soft is the coat.", false),
            "Soft and warm is the coat."
        );
    }

    #[test]
    fn test_proper_nouns_keep_capitals() {
        assert!(!should_lower("en", "Paris", Some("NNP")));
        assert!(!should_lower("en", "I", None));
        assert!(!should_lower("en", "NASA", Some("NN")));
        assert!(should_lower("en", "Warm", Some("JJ")));
        assert!(should_lower("en", "However", None));
    }

    #[test]
    fn test_no_match_leaves_sentence() {
        let oracle = ScriptedOracle::new(LEXICON);
        let mut ctx = OracleContext::new(&oracle);
        let set = rules("012JJ/2and/012JJ 2/1/0");
        assert_eq!(set.rewrite_sentence(&mut ctx, "The coat is red.", false), "The coat is red.");
        assert_eq!(RuleSet::new("en").rewrite_sentence(&mut ctx, "Warm and soft.", false), "Warm and soft.");
    }

    #[test]
    fn test_protected_sentences_are_skipped() {
        let oracle = ScriptedOracle::new(LEXICON);
        let mut ctx = OracleContext::new(&oracle);
        let set = rules("012JJ/2and/012JJ 2/1/0");
        let paragraph = "The coat is warm and soft. ##The hat is warm and soft.##";
        assert_eq!(
            set.rewrite_paragraph(&mut ctx, paragraph, false),
            "The coat is soft and warm. ##The hat is warm and soft.##"
        );
    }

    #[test]
    fn test_word_list_mapping() {
        let oracle = ScriptedOracle::new(&[("it", "PRP"), ("is", "VBZ"), ("cold", "JJ")]);
        let mut ctx = OracleContext::new(&oracle);
        let set = rules("2it/101tense/011JJ 0/1/2/today\ntense;is;was\n");
        assert_eq!(
            set.rewrite_sentence(&mut ctx, "It is cold.", false),
            "It was cold today."
        );
    }

    #[test]
    fn test_spin_difference_keeps_shared_tokens() {
        let oracle = ScriptedOracle::new(LEXICON);
        let mut ctx = OracleContext::new(&oracle);
        assert_eq!(
            spin_difference(&mut ctx, "the big red dog", "the red big dog").unwrap(),
            "the {big red|red big} dog"
        );
    }
}
