//! Matching rule patterns against tagged tokens
//!
//! Commands match left to right. Each command that matches hands the token
//! after its own match to the next command, so a rule matches at a start
//! index only when the whole chain does. A [`RuleRun`] records the tokens
//! taken by the first and by the last command; word runs make both spans
//! variable, and runs that differ only inside those spans are collapsed.

use super::command::{Command, PosFilter};
use super::rule::{Rule, WordList, EXCEPTION_LISTS};
use crate::domain::pos::is_punctuation;
use std::collections::HashMap;
use std::ops::Range;

/// One application of a rule to a token window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRun {
    /// Index of the rule within its rule set
    pub rule: usize,
    /// Tokens taken by the first command
    pub first: Range<usize>,
    /// Tokens taken by the last command
    pub last: Range<usize>,
}

impl RuleRun {
    /// Token range covered by the whole match
    pub fn span(&self) -> Range<usize> {
        self.first.start..self.last.end.max(self.first.start)
    }

    pub(crate) fn offset(&mut self, by: usize) {
        self.first = self.first.start + by..self.first.end + by;
        self.last = self.last.start + by..self.last.end + by;
    }
}

#[derive(Debug, Default)]
pub(crate) struct Bounds {
    pub first: Option<Range<usize>>,
    pub last: Option<Range<usize>>,
}

/// Matching state for one rule over one token sequence
pub(crate) struct Matcher<'a> {
    rule: &'a Rule,
    tokens: &'a [String],
    tags: &'a [String],
    words: &'a HashMap<String, WordList>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(
        rule: &'a Rule,
        tokens: &'a [String],
        tags: &'a [String],
        words: &'a HashMap<String, WordList>,
    ) -> Self {
        Self {
            rule,
            tokens,
            tags,
            words,
        }
    }

    /// Match command `index` and every later command from token `start`
    pub(crate) fn match_at(&self, index: usize, start: usize, bounds: Option<&mut Bounds>) -> bool {
        let Some(command) = self.rule.commands.get(index) else {
            return false;
        };
        match command {
            Command::Anchor => self.match_anchor(index, start, bounds),
            Command::Word { text, negated } => {
                let Some(token) = self.tokens.get(start) else {
                    return false;
                };
                let equal = token.to_lowercase() == text.to_lowercase();
                equal != *negated && self.remaining(index, start..start + 1, bounds)
            }
            Command::List {
                name,
                source,
                result,
                negated,
            } => {
                let Some(token) = self.tokens.get(start) else {
                    return false;
                };
                let Some(list) = self.words.get(name) else {
                    return false;
                };
                if list.groups.len() <= (*source).max(*result) {
                    return false;
                }
                let found = list.position(*source, token).is_some();
                found != *negated && self.remaining(index, start..start + 1, bounds)
            }
            Command::WordRun { min, max, filters } => {
                self.match_word_run(index, start, *min, *max, filters, bounds)
            }
        }
    }

    fn match_anchor(&self, index: usize, start: usize, bounds: Option<&mut Bounds>) -> bool {
        let len = self.tokens.len();
        let at_start = index == 0 && start == 0;
        let at_end = index > 0
            && (start == len
                || (start + 1 == len
                    && self
                        .tags
                        .last()
                        .and_then(|tag| tag.chars().next())
                        .is_some_and(is_punctuation)));
        (at_start || at_end) && self.remaining(index, start..start, bounds)
    }

    fn match_word_run(
        &self,
        index: usize,
        start: usize,
        min: usize,
        max: usize,
        filters: &[PosFilter],
        bounds: Option<&mut Bounds>,
    ) -> bool {
        let len = self.tokens.len();
        let is_last = index + 1 >= self.rule.commands.len();
        if start >= len {
            return min == 0 && filters.is_empty() && is_last;
        }

        // contractions split by the tokenizer never start a run
        let first = &self.tokens[start];
        if first.starts_with('\'') || first.to_lowercase() == "n't" {
            return false;
        }

        let mut matches = 0;
        for position in start..len {
            // stop once the rest of the rule can take over from here
            if matches >= min && !is_last && self.match_at(index + 1, position, None) {
                break;
            }

            if self.accepts(filters, position) {
                matches += 1;
            } else {
                if matches < min {
                    return false;
                }
                break;
            }

            if max > 0 && matches >= max {
                break;
            }
            if matches >= min && position + 1 == len {
                break;
            }
        }

        matches >= min && self.remaining(index, start..start + matches, bounds)
    }

    /// Whether the token at `position` satisfies the POS filters
    fn accepts(&self, filters: &[PosFilter], position: usize) -> bool {
        if filters.is_empty() {
            return true;
        }
        let tag = &self.tags[position];
        let token = &self.tokens[position];

        let mut accepted = false;
        for (i, filter) in filters.iter().enumerate() {
            if filter.negated {
                if filter.matches(tag) {
                    break;
                }
                if i + 1 < filters.len() {
                    continue;
                }
            } else if !filter.matches(tag) {
                continue;
            }

            accepted = !self.is_exception(filter, token);
            if accepted {
                break;
            }
        }
        accepted
    }

    fn is_exception(&self, filter: &PosFilter, token: &str) -> bool {
        EXCEPTION_LISTS
            .iter()
            .filter(|(prefix, _)| filter.tag.starts_with(prefix))
            .filter_map(|(_, name)| self.words.get(*name))
            .any(|list| list.position(0, token).is_some())
    }

    /// Record this command's span and match the commands after it
    fn remaining(&self, index: usize, span: Range<usize>, mut bounds: Option<&mut Bounds>) -> bool {
        if let Some(bounds) = bounds.as_deref_mut() {
            bounds.first.get_or_insert_with(|| span.clone());
        }

        if index + 1 < self.rule.commands.len() {
            if !self.match_at(index + 1, span.end, bounds.as_deref_mut()) {
                return false;
            }
        } else if let Some(bounds) = bounds.as_deref_mut() {
            bounds.last = Some(span.clone());
        }

        if let Some(bounds) = bounds {
            bounds.last.get_or_insert(span);
        }
        true
    }
}

/// Every distinct match of rule `rule_index` over the tokens
///
/// Start positions run over all tokens but the last. A match is kept only
/// when its first span ends or its last span starts somewhere other than
/// the previously kept match.
pub fn find_matches(
    rule_index: usize,
    rule: &Rule,
    tokens: &[String],
    tags: &[String],
    words: &HashMap<String, WordList>,
) -> Vec<RuleRun> {
    let matcher = Matcher::new(rule, tokens, tags, words);
    let mut runs: Vec<RuleRun> = Vec::new();

    for start in 0..tags.len().saturating_sub(1) {
        let mut bounds = Bounds::default();
        if !matcher.match_at(0, start, Some(&mut bounds)) {
            continue;
        }
        let (Some(first), Some(last)) = (bounds.first, bounds.last) else {
            continue;
        };
        let run = RuleRun {
            rule: rule_index,
            first,
            last,
        };
        let distinct = runs
            .last()
            .map_or(true, |prev| prev.first.end != run.first.end || prev.last.start != run.last.start);
        if distinct {
            runs.push(run);
        }
    }
    runs
}
