//! Lexicon-driven POS oracle
//!
//! A dictionary tagger with suffix fallbacks. It is no match for a trained
//! model but gives the rewrite engine sentences, tokens and tags that are
//! consistent with each other, which is all the engine relies on.

use crate::domain::error::DomainError;
use crate::domain::pos::{PosOracle, TagTable, TokenSpan};
use crate::language::config::{LanguageConfig, SuffixRule};
use crate::language::tables::{AbbreviationSet, LexiconTable};
use regex::Regex;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:\p{L}\.){2,}|\p{N}+(?:[.,:]\p{N}+)+|[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|\S",
        )
        .expect("valid regex")
    })
}

/// Tags after which an ambiguous word is read as part of a noun phrase
const NOUN_CONTEXT: &[&str] = &["DT", "PDT", "PRP$", "JJ", "JJR", "JJS", "CD", "POS"];
/// Tags after which an ambiguous word is read as a base verb
const VERB_CONTEXT: &[&str] = &["TO", "MD"];
/// Tags after which an ambiguous word is read as a finite verb
const SUBJECT_CONTEXT: &[&str] = &["PRP", "NNS", "NNP", "WP", "EX"];

/// Reference [`PosOracle`] built from a [`LanguageConfig`]
#[derive(Debug, Clone)]
pub struct LexiconOracle {
    code: String,
    name: String,
    terminators: Vec<char>,
    closers: Vec<char>,
    clause_separators: Vec<String>,
    abbreviations: AbbreviationSet,
    lexicon: LexiconTable,
    suffixes: Vec<SuffixRule>,
    tags: TagTable,
}

impl LexiconOracle {
    /// Create from configuration
    pub fn from_config(config: &LanguageConfig) -> Result<Self, String> {
        config.validate()?;
        let tags = TagTable::from_rows(config.tags.iter().cloned()).map_err(|e| e.to_string())?;
        let lexicon = LexiconTable::from_tags(&config.lexicon.tags, &tags);

        Ok(Self {
            code: config.metadata.code.clone(),
            name: config.metadata.name.clone(),
            terminators: config.sentences.terminators.clone(),
            closers: config.sentences.closers.clone(),
            clause_separators: config.sentences.clause_separators.clone(),
            abbreviations: AbbreviationSet::from_categories(&config.abbreviations.categories),
            lexicon,
            suffixes: config.suffixes.clone(),
            tags,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the text before a period ends in an abbreviation or an initial
    fn ends_with_abbreviation(&self, text: &str) -> bool {
        let word = text
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .trim_start_matches(|c: char| !c.is_alphanumeric());
        let mut chars = word.chars();
        let initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase());
        initial || (!word.is_empty() && self.abbreviations.contains(word))
    }

    fn tag_token(&self, token: &str, previous: Option<&str>) -> String {
        if !token.chars().any(char::is_alphanumeric) {
            return self.punctuation_tag(token).to_string();
        }
        if token.starts_with(|c: char| c.is_numeric())
            && token.chars().all(|c| c.is_numeric() || matches!(c, '.' | ',' | ':'))
        {
            return "CD".to_string();
        }

        // contractions and possessives are tagged by their stem
        let stem = token
            .split(['\'', '’'])
            .next()
            .filter(|stem| !stem.is_empty())
            .unwrap_or(token);

        let candidates = self.lexicon.candidates(stem);
        if let Some(tag) = choose(candidates, previous) {
            return tag.to_string();
        }

        let sentence_start = previous.map_or(true, |tag| matches!(tag, "." | "``" | ":"));
        if !sentence_start && stem.starts_with(char::is_uppercase) {
            return "NNP".to_string();
        }

        let lower = stem.to_lowercase();
        let length = lower.chars().count();
        self.suffixes
            .iter()
            .find(|rule| length >= rule.min_length && lower.ends_with(&rule.ending))
            .map_or_else(|| "NN".to_string(), |rule| rule.tag.clone())
    }

    fn punctuation_tag(&self, token: &str) -> &'static str {
        match token {
            "," => ",",
            ":" | ";" | "-" | "--" | "–" | "—" | "…" => ":",
            "\"" | "“" | "«" | "`" => "``",
            "”" | "»" | "'" | "’" => "''",
            "(" | "[" | "{" => "-LRB-",
            ")" | "]" | "}" => "-RRB-",
            "$" | "€" | "£" | "¥" => "$",
            _ if token.chars().all(|c| self.terminators.contains(&c)) => ".",
            _ => "SYM",
        }
    }
}

/// Pick a tag among a word's candidates using the previous tag
fn choose<'a>(candidates: &'a [String], previous: Option<&str>) -> Option<&'a str> {
    let first = candidates.first()?;
    let prefer = |prefixes: &[&str]| {
        candidates
            .iter()
            .find(|tag| prefixes.iter().any(|prefix| tag.starts_with(prefix)))
    };
    let preferred = match previous {
        Some(tag) if NOUN_CONTEXT.contains(&tag) => prefer(&["NN", "JJ"]),
        Some(tag) if VERB_CONTEXT.contains(&tag) => candidates.iter().find(|tag| *tag == "VB"),
        Some(tag) if SUBJECT_CONTEXT.contains(&tag) => prefer(&["VBP", "VBZ", "VBD", "MD"]),
        _ => None,
    };
    Some(preferred.unwrap_or(first).as_str())
}

impl PosOracle for LexiconOracle {
    fn language(&self) -> &str {
        &self.code
    }

    fn sentences(&self, paragraph: &str) -> Result<Vec<String>, DomainError> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = paragraph.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if !self.terminators.contains(&c) {
                continue;
            }
            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if !self.terminators.contains(&next) && !self.closers.contains(&next) {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }

            let at_boundary = paragraph[end..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace);
            if !at_boundary || (c == '.' && self.ends_with_abbreviation(&paragraph[start..i])) {
                continue;
            }

            let sentence = paragraph[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }

        let rest = paragraph[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        Ok(sentences)
    }

    fn tokens(&self, sentence: &str) -> Result<Vec<String>, DomainError> {
        let found: Vec<_> = token_regex().find_iter(sentence).collect();
        let mut tokens: Vec<String> = Vec::with_capacity(found.len());
        let mut previous_end = None;

        for (i, m) in found.iter().enumerate() {
            let attached = previous_end == Some(m.start());
            previous_end = Some(m.end());
            // "Mr." stays one token unless the period ends the sentence
            if m.as_str() == "." && attached && i + 1 < found.len() {
                if let Some(last) = tokens.last_mut() {
                    if self.abbreviations.contains(last) {
                        last.push('.');
                        continue;
                    }
                }
            }
            tokens.push(m.as_str().to_string());
        }

        if let Some(last) = tokens.last_mut() {
            if last.len() > 1 && last.ends_with('.') {
                last.pop();
                tokens.push(".".to_string());
            }
        }
        Ok(tokens)
    }

    fn tags(&self, tokens: &[String]) -> Result<Vec<String>, DomainError> {
        let mut tags: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let tag = self.tag_token(token, tags.last().map(String::as_str));
            tags.push(tag);
        }
        Ok(tags)
    }

    fn sentence_parts(&self, sentence: &str) -> Option<Vec<TokenSpan>> {
        let tokens = self.tokens(sentence).ok()?;
        if tokens.is_empty() {
            return None;
        }

        let mut parts = Vec::new();
        let mut start = 0;
        for (i, token) in tokens.iter().enumerate() {
            if i + 1 < tokens.len() && self.clause_separators.iter().any(|s| s == token) {
                parts.push(TokenSpan::new(start, i));
                start = i + 1;
            }
        }
        parts.push(TokenSpan::new(start, tokens.len() - 1));
        Some(parts)
    }

    fn tag_table(&self) -> &TagTable {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::loader::embedded;

    fn oracle() -> std::sync::Arc<LexiconOracle> {
        embedded("en").unwrap().oracle.clone()
    }

    #[test]
    fn test_sentences_respect_abbreviations() {
        let sentences = oracle()
            .sentences("Mr. Smith went home. He slept!  Did he? Yes (really.) Done")
            .unwrap();
        assert_eq!(
            sentences,
            vec![
                "Mr. Smith went home.",
                "He slept!",
                "Did he?",
                "Yes (really.)",
                "Done"
            ]
        );
    }

    #[test]
    fn test_initials_and_decimals_do_not_split() {
        let sentences = oracle()
            .sentences("J. R. Smith paid 3.50 dollars. It was cheap.")
            .unwrap();
        assert_eq!(sentences, vec!["J. R. Smith paid 3.50 dollars.", "It was cheap."]);
    }

    #[test]
    fn test_tokens() {
        let oracle = oracle();
        assert_eq!(
            oracle.tokens("Mr. Smith doesn't like well-known U.S. brands, 3.5 times.").unwrap(),
            vec![
                "Mr.", "Smith", "doesn't", "like", "well-known", "U.S.", "brands", ",", "3.5",
                "times", "."
            ]
        );
        assert_eq!(oracle.tokens("He lives in the U.S.").unwrap().last().unwrap(), ".");
    }

    #[test]
    fn test_tags() {
        let oracle = oracle();
        let tokens: Vec<String> = ["The", "quick", "fox", "quickly", "jumped", "over", "Paris", "."]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(
            oracle.tags(&tokens).unwrap(),
            vec!["DT", "JJ", "NN", "RB", "VBD", "IN", "NNP", "."]
        );
    }

    #[test]
    fn test_context_picks_between_candidates() {
        let oracle = oracle();
        let tag = |words: &[&str]| {
            let tokens: Vec<String> = words.iter().map(|t| t.to_string()).collect();
            oracle.tags(&tokens).unwrap().pop().unwrap()
        };
        assert_eq!(tag(&["the", "work"]), "NN");
        assert_eq!(tag(&["to", "work"]), "VB");
        assert_eq!(tag(&["i", "have"]), "VBP");
        assert_eq!(tag(&["like"]), "IN");
    }

    #[test]
    fn test_sentence_parts_split_after_separators() {
        let parts = oracle().sentence_parts("Today, it rained; we stayed.").unwrap();
        assert_eq!(
            parts,
            vec![TokenSpan::new(0, 1), TokenSpan::new(2, 4), TokenSpan::new(5, 7)]
        );
    }
}
