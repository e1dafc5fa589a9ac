//! POS oracle interface
//!
//! Sentence detection, tokenization and tagging are supplied by an external
//! model per language. The engine only talks to it through [`PosOracle`] and
//! always through a per-call [`OracleContext`], which memoises the most
//! recent result of each operation for that call alone.

use super::tags::TagTable;
use crate::domain::error::DomainError;

/// Inclusive token index range of one clause of a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Language model consumed by the rewrite engine
pub trait PosOracle: Send + Sync {
    /// ISO 639-1 code of the modelled language
    fn language(&self) -> &str;

    /// Split a paragraph into sentences, preserving the original text of each
    fn sentences(&self, paragraph: &str) -> Result<Vec<String>, DomainError>;

    /// Split a sentence into tokens
    fn tokens(&self, sentence: &str) -> Result<Vec<String>, DomainError>;

    /// Tag each token; the result is parallel to `tokens`
    fn tags(&self, tokens: &[String]) -> Result<Vec<String>, DomainError>;

    /// Clause-level token spans; `None` when the model has no parser
    fn sentence_parts(&self, _sentence: &str) -> Option<Vec<TokenSpan>> {
        None
    }

    /// Tag conversion table of the model
    fn tag_table(&self) -> &TagTable;
}

/// Per-call view of an oracle with a one-entry memo per operation
pub struct OracleContext<'a> {
    oracle: &'a dyn PosOracle,
    last_paragraph: Option<(String, Vec<String>)>,
    last_sentence: Option<(String, Vec<String>)>,
    last_tokens: Option<(Vec<String>, Vec<String>)>,
}

impl<'a> OracleContext<'a> {
    pub fn new(oracle: &'a dyn PosOracle) -> Self {
        Self {
            oracle,
            last_paragraph: None,
            last_sentence: None,
            last_tokens: None,
        }
    }

    pub fn oracle(&self) -> &'a dyn PosOracle {
        self.oracle
    }

    pub fn language(&self) -> &'a str {
        self.oracle.language()
    }

    pub fn tag_table(&self) -> &'a TagTable {
        self.oracle.tag_table()
    }

    pub fn sentences(&mut self, paragraph: &str) -> Result<Vec<String>, DomainError> {
        if let Some((text, sentences)) = &self.last_paragraph {
            if text == paragraph {
                return Ok(sentences.clone());
            }
        }
        let sentences = self.oracle.sentences(paragraph)?;
        self.last_paragraph = Some((paragraph.to_string(), sentences.clone()));
        Ok(sentences)
    }

    /// Tokenize a sentence, splitting a final period fused to the last token
    pub fn tokens(&mut self, sentence: &str) -> Result<Vec<String>, DomainError> {
        if let Some((text, tokens)) = &self.last_sentence {
            if text == sentence {
                return Ok(tokens.clone());
            }
        }
        let mut tokens = self.oracle.tokens(sentence)?;
        if let Some(last) = tokens.last_mut() {
            if last.len() > 1 && last.ends_with('.') {
                last.pop();
                tokens.push(".".to_string());
            }
        }
        self.last_sentence = Some((sentence.to_string(), tokens.clone()));
        Ok(tokens)
    }

    pub fn tags(&mut self, tokens: &[String]) -> Result<Vec<String>, DomainError> {
        if let Some((cached, tags)) = &self.last_tokens {
            if cached.as_slice() == tokens {
                return Ok(tags.clone());
            }
        }
        let tags = self.oracle.tags(tokens)?;
        if tags.len() != tokens.len() {
            return Err(DomainError::Oracle(format!(
                "tagger returned {} tags for {} tokens",
                tags.len(),
                tokens.len()
            )));
        }
        self.last_tokens = Some((tokens.to_vec(), tags.clone()));
        Ok(tags)
    }

    /// Clause spans of a sentence, falling back to the whole sentence
    pub fn sentence_parts(&mut self, sentence: &str, token_count: usize) -> Vec<TokenSpan> {
        match self.oracle.sentence_parts(sentence) {
            Some(parts) if !parts.is_empty() => parts
                .into_iter()
                .filter(|part| !part.is_empty() && part.end < token_count)
                .collect(),
            _ if token_count > 0 => vec![TokenSpan::new(0, token_count - 1)],
            _ => Vec::new(),
        }
    }
}
