//! Model-free oracle for languages without a POS model
//!
//! Used only when no tags are needed: each paragraph is one sentence,
//! tokens are words and punctuation marks, and every tag is unknown.

use crate::domain::error::DomainError;
use crate::domain::pos::{groups, PosOracle, TagTable, UNKNOWN_ID, UNKNOWN_TAG};
use regex::Regex;
use std::sync::OnceLock;

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|\S").expect("valid regex"))
}

#[derive(Debug)]
pub(crate) struct PlainOracle {
    language: String,
    table: TagTable,
}

impl PlainOracle {
    pub(crate) fn new(language: &str) -> Self {
        let mut table = TagTable::new();
        table.insert(UNKNOWN_TAG, UNKNOWN_ID, groups::UNKNOWN, "unknown");
        Self {
            language: language.to_lowercase(),
            table,
        }
    }
}

impl PosOracle for PlainOracle {
    fn language(&self) -> &str {
        &self.language
    }

    fn sentences(&self, paragraph: &str) -> Result<Vec<String>, DomainError> {
        let paragraph = paragraph.trim();
        Ok(if paragraph.is_empty() {
            Vec::new()
        } else {
            vec![paragraph.to_string()]
        })
    }

    fn tokens(&self, sentence: &str) -> Result<Vec<String>, DomainError> {
        Ok(word_regex()
            .find_iter(sentence)
            .map(|m| m.as_str().to_string())
            .collect())
    }

    fn tags(&self, tokens: &[String]) -> Result<Vec<String>, DomainError> {
        Ok(vec![UNKNOWN_TAG.to_string(); tokens.len()])
    }

    fn tag_table(&self) -> &TagTable {
        &self.table
    }
}
