//! Lookup tables built from a language configuration

use crate::domain::pos::TagTable;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Case-insensitive abbreviation lookup
#[derive(Debug, Clone, Default)]
pub struct AbbreviationSet {
    words: HashSet<String>,
}

impl AbbreviationSet {
    pub fn from_categories(categories: &HashMap<String, Vec<String>>) -> Self {
        let words = categories
            .values()
            .flatten()
            .map(|abbr| abbr.trim_end_matches('.').to_lowercase())
            .filter(|abbr| !abbr.is_empty())
            .collect();
        Self { words }
    }

    /// Whether `word`, with or without its final period, is an abbreviation
    pub fn contains(&self, word: &str) -> bool {
        self.words
            .contains(&word.trim_end_matches('.').to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// Candidate tags per lowercased word, ordered by tag id
#[derive(Debug, Clone, Default)]
pub struct LexiconTable {
    words: HashMap<String, SmallVec<[String; 2]>>,
}

impl LexiconTable {
    pub fn from_tags(by_tag: &HashMap<String, Vec<String>>, table: &TagTable) -> Self {
        let mut words: HashMap<String, SmallVec<[String; 2]>> = HashMap::new();
        for (tag, list) in by_tag {
            for word in list {
                let candidates = words.entry(word.to_lowercase()).or_default();
                if !candidates.contains(tag) {
                    candidates.push(tag.clone());
                }
            }
        }
        for candidates in words.values_mut() {
            candidates.sort_by_key(|tag| (table.id(tag), tag.clone()));
        }
        Self { words }
    }

    pub fn candidates(&self, word: &str) -> &[String] {
        self.words
            .get(&word.to_lowercase())
            .map(|tags| tags.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}
