//! Per-language synonym lookup

use super::case::{generate_case_string, CaseCode};
use super::entry::{CandidateInfo, ThesaurusEntry};
use crate::domain::pos::{PosId, TagTable, UNKNOWN_ID};
use std::collections::HashMap;
use std::sync::Arc;

/// A candidate returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synonym {
    pub text: String,
    pub info: CandidateInfo,
}

/// Thesaurus of a single language, keyed by lowercased headword
#[derive(Debug, Clone, Default)]
pub struct Thesaurus {
    language: String,
    entries: HashMap<String, ThesaurusEntry>,
}

impl Thesaurus {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            entries: HashMap::new(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry, combining with an existing entry for the same headword
    pub fn insert_entry(&mut self, word: &str, entry: ThesaurusEntry) {
        if entry.is_empty() {
            return;
        }
        let key = word.trim().to_lowercase();
        match self.entries.get_mut(&key) {
            Some(existing) => existing.combine(&entry),
            None => {
                self.entries.insert(key, entry);
            }
        }
    }

    /// Add a single candidate to a headword
    pub fn add(&mut self, word: &str, text: &str, info: CandidateInfo) {
        let mut entry = ThesaurusEntry::new();
        entry.add_candidate(text, info);
        self.insert_entry(word, entry);
    }

    /// Merge every entry of `other` into this thesaurus
    pub fn merge(&mut self, other: &Thesaurus) {
        for (word, entry) in &other.entries {
            self.insert_entry(word, entry.clone());
        }
    }

    pub fn entry(&self, word: &str) -> Option<&ThesaurusEntry> {
        self.entries.get(&word.to_lowercase())
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Candidates of `word`, unique without regard to case
    ///
    /// When two candidates differ only in case the one scoring higher against
    /// `pos` is kept; on equal scores the first inserted one stays.
    pub fn synonyms(&self, word: &str, pos: PosId, tags: &TagTable) -> Vec<Synonym> {
        let Some(entry) = self.entry(word) else {
            return Vec::new();
        };

        let mut results: Vec<Synonym> = Vec::with_capacity(entry.len());
        for (text, info) in entry.iter() {
            let duplicate = results
                .iter()
                .position(|existing| existing.text.to_lowercase() == text.to_lowercase());
            match duplicate {
                Some(index) => {
                    if results[index].info.overall_score(tags, pos) < info.overall_score(tags, pos) {
                        results[index] = Synonym {
                            text: text.to_string(),
                            info: info.clone(),
                        };
                    }
                }
                None => results.push(Synonym {
                    text: text.to_string(),
                    info: info.clone(),
                }),
            }
        }
        results
    }

    /// Candidates of `word` restyled to `case`; `None` when there are none
    ///
    /// Candidates that collide after restyling are merged.
    pub fn synonym_details(&self, word: &str, case: CaseCode, tags: &TagTable) -> Option<Vec<Synonym>> {
        let mut results: Vec<Synonym> = Vec::new();
        for synonym in self.synonyms(word, UNKNOWN_ID, tags) {
            let text = generate_case_string(&synonym.text, case);
            match results.iter_mut().find(|existing| existing.text == text) {
                Some(existing) => existing.info.combine(&synonym.info),
                None => results.push(Synonym {
                    text,
                    info: synonym.info,
                }),
            }
        }
        (!results.is_empty()).then_some(results)
    }
}

/// Thesauri of every loaded language
///
/// Immutable once built; cloning shares the per-language data.
#[derive(Debug, Clone, Default)]
pub struct ThesaurusStore {
    languages: HashMap<String, Arc<Thesaurus>>,
}

impl ThesaurusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a thesaurus, replacing any previous one for its language
    pub fn insert(&mut self, thesaurus: Thesaurus) {
        self.languages
            .insert(thesaurus.language().to_string(), Arc::new(thesaurus));
    }

    /// Register an already shared thesaurus
    pub fn insert_shared(&mut self, thesaurus: Arc<Thesaurus>) {
        self.languages
            .insert(thesaurus.language().to_string(), thesaurus);
    }

    pub fn get(&self, lang: &str) -> Option<&Arc<Thesaurus>> {
        self.languages.get(&lang.to_lowercase())
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.languages.contains_key(&lang.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Loaded language codes, sorted
    pub fn languages(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.languages.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Candidates of `word` in `lang`; empty for an unloaded language
    pub fn synonyms(&self, lang: &str, word: &str, pos: PosId, tags: &TagTable) -> Vec<Synonym> {
        self.get(lang)
            .map(|thesaurus| thesaurus.synonyms(word, pos, tags))
            .unwrap_or_default()
    }

    pub fn synonym_details(
        &self,
        lang: &str,
        word: &str,
        case: CaseCode,
        tags: &TagTable,
    ) -> Option<Vec<Synonym>> {
        self.get(lang)
            .and_then(|thesaurus| thesaurus.synonym_details(word, case, tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::thesaurus::QualityRating;

    fn tags() -> TagTable {
        let mut table = TagTable::new();
        table.insert("NN", 10, 10, "noun");
        table.insert("JJ", 20, 11, "adjective");
        table
    }

    fn thesaurus() -> Thesaurus {
        let mut thesaurus = Thesaurus::new("EN");
        thesaurus.add("Quick", "fast", CandidateInfo::with(QualityRating::BEST, 20));
        thesaurus.add("quick", "rapid", CandidateInfo::with(QualityRating::GOOD, 20));
        thesaurus.add("quick", "Speedy", CandidateInfo::with(QualityRating::ALL, 20));
        thesaurus.add("quick", "speedy", CandidateInfo::with(QualityRating::BETTER, 20));
        thesaurus
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let thesaurus = thesaurus();
        assert_eq!(thesaurus.language(), "en");
        let synonyms = thesaurus.synonyms("QUICK", 20, &tags());
        let texts: Vec<&str> = synonyms.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["fast", "rapid", "speedy"]);
        assert!(thesaurus.synonyms("slow", 20, &tags()).is_empty());
    }

    #[test]
    fn test_case_duplicates_keep_first_on_tie() {
        let mut thesaurus = Thesaurus::new("en");
        thesaurus.add("us", "America", CandidateInfo::with(QualityRating::GOOD, 10));
        thesaurus.add("us", "AMERICA", CandidateInfo::with(QualityRating::GOOD, 10));
        let synonyms = thesaurus.synonyms("us", 10, &tags());
        assert_eq!(synonyms.len(), 1);
        assert_eq!(synonyms[0].text, "America");
    }

    #[test]
    fn test_synonym_details_restyle_and_merge() {
        let mut thesaurus = Thesaurus::new("en");
        thesaurus.add("big", "Large", CandidateInfo::with(QualityRating::GOOD, 10));
        thesaurus.add("big", "huge", CandidateInfo::with(QualityRating::BEST, 20));
        let details = thesaurus
            .synonym_details("big", CaseCode::AllFirstCap, &tags())
            .unwrap();
        let texts: Vec<&str> = details.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Large", "Huge"]);
        assert!(thesaurus.synonym_details("tiny", CaseCode::None, &tags()).is_none());
    }

    #[test]
    fn test_store_has_no_language_fallback() {
        let mut store = ThesaurusStore::new();
        store.insert(thesaurus());
        assert!(store.contains("en"));
        assert_eq!(store.languages(), vec!["en".to_string()]);
        assert_eq!(store.synonyms("en", "quick", 20, &tags()).len(), 3);
        assert!(store.synonyms("de", "quick", 20, &tags()).is_empty());
    }
}
