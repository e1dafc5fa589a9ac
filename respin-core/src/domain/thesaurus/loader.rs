//! Thesaurus source formats
//!
//! Two text formats are accepted. The TOML format mirrors the entry model:
//!
//! ```toml
//! language = "en"
//!
//! [[entry]]
//! word = "quick"
//!
//! [[entry.synonym]]
//! text = "fast"
//! pos = "JJ"
//! quality = "best+favorite"
//! ```
//!
//! The compact line format carries one headword and POS per line:
//! `word|pos|quality|synonym;synonym`. Blank lines and lines starting with
//! `#` are ignored.

use super::entry::{CandidateInfo, ThesaurusEntry};
use super::quality::QualityRating;
use super::store::Thesaurus;
use crate::domain::error::DomainError;
use crate::domain::pos::{PosId, TagTable, UNKNOWN_ID};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ThesaurusFile {
    language: String,
    #[serde(default, rename = "entry")]
    entries: Vec<EntryRecord>,
}

#[derive(Debug, Deserialize)]
struct EntryRecord {
    word: String,
    #[serde(default, rename = "synonym")]
    synonyms: Vec<SynonymRecord>,
}

#[derive(Debug, Deserialize)]
struct SynonymRecord {
    text: String,
    #[serde(default)]
    pos: Option<String>,
    #[serde(default)]
    pos_id: Option<PosId>,
    #[serde(default = "default_quality")]
    quality: String,
}

fn default_quality() -> String {
    "all".to_string()
}

fn resolve_pos(tags: &TagTable, tag: Option<&str>, id: Option<PosId>) -> PosId {
    id.or_else(|| tag.map(|tag| tags.id(tag))).unwrap_or(UNKNOWN_ID)
}

/// Parse a TOML thesaurus
pub fn from_toml(content: &str, tags: &TagTable) -> Result<Thesaurus, DomainError> {
    let file: ThesaurusFile = toml::from_str(content)
        .map_err(|e| DomainError::ConfigurationError(format!("Failed to parse thesaurus: {e}")))?;

    let mut thesaurus = Thesaurus::new(&file.language);
    for record in file.entries {
        let mut entry = ThesaurusEntry::new();
        for synonym in record.synonyms {
            let quality = QualityRating::from_names(&synonym.quality).ok_or_else(|| {
                DomainError::ConfigurationError(format!(
                    "unknown quality '{}' for synonym '{}' of '{}'",
                    synonym.quality, synonym.text, record.word
                ))
            })?;
            let pos = resolve_pos(tags, synonym.pos.as_deref(), synonym.pos_id);
            entry.add_candidate(synonym.text, CandidateInfo::with(quality, pos));
        }
        thesaurus.insert_entry(&record.word, entry);
    }
    Ok(thesaurus)
}

/// Parse the compact line format
///
/// Malformed lines are skipped and returned alongside the thesaurus so
/// callers can report them.
pub fn from_lines(language: &str, content: &str, tags: &TagTable) -> (Thesaurus, Vec<DomainError>) {
    let mut thesaurus = Thesaurus::new(language);
    let mut errors = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line, tags) {
            Ok((word, entry)) => thesaurus.insert_entry(&word, entry),
            Err(message) => {
                log::warn!("skipping thesaurus line {}: {}", index + 1, message);
                errors.push(DomainError::parse(index + 1, message));
            }
        }
    }
    (thesaurus, errors)
}

fn parse_line(line: &str, tags: &TagTable) -> Result<(String, ThesaurusEntry), String> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let [word, pos, quality, synonyms] = fields.as_slice() else {
        return Err(format!("expected 4 fields, found {}", fields.len()));
    };
    if word.is_empty() {
        return Err("empty headword".to_string());
    }
    let quality =
        QualityRating::from_names(quality).ok_or_else(|| format!("unknown quality '{quality}'"))?;
    let pos = match pos.parse::<PosId>() {
        Ok(id) => id,
        Err(_) if pos.is_empty() => UNKNOWN_ID,
        Err(_) => tags.id(pos),
    };

    let mut entry = ThesaurusEntry::new();
    for synonym in synonyms.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        entry.add_candidate(synonym, CandidateInfo::with(quality, pos));
    }
    if entry.is_empty() {
        return Err(format!("no synonyms for '{word}'"));
    }
    Ok((word.to_string(), entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> TagTable {
        let mut table = TagTable::new();
        table.insert("JJ", 20, 11, "adjective");
        table.insert("NN", 10, 10, "noun");
        table
    }

    #[test]
    fn test_toml_thesaurus() {
        let content = r#"
language = "en"

[[entry]]
word = "quick"

[[entry.synonym]]
text = "fast"
pos = "JJ"
quality = "best+favorite"

[[entry.synonym]]
text = "rapid"
pos_id = 20
"#;
        let thesaurus = from_toml(content, &tags()).unwrap();
        let entry = thesaurus.entry("quick").unwrap();
        let fast = entry.get("fast").unwrap().iter().next().copied().unwrap();
        assert_eq!(fast.pos, 20);
        assert!(fast.quality.contains(QualityRating::FAVORITE));
        assert_eq!(fast.quality.rank(), 5);
        let rapid = entry.get("rapid").unwrap().iter().next().copied().unwrap();
        assert_eq!(rapid.quality, QualityRating::ALL);
    }

    #[test]
    fn test_toml_bad_quality() {
        let content = "language = \"en\"\n[[entry]]\nword = \"a\"\n[[entry.synonym]]\ntext = \"b\"\nquality = \"great\"\n";
        assert!(from_toml(content, &tags()).is_err());
    }

    #[test]
    fn test_line_format_with_errors() {
        let content = "# comment\nquick|JJ|best|fast;rapid\nquick|NN|good|fast\nbroken line\nslow|JJ|awful|sluggish\n";
        let (thesaurus, errors) = from_lines("en", content, &tags());
        assert_eq!(thesaurus.len(), 1);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], DomainError::Parse { line: 4, .. }));

        let fast = thesaurus.entry("quick").unwrap().get("fast").unwrap();
        assert_eq!(fast.len(), 2);
    }
}
