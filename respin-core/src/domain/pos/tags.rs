//! Part-of-speech tag table and tag matching
//!
//! Each language ships a table mapping its tagger's tags to a numeric id
//! (the id stored in the thesaurus) and a group. Groups 10 and above are the
//! open word classes; groups below 10 are closed classes such as
//! determiners and conjunctions which only ever match loosely.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Numeric POS id as stored in thesaurus entries
pub type PosId = u16;

/// Numeric tag group
pub type GroupId = u16;

pub const UNKNOWN_TAG: &str = "UNK";
pub const UNKNOWN_ID: PosId = 0;
pub const PHRASE_TAG: &str = "PHS";
pub const PHRASE_ID: PosId = 1;
pub const MIXED_TAG: &str = "MIX";
pub const MIXED_ID: PosId = 2;

/// Well-known tag groups
pub mod groups {
    use super::GroupId;

    pub const UNKNOWN: GroupId = 0;
    pub const SYMBOL: GroupId = 1;
    pub const CONJUNCTION: GroupId = 2;
    pub const DETERMINER: GroupId = 3;
    pub const NOUN: GroupId = 10;
    pub const ADJECTIVE: GroupId = 11;
    pub const ADVERB: GroupId = 12;
    pub const VERB: GroupId = 13;
    pub const PRONOUN: GroupId = 14;

    /// First group taking part in full matches
    pub const OPEN_CLASS_START: GroupId = 10;
}

/// Precision of a match between two tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PosTagMatchType {
    #[default]
    None = 0,
    ExtremelyLoose = 1,
    Loose = 2,
    Full = 3,
}

impl PosTagMatchType {
    /// Legacy integer level: 4 and 3 Full, 2 Loose, 1 ExtremelyLoose, else None
    pub fn from_level(level: i32) -> Self {
        match level {
            4 | 3 => PosTagMatchType::Full,
            2 => PosTagMatchType::Loose,
            1 => PosTagMatchType::ExtremelyLoose,
            _ => PosTagMatchType::None,
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Serialized form of one tag table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRow {
    pub tag: String,
    pub id: PosId,
    pub group: GroupId,
    #[serde(default)]
    pub description: String,
}

/// One row of a tag table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub id: PosId,
    pub group: GroupId,
    pub description: String,
}

/// Tag to id/group conversion table for one language
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    by_tag: HashMap<String, TagInfo>,
    by_id: HashMap<PosId, String>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from its rows, rejecting duplicate tags and ids
    pub fn from_rows<I>(rows: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = TagRow>,
    {
        let mut table = Self::new();
        for row in rows {
            if table.by_tag.contains_key(&row.tag) {
                return Err(DomainError::ConfigurationError(format!(
                    "tag '{}' is listed twice",
                    row.tag
                )));
            }
            if let Some(existing) = table.by_id.get(&row.id) {
                return Err(DomainError::ConfigurationError(format!(
                    "tags '{existing}' and '{}' share id {}",
                    row.tag, row.id
                )));
            }
            table.insert(&row.tag, row.id, row.group, &row.description);
        }
        Ok(table)
    }

    pub fn insert(&mut self, tag: &str, id: PosId, group: GroupId, description: &str) {
        self.by_id.insert(id, tag.to_string());
        self.by_tag.insert(
            tag.to_string(),
            TagInfo {
                id,
                group,
                description: description.to_string(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// Group of a tag; unknown tags are group 0
    pub fn group(&self, tag: &str) -> GroupId {
        self.by_tag.get(tag).map_or(groups::UNKNOWN, |info| info.group)
    }

    pub fn id(&self, tag: &str) -> PosId {
        self.by_tag.get(tag).map_or(UNKNOWN_ID, |info| info.id)
    }

    pub fn tag(&self, id: PosId) -> &str {
        self.by_id.get(&id).map_or(UNKNOWN_TAG, String::as_str)
    }

    pub fn description(&self, tag: &str) -> &str {
        self.by_tag
            .get(tag)
            .map_or("???", |info| info.description.as_str())
    }

    pub fn is_in_group(&self, tag: &str, group: GroupId) -> bool {
        self.group(tag) == group
    }

    pub fn is_noun(&self, tag: &str) -> bool {
        self.is_in_group(tag, groups::NOUN)
    }

    pub fn is_adjective(&self, tag: &str) -> bool {
        self.is_in_group(tag, groups::ADJECTIVE)
    }

    pub fn is_adverb(&self, tag: &str) -> bool {
        self.is_in_group(tag, groups::ADVERB)
    }

    pub fn is_verb(&self, tag: &str) -> bool {
        self.is_in_group(tag, groups::VERB)
    }

    pub fn is_determiner(&self, tag: &str) -> bool {
        self.is_in_group(tag, groups::DETERMINER)
    }

    /// Whether two tags match at the requested precision
    ///
    /// Closed-class groups never match unless `ignore_loose_groups` is set or
    /// the request is extremely loose.
    pub fn tag_match(&self, a: &str, b: &str, kind: PosTagMatchType, ignore_loose_groups: bool) -> bool {
        if kind == PosTagMatchType::None || (a == PHRASE_TAG && a == b) {
            return true;
        }

        let group_a = self.group(a);
        let group_b = self.group(b);
        if !ignore_loose_groups
            && kind != PosTagMatchType::ExtremelyLoose
            && (group_a < groups::OPEN_CLASS_START || group_b < groups::OPEN_CLASS_START)
        {
            return false;
        }
        if a == b {
            return true;
        }
        if kind == PosTagMatchType::Full {
            return false;
        }
        group_a == group_b
    }

    pub fn tag_match_ids(&self, a: PosId, b: PosId, kind: PosTagMatchType, ignore_loose_groups: bool) -> bool {
        self.tag_match(self.tag(a), self.tag(b), kind, ignore_loose_groups)
    }

    /// Most precise match type between two tags
    pub fn match_type(&self, a: &str, b: &str) -> PosTagMatchType {
        [
            PosTagMatchType::Full,
            PosTagMatchType::Loose,
            PosTagMatchType::ExtremelyLoose,
        ]
        .into_iter()
        .find(|&kind| self.tag_match(a, b, kind, false))
        .unwrap_or(PosTagMatchType::None)
    }

    pub fn match_type_ids(&self, a: PosId, b: PosId) -> PosTagMatchType {
        self.match_type(self.tag(a), self.tag(b))
    }
}

/// Proper noun tag of the supported taggers
pub fn is_proper_noun(lang: &str, tag: &str) -> bool {
    let expected = match lang.to_ascii_lowercase().as_str() {
        "en" => "NNP",
        "es" => "NP",
        "de" => "NE",
        _ => return false,
    };
    tag.eq_ignore_ascii_case(expected)
}
