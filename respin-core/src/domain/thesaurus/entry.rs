//! Synonym candidates and thesaurus entries

use super::quality::QualityRating;
use crate::domain::pos::{PosId, TagTable, UNKNOWN_ID};
use smallvec::SmallVec;

/// Quality of a candidate for one POS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SynonymInfo {
    pub quality: QualityRating,
    pub pos: PosId,
}

impl SynonymInfo {
    pub fn new(quality: QualityRating, pos: PosId) -> Self {
        Self { quality, pos }
    }
}

/// Every POS/quality pair known for one candidate text
///
/// Pairs are keyed by POS id and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateInfo {
    infos: SmallVec<[SynonymInfo; 2]>,
}

impl CandidateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(quality: QualityRating, pos: PosId) -> Self {
        let mut info = Self::new();
        info.add(quality, pos);
        info
    }

    /// Add a POS entry, OR-ing the quality into an existing one
    pub fn add(&mut self, quality: QualityRating, pos: PosId) {
        match self.infos.iter_mut().find(|info| info.pos == pos) {
            Some(existing) => existing.quality |= quality,
            None => self.infos.push(SynonymInfo::new(quality, pos)),
        }
    }

    /// Replace the quality stored for a POS
    pub fn update_weighting(&mut self, quality: QualityRating, pos: PosId) {
        match self.infos.iter_mut().find(|info| info.pos == pos) {
            Some(existing) => existing.quality = quality,
            None => self.infos.push(SynonymInfo::new(quality, pos)),
        }
    }

    pub fn combine(&mut self, other: &CandidateInfo) {
        for info in &other.infos {
            self.add(info.quality, info.pos);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SynonymInfo> {
        self.infos.iter()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Whether any entry carries a real POS
    pub fn known_pos(&self) -> bool {
        self.infos.iter().any(|info| info.pos != UNKNOWN_ID)
    }

    /// Highest ranked quality across all POS entries
    pub fn max_quality_ignore_pos(&self) -> QualityRating {
        self.infos
            .iter()
            .map(|info| info.quality)
            .max_by_key(|quality| quality.rank())
            .unwrap_or(QualityRating::NONE)
    }

    /// Best combined quality and POS-match score against a requested POS
    ///
    /// Quality rank is weighted above any match precision so a better rated
    /// candidate always outranks a better tagged one.
    pub fn overall_score(&self, tags: &TagTable, pos: PosId) -> u32 {
        self.infos
            .iter()
            .map(|info| {
                u32::from(info.quality.rank()) * 4 + u32::from(tags.match_type_ids(pos, info.pos).rank())
            })
            .max()
            .unwrap_or(0)
    }
}

/// All candidates of one headword, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThesaurusEntry {
    candidates: Vec<(String, CandidateInfo)>,
}

impl ThesaurusEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate, merging quality when the text is already present
    pub fn add_candidate(&mut self, text: impl Into<String>, info: CandidateInfo) {
        let text = text.into();
        match self.candidates.iter_mut().find(|(existing, _)| *existing == text) {
            Some((_, existing)) => existing.combine(&info),
            None => self.candidates.push((text, info)),
        }
    }

    /// Union the candidate sets of two entries for the same headword
    pub fn combine(&mut self, other: &ThesaurusEntry) {
        for (text, info) in &other.candidates {
            self.add_candidate(text.clone(), info.clone());
        }
    }

    pub fn get(&self, text: &str) -> Option<&CandidateInfo> {
        self.candidates
            .iter()
            .find(|(existing, _)| existing == text)
            .map(|(_, info)| info)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CandidateInfo)> {
        self.candidates.iter().map(|(text, info)| (text.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
