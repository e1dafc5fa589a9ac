//! Instant-unique homoglyph substitution
//!
//! Latin letters are swapped for visually identical Greek or Cyrillic
//! letters (and, in the full set, accented Latin letters) so the text
//! fingerprints differently while reading the same.

use super::protect::ProtectedRegions;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Which homoglyph set to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InstantUniqueType {
    #[default]
    None,
    /// Best set plus accented Latin letters
    Full,
    /// Lookalike letters only
    Best,
}

impl InstantUniqueType {
    /// Legacy integer level: 2 Best, 1 Full, anything else None
    pub fn from_level(level: i32) -> Self {
        match level {
            2 => InstantUniqueType::Best,
            1 => InstantUniqueType::Full,
            _ => InstantUniqueType::None,
        }
    }

    pub fn char_set(self) -> Option<&'static CharSet> {
        match self {
            InstantUniqueType::None => None,
            InstantUniqueType::Best => Some(best_set()),
            InstantUniqueType::Full => Some(full_set()),
        }
    }
}

const LOOKALIKES: &[(char, &[char])] = &[
    ('A', &['\u{0391}', '\u{0410}']),
    ('B', &['\u{0392}', '\u{0412}']),
    ('C', &['\u{0421}']),
    ('E', &['\u{0395}', '\u{0415}']),
    ('H', &['\u{0397}', '\u{041D}']),
    ('I', &['\u{0406}']),
    ('J', &['\u{0408}']),
    ('K', &['\u{039A}']),
    ('M', &['\u{039C}', '\u{041C}']),
    ('N', &['\u{039D}']),
    ('O', &['\u{039F}', '\u{041E}']),
    ('P', &['\u{0420}']),
    ('S', &['\u{0405}']),
    ('T', &['\u{03A4}', '\u{0422}']),
    ('X', &['\u{0425}']),
    ('Y', &['\u{03A5}']),
    ('a', &['\u{0430}']),
    ('c', &['\u{0441}']),
    ('e', &['\u{0435}']),
    ('i', &['\u{0456}']),
    ('j', &['\u{0458}']),
    ('o', &['\u{03BF}', '\u{043E}']),
    ('p', &['\u{0440}']),
    ('s', &['\u{0455}']),
    ('u', &['\u{03C5}']),
    ('v', &['\u{03BD}']),
    ('y', &['\u{0443}']),
];

const ACCENTED: &[(char, &[char])] = &[
    ('A', &['\u{00C0}', '\u{00C1}']),
    ('C', &['\u{0106}']),
    ('E', &['\u{00C8}', '\u{00C9}']),
    ('I', &['\u{00CC}', '\u{00CD}']),
    ('O', &['\u{00D2}', '\u{00D3}']),
    ('U', &['\u{00D9}', '\u{00DA}']),
    ('Y', &['\u{00DD}']),
    ('a', &['\u{00E0}', '\u{00E1}']),
    ('c', &['\u{0107}']),
    ('e', &['\u{00E9}']),
    ('i', &['\u{00ED}']),
    ('o', &['\u{00F2}', '\u{00F3}']),
    ('u', &['\u{00F9}']),
];

/// Replacement options per source character
#[derive(Debug, Clone, Default)]
pub struct CharSet {
    map: HashMap<char, Vec<char>>,
}

impl CharSet {
    fn from_tables(tables: &[&[(char, &[char])]]) -> Self {
        let mut map: HashMap<char, Vec<char>> = HashMap::new();
        for table in tables {
            for (source, options) in table.iter() {
                map.entry(*source).or_default().extend_from_slice(options);
            }
        }
        Self { map }
    }

    pub fn get(&self, ch: char) -> Option<&[char]> {
        self.map.get(&ch).map(Vec::as_slice)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.map.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn best_set() -> &'static CharSet {
    static SET: OnceLock<CharSet> = OnceLock::new();
    SET.get_or_init(|| CharSet::from_tables(&[LOOKALIKES]))
}

fn full_set() -> &'static CharSet {
    static SET: OnceLock<CharSet> = OnceLock::new();
    SET.get_or_init(|| CharSet::from_tables(&[LOOKALIKES, ACCENTED]))
}

/// Substitute characters of `text` with homoglyphs
///
/// Each candidate character is replaced with probability `1/frequency`.
/// Offsets inside `protected` are left untouched. In spin mode the
/// character becomes a group of itself and every option instead.
pub fn apply_unique<R: Rng + ?Sized>(
    text: &str,
    set: &CharSet,
    frequency: u32,
    return_spin: bool,
    protected: Option<&ProtectedRegions>,
    rng: &mut R,
) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, ch) in text.char_indices() {
        let options = match set.get(ch) {
            Some(options) if !options.is_empty() => options,
            _ => {
                out.push(ch);
                continue;
            }
        };
        if protected.is_some_and(|regions| regions.contains(index))
            || (frequency > 1 && rng.random_range(0..frequency) != 0)
        {
            out.push(ch);
            continue;
        }

        if return_spin {
            out.push('{');
            out.push(ch);
            for option in options {
                out.push('|');
                out.push(*option);
            }
            out.push('}');
        } else {
            out.push(options[rng.random_range(0..options.len())]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sets() {
        let best = InstantUniqueType::Best.char_set().unwrap();
        let full = InstantUniqueType::Full.char_set().unwrap();
        assert_eq!(best.get('A').unwrap().len(), 2);
        assert_eq!(full.get('A').unwrap().len(), 4);
        assert!(full.contains('U'));
        assert!(!best.contains('U'));
        assert!(InstantUniqueType::None.char_set().is_none());
        assert_eq!(InstantUniqueType::from_level(2), InstantUniqueType::Best);
    }

    #[test]
    fn test_every_candidate_replaced_at_frequency_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let set = InstantUniqueType::Best.char_set().unwrap();
        let out = apply_unique("ace", set, 1, false, None, &mut rng);
        assert_eq!(out, "\u{0430}\u{0441}\u{0435}");
        assert_eq!(apply_unique("zzz", set, 1, false, None, &mut rng), "zzz");
    }

    #[test]
    fn test_spin_mode_lists_options() {
        let mut rng = StdRng::seed_from_u64(3);
        let set = InstantUniqueType::Best.char_set().unwrap();
        assert_eq!(apply_unique("a", set, 1, true, None, &mut rng), "{a|\u{0430}}");
    }

    #[test]
    fn test_protected_offsets_untouched() {
        let mut rng = StdRng::seed_from_u64(9);
        let text = "a ##ace## e";
        let regions = ProtectedRegions::compute::<&str>(text, &[], false);
        let set = InstantUniqueType::Full.char_set().unwrap();
        let out = apply_unique(text, set, 1, false, Some(&regions), &mut rng);
        assert!(out.contains("##ace##"));
        assert!(!out.starts_with('a'));
        assert!(!out.ends_with('e'));
    }
}
