//! Protected regions of a paragraph
//!
//! Offsets inside a protected region must never start or end a
//! substitution. Regions come from user protected terms, `##...##` markers
//! and, when existing spintax is to be left alone, from `{...}` groups.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

fn spin_group_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^}]*\}").expect("valid regex"))
}

fn adjacent_spin_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\}[^}]*\}").expect("valid regex"))
}

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"##.+?##").expect("valid regex"))
}

/// Sorted, merged byte ranges that must not be altered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedRegions {
    ranges: Vec<Range<usize>>,
}

impl ProtectedRegions {
    /// Collect the protected regions of `text`
    pub fn compute<S: AsRef<str>>(text: &str, terms: &[S], protect_existing_spin: bool) -> Self {
        let mut ranges = Vec::new();
        if text.is_empty() {
            return Self { ranges };
        }

        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }
            match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term))) {
                Ok(re) => ranges.extend(re.find_iter(text).map(|m| m.range())),
                Err(e) => log::debug!("protected term '{term}' skipped: {e}"),
            }
        }

        if protect_existing_spin {
            ranges.extend(spin_group_regex().find_iter(text).map(|m| m.range()));
            ranges.extend(adjacent_spin_regex().find_iter(text).map(|m| m.range()));
        }

        ranges.extend(marker_regex().find_iter(text).map(|m| m.range()));

        Self::from_ranges(ranges)
    }

    /// Build from arbitrary ranges, sorting and merging them
    pub fn from_ranges(mut ranges: Vec<Range<usize>>) -> Self {
        ranges.retain(|r| r.start < r.end);
        ranges.sort_by_key(|r| r.start);

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
                _ => merged.push(range),
            }
        }
        Self { ranges: merged }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Whether the byte offset lies inside a protected region
    pub fn contains(&self, index: usize) -> bool {
        let i = self.ranges.partition_point(|r| r.end <= index);
        self.ranges.get(i).is_some_and(|r| r.start <= index)
    }

    /// Whether any offset of `range` is protected
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        let i = self.ranges.partition_point(|r| r.end <= range.start);
        self.ranges.get(i).is_some_and(|r| r.start < range.end)
    }

    /// Every protected offset in ascending order
    pub fn indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().flat_map(|r| r.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_terms_whole_word() {
        let text = "Rust is fast. Rusty nails are not.";
        let regions = ProtectedRegions::compute(text, &["rust"], false);
        assert_eq!(regions.ranges(), &[0..4]);
        assert!(regions.contains(3));
        assert!(!regions.contains(14));
    }

    #[test]
    fn test_markers_and_existing_spin() {
        let text = "keep ##this one## and {a|b} here";
        let regions = ProtectedRegions::compute::<&str>(text, &[], false);
        assert_eq!(regions.ranges(), &[5..17]);

        let regions = ProtectedRegions::compute::<&str>(text, &[], true);
        assert!(regions.contains(text.find('{').unwrap()));
        assert!(regions.contains(text.find('}').unwrap()));
        assert!(!regions.contains(text.find("here").unwrap()));
    }

    #[test]
    fn test_short_markers_are_protected() {
        let regions = ProtectedRegions::compute::<&str>("Keep ##a## safe", &[], false);
        assert_eq!(regions.ranges(), &[5..10]);
        assert!(regions.contains(7));

        let regions = ProtectedRegions::compute::<&str>("I like ##C#-code## a lot", &[], false);
        assert_eq!(regions.ranges(), &[7..18]);
    }

    #[test]
    fn test_marker_boundaries() {
        let text = "See ##a##, then ##b## and more.";
        let regions = ProtectedRegions::compute::<&str>(text, &[], false);
        assert_eq!(regions.ranges(), &[4..9, 16..21]);
        assert!(!regions.contains(text.find("then").unwrap()));
        assert!(!regions.contains(text.find("and").unwrap()));

        // an empty pair protects nothing
        assert!(ProtectedRegions::compute::<&str>("a #### b", &[], false).is_empty());
    }

    #[test]
    fn test_terms_are_escaped() {
        let text = "abc cxd c.d";
        let regions = ProtectedRegions::compute(text, &["c.d"], false);
        assert_eq!(regions.ranges(), &[8..11]);
        let regions = ProtectedRegions::compute(text, &["c++["], false);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_merge_and_indexes() {
        let regions = ProtectedRegions::from_ranges(vec![5..8, 0..2, 1..3, 7..9]);
        assert_eq!(regions.ranges(), &[0..3, 5..9]);
        assert_eq!(regions.indexes().collect::<Vec<_>>(), vec![0, 1, 2, 5, 6, 7, 8]);
        assert!(regions.overlaps(&(2..4)));
        assert!(!regions.overlaps(&(3..5)));
    }
}
