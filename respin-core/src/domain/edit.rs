//! Span edits applied to an immutable source in one pass
//!
//! Rewrites record `(source range, replacement)` pairs against the original
//! text instead of splicing a mutable buffer, so no offset bookkeeping is
//! needed while scanning. Overlapping edits are refused.

use std::ops::Range;

/// One replacement of a byte range of the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// Non-overlapping edits ordered by start offset
#[derive(Debug, Clone, Default)]
pub struct EditList {
    edits: Vec<Edit>,
}

impl EditList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    /// Whether `range` overlaps an edit already recorded
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        let index = self.edits.partition_point(|edit| edit.range.start < range.start);
        let before = index
            .checked_sub(1)
            .and_then(|i| self.edits.get(i))
            .is_some_and(|edit| edit.range.end > range.start);
        let after = self.edits.get(index).is_some_and(|edit| {
            edit.range.start < range.end || edit.range.start == range.start
        });
        before || after
    }

    /// Record an edit; returns `false` and records nothing on overlap
    pub fn push(&mut self, range: Range<usize>, replacement: impl Into<String>) -> bool {
        if range.start > range.end || self.overlaps(&range) {
            return false;
        }
        let index = self.edits.partition_point(|edit| edit.range.start < range.start);
        self.edits.insert(
            index,
            Edit {
                range,
                replacement: replacement.into(),
            },
        );
        true
    }

    /// Build the edited text
    ///
    /// Edits reaching past the end of `source` or splitting a character are
    /// skipped.
    pub fn apply(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for edit in &self.edits {
            let Range { start, end } = edit.range;
            if start < cursor
                || end > source.len()
                || !source.is_char_boundary(start)
                || !source.is_char_boundary(end)
            {
                log::debug!("skipping invalid edit {start}..{end}");
                continue;
            }
            out.push_str(&source[cursor..start]);
            out.push_str(&edit.replacement);
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_in_any_order() {
        let source = "the quick brown fox";
        let mut edits = EditList::new();
        assert!(edits.push(16..19, "dog"));
        assert!(edits.push(4..9, "{quick|fast}"));
        assert_eq!(edits.apply(source), "the {quick|fast} brown dog");
    }

    #[test]
    fn test_overlaps_are_refused() {
        let mut edits = EditList::new();
        assert!(edits.push(4..9, "x"));
        assert!(!edits.push(0..5, "y"));
        assert!(!edits.push(8..12, "y"));
        assert!(!edits.push(4..9, "y"));
        assert!(edits.push(9..10, "z"));
        assert!(edits.push(0..4, "w"));
        assert_eq!(edits.len(), 3);
    }

    #[test]
    fn test_invalid_edit_is_skipped() {
        let mut edits = EditList::new();
        edits.push(0..1, "X");
        edits.push(50..60, "nope");
        assert_eq!(edits.apply("abc"), "Xbc");
    }
}
