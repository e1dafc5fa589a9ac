//! Spintax syntax tree
//!
//! Parsing is done in two passes. The first pass pairs braces with a stack
//! exactly like a left-to-right scanner would, so an opening brace that is
//! never closed (and a closing brace with nothing open) stays literal text.
//! The second pass builds the tree from the paired positions, splitting each
//! group body on pipes that sit at the group's own nesting level.
//!
//! All syntax characters are ASCII, so byte offsets taken at them are always
//! valid `char` boundaries.

use std::collections::HashMap;
use std::ops::Range;

/// How a group is rendered when it is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `{a|b}` plain alternation
    Plain,
    /// `~{a|b}` always picks the ordered alternative
    Ordered,
    /// `!{sep:last:min:max|a|b}` renders a randomised list of the values
    Control,
}

impl GroupKind {
    /// Prefix character written before the opening brace
    pub fn prefix(&self) -> Option<char> {
        match self {
            GroupKind::Plain => None,
            GroupKind::Ordered => Some('~'),
            GroupKind::Control => Some('!'),
        }
    }
}

/// A matched `{...}` group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    /// Alternatives split on top-level pipes. A group without a pipe holds its
    /// whole body as the single entry.
    pub alternatives: Vec<Vec<Node>>,
    /// Byte span of each alternative in the source
    pub alternative_spans: Vec<Range<usize>>,
    /// Whether the body contained a top-level pipe
    pub has_pipe: bool,
    /// Byte span of the whole group in the source, prefix included
    pub span: Range<usize>,
    /// Nesting depth, 1 for a top-level group
    pub depth: usize,
}

impl Group {
    /// Source text of the group, prefix and braces included
    pub fn source_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    /// Number of selectable alternatives (zero when there is no pipe)
    pub fn choice_count(&self) -> usize {
        if self.has_pipe {
            self.alternatives.len()
        } else {
            0
        }
    }

    /// Whether any alternative contains a nested group
    pub fn has_nested(&self) -> bool {
        self.alternatives
            .iter()
            .flatten()
            .any(|node| matches!(node, Node::Group(_)))
    }
}

/// A piece of spintax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Group(Group),
}

/// Parsed spintax document
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub source: &'a str,
    pub nodes: Vec<Node>,
}

impl Document<'_> {
    /// Number of top-level groups
    pub fn group_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Group(_)))
            .count()
    }
}

/// Parse spintax into a tree
pub fn parse(source: &str) -> Document<'_> {
    let pairs = pair_braces(source);
    let parser = Parser {
        source,
        bytes: source.as_bytes(),
        pairs: &pairs,
    };
    Document {
        source,
        nodes: parser.nodes(0..source.len(), 1),
    }
}

/// Pair every closing brace with the most recent unmatched opening brace
fn pair_braces(source: &str) -> HashMap<usize, usize> {
    let mut stack = Vec::new();
    let mut pairs = HashMap::new();
    for (i, b) in source.bytes().enumerate() {
        match b {
            b'{' => stack.push(i),
            b'}' => {
                if let Some(open) = stack.pop() {
                    pairs.insert(open, i);
                }
            }
            _ => {}
        }
    }
    pairs
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pairs: &'a HashMap<usize, usize>,
}

impl Parser<'_> {
    fn nodes(&self, range: Range<usize>, depth: usize) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut text_start = range.start;
        let mut i = range.start;

        while i < range.end {
            if self.bytes[i] == b'{' {
                if let Some(&close) = self.pairs.get(&i) {
                    let (start, kind) = if i > text_start {
                        match self.bytes[i - 1] {
                            b'~' => (i - 1, GroupKind::Ordered),
                            b'!' => (i - 1, GroupKind::Control),
                            _ => (i, GroupKind::Plain),
                        }
                    } else {
                        (i, GroupKind::Plain)
                    };

                    if start > text_start {
                        nodes.push(Node::Text(self.source[text_start..start].to_string()));
                    }
                    nodes.push(Node::Group(self.group(start, i, close, kind, depth)));

                    i = close + 1;
                    text_start = i;
                    continue;
                }
            }
            i += 1;
        }

        if text_start < range.end {
            nodes.push(Node::Text(self.source[text_start..range.end].to_string()));
        }
        nodes
    }

    fn group(&self, start: usize, open: usize, close: usize, kind: GroupKind, depth: usize) -> Group {
        let mut spans = Vec::new();
        let mut has_pipe = false;
        let mut alt_start = open + 1;
        let mut i = open + 1;

        while i < close {
            match self.bytes[i] {
                b'{' => {
                    // braces inside a matched pair are always matched inside it
                    if let Some(&inner_close) = self.pairs.get(&i) {
                        i = inner_close + 1;
                        continue;
                    }
                }
                b'|' => {
                    spans.push(alt_start..i);
                    alt_start = i + 1;
                    has_pipe = true;
                }
                _ => {}
            }
            i += 1;
        }
        spans.push(alt_start..close);

        let alternatives = spans
            .iter()
            .map(|span| self.nodes(span.clone(), depth + 1))
            .collect();

        Group {
            kind,
            alternatives,
            alternative_spans: spans,
            has_pipe,
            span: start..close + 1,
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_group(doc: &Document<'_>, index: usize) -> Group {
        doc.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Group(group) => Some(group.clone()),
                Node::Text(_) => None,
            })
            .nth(index)
            .expect("group present")
    }

    #[test]
    fn test_parse_plain_group() {
        let doc = parse("The {quick|fast} fox");
        assert_eq!(doc.nodes.len(), 3);
        let group = top_group(&doc, 0);
        assert_eq!(group.kind, GroupKind::Plain);
        assert_eq!(group.choice_count(), 2);
        assert_eq!(group.source_text(doc.source), "{quick|fast}");
        assert_eq!(group.depth, 1);
    }

    #[test]
    fn test_parse_nested_groups() {
        let doc = parse("{a|{b|c}|d}");
        let group = top_group(&doc, 0);
        assert_eq!(group.choice_count(), 3);
        assert!(group.has_nested());
        match &group.alternatives[1][0] {
            Node::Group(inner) => {
                assert_eq!(inner.depth, 2);
                assert_eq!(inner.source_text(doc.source), "{b|c}");
            }
            Node::Text(_) => panic!("expected nested group"),
        }
    }

    #[test]
    fn test_parse_prefixes() {
        let doc = parse("x ~{a|b} !{,:and|c|d}");
        assert_eq!(top_group(&doc, 0).kind, GroupKind::Ordered);
        assert_eq!(top_group(&doc, 0).source_text(doc.source), "~{a|b}");
        assert_eq!(top_group(&doc, 1).kind, GroupKind::Control);
        assert_eq!(doc.nodes[0], Node::Text("x ".to_string()));
    }

    #[test]
    fn test_unbalanced_braces_stay_literal() {
        let doc = parse("{a|{b|c}");
        assert_eq!(doc.nodes[0], Node::Text("{a|".to_string()));
        assert_eq!(doc.group_count(), 1);

        let doc = parse("a} b");
        assert_eq!(doc.nodes, vec![Node::Text("a} b".to_string())]);
    }

    #[test]
    fn test_group_without_pipe() {
        let doc = parse("{abc}");
        let group = top_group(&doc, 0);
        assert!(!group.has_pipe);
        assert_eq!(group.choice_count(), 0);
        assert_eq!(group.alternatives.len(), 1);
    }
}
