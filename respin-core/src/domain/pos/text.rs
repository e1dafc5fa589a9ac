//! Token location and tagging-only text cleanup

use regex::Regex;
use std::sync::OnceLock;

fn html_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

fn spin_tail_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\|[^}]*\}").expect("valid regex"))
}

/// Remove markup so a sentence can be tagged
///
/// HTML tags go first, then every non-first spintax alternative, then the
/// remaining `{`, `|`, `}` and `~` characters. The result is only ever fed
/// to the oracle; output text keeps its markup.
pub fn strip_html(text: &str) -> String {
    let without_tags = html_tag_regex().replace_all(text, "");
    let without_alternatives = spin_tail_regex().replace_all(&without_tags, "");
    without_alternatives
        .chars()
        .filter(|c| !matches!(c, '{' | '|' | '}' | '~'))
        .collect()
}

/// Byte offset of each token within `sentence`, shifted by `offset`
///
/// Tokens are searched in order from the end of the previous token, so
/// offsets never decrease. A token that cannot be found yields `None`.
pub fn get_locations<S: AsRef<str>>(sentence: &str, tokens: &[S], offset: usize) -> Vec<Option<usize>> {
    let mut locations = Vec::with_capacity(tokens.len());
    let mut index = 0;
    for token in tokens {
        let token = token.as_ref();
        let found = sentence
            .get(index..)
            .and_then(|rest| rest.find(token))
            .map(|pos| pos + index);
        locations.push(found.map(|pos| pos + offset));
        if let Some(pos) = found {
            index = pos;
        }
        index = ceil_char_boundary(sentence, index + token.len());
    }
    locations
}

/// Unicode punctuation, excluding symbols such as `$`, `+` or `|`
pub fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation() && !matches!(c, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~');
    }
    matches!(c,
        '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}'
        | '\u{2010}'..='\u{2027}'
        | '\u{2030}'..='\u{205E}'
        | '\u{3001}'..='\u{3003}'
        | '\u{3008}'..='\u{3011}')
}

/// Whether the first character of `text` is punctuation
pub fn starts_with_punctuation(text: &str) -> bool {
    text.chars().next().is_some_and(is_punctuation)
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
