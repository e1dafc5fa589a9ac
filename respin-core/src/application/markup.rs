//! Tag protection markers and word counting

use crate::domain::pos::is_punctuation;

/// An opening and closing marker whose enclosed text must not change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub open: String,
    pub close: String,
}

/// Parse `open|close,open|close`; malformed pairs are skipped
pub fn parse_tag_pairs(list: &str) -> Vec<TagPair> {
    list.split(',')
        .filter_map(|pair| {
            let parts: Vec<&str> = pair.split('|').filter(|part| !part.is_empty()).collect();
            match parts.as_slice() {
                [open, close] => Some(TagPair {
                    open: open.to_string(),
                    close: close.to_string(),
                }),
                _ => {
                    log::debug!("ignoring protected tag pair {pair:?}");
                    None
                }
            }
        })
        .collect()
}

/// Put `##` before every opening and after every closing marker
pub fn protect_tags(text: &str, pairs: &[TagPair]) -> String {
    pairs.iter().fold(text.to_string(), |text, pair| {
        text.replace(&pair.open, &format!("##{}", pair.open))
            .replace(&pair.close, &format!("{}##", pair.close))
    })
}

/// Remove the markers added by [`protect_tags`]
pub fn restore_tags(text: &str, pairs: &[TagPair]) -> String {
    pairs.iter().fold(text.to_string(), |text, pair| {
        text.replace(&format!("##{}", pair.open), &pair.open)
            .replace(&format!("{}##", pair.close), &pair.close)
    })
}

/// Words as counted for usage accounting
///
/// Every letter, digit or punctuation mark right after whitespace starts a
/// word, and any text longer than two characters counts one more for the
/// word it starts with.
pub fn word_count(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() && chars.peek().is_some_and(|&next| next.is_alphanumeric() || is_punctuation(next)) {
            count += 1;
        }
    }
    if text.chars().count() > 2 {
        count += 1;
    }
    count
}
