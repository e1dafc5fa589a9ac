//! Spintax tidying
//!
//! Cleans generated spintax: a preceding "a"/"an" moves into the group so
//! each alternative gets its own article, alternatives repeating the
//! neighbouring word are removed, and a first or last word shared by every
//! alternative is hoisted out of the group.

use super::ast::{parse, Group, GroupKind, Node};

/// Tidy top-level spintax groups, returning the text and the number of
/// groups changed
pub fn spin_tidy(source: &str) -> (String, usize) {
    if source.is_empty() {
        return (String::new(), 0);
    }

    let document = parse(source);
    let mut out = String::with_capacity(source.len());
    let mut count = 0;

    for (i, node) in document.nodes.iter().enumerate() {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Group(group) => {
                let following = match document.nodes.get(i + 1) {
                    Some(Node::Text(text)) => text.as_str(),
                    _ => "",
                };
                if group.kind == GroupKind::Plain
                    && group.has_pipe
                    && tidy_group(source, group, following, &mut out)
                {
                    count += 1;
                    continue;
                }
                out.push_str(group.source_text(source));
            }
        }
    }
    (out, count)
}

/// Last word of `out` when separated from the group by whitespace
fn previous_word(out: &str) -> Option<(usize, &str)> {
    if !out.ends_with(char::is_whitespace) {
        return None;
    }
    let trimmed = out.trim_end();
    let start = trimmed
        .rfind(char::is_whitespace)
        .map(|i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let word = &trimmed[start..];
    (!word.is_empty()).then_some((start, word))
}

/// First word of the text following the group
fn next_word(following: &str) -> Option<&str> {
    if !following.starts_with(char::is_whitespace) {
        return None;
    }
    following
        .split_whitespace()
        .next()
        .filter(|word| !word.contains('{'))
}

fn is_article(word: &str) -> bool {
    word.eq_ignore_ascii_case("a") || word.eq_ignore_ascii_case("an")
}

fn starts_with_ci(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn ends_with_ci(text: &str, suffix: &str) -> bool {
    text.len() >= suffix.len()
        && text.is_char_boundary(text.len() - suffix.len())
        && text[text.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Prefix `text` with the indefinite article matching its first letter
pub(crate) fn with_article(text: &str, capital: bool) -> String {
    let vowel = text
        .chars()
        .next()
        .is_some_and(|c| "aeiou".contains(c.to_ascii_lowercase()));
    let article = match (vowel, capital) {
        (true, true) => "An ",
        (true, false) => "an ",
        (false, true) => "A ",
        (false, false) => "a ",
    };
    format!("{article}{text}")
}

fn tidy_group(source: &str, group: &Group, following: &str, out: &mut String) -> bool {
    let mut synonyms: Vec<String> = group
        .alternative_spans
        .iter()
        .map(|span| source[span.clone()].to_string())
        .collect();
    let mut modified = false;

    let mut before = previous_word(out).map(|(start, word)| (start, word.to_string()));
    let after = next_word(following).map(str::to_string);

    // absorb a preceding article
    if let Some((start, word)) = before.clone().filter(|(_, word)| is_article(word)) {
        let capital = word.starts_with(char::is_uppercase);
        let mut absorbed = false;
        for synonym in synonyms.iter_mut() {
            if synonym.is_empty() || starts_with_ci(synonym, "a ") || starts_with_ci(synonym, "an ") {
                continue;
            }
            *synonym = with_article(synonym, capital);
            absorbed = true;
        }
        if absorbed {
            out.truncate(start);
            modified = true;
        }
        before = None;
    }

    // drop alternatives repeating a neighbouring word
    let neighbours: Vec<&str> = before
        .as_ref()
        .map(|(_, word)| word.as_str())
        .into_iter()
        .chain(after.as_deref())
        .collect();
    if !neighbours.is_empty() {
        let kept: Vec<String> = synonyms
            .iter()
            .filter(|synonym| {
                synonym.contains('{')
                    || !synonym.split_whitespace().any(|word| {
                        neighbours
                            .iter()
                            .any(|neighbour| neighbour.eq_ignore_ascii_case(word))
                    })
            })
            .cloned()
            .collect();
        if !kept.is_empty() && kept.len() < synonyms.len() {
            synonyms = kept;
            modified = true;
        }
    }

    // hoist a shared first word
    let mut lead = None;
    if synonyms.len() > 1 {
        if let Some(space) = synonyms[0].find(' ').filter(|&i| i > 0) {
            let word = synonyms[0][..space].to_string();
            let prefix = format!("{word} ");
            if !is_article(&word) && synonyms.iter().all(|s| starts_with_ci(s, &prefix)) {
                for synonym in synonyms.iter_mut() {
                    *synonym = synonym[prefix.len()..].trim().to_string();
                }
                lead = Some(word);
                modified = true;
            }
        }
    }

    // hoist a shared last word
    let mut tail = None;
    if synonyms.len() > 1 {
        if let Some(space) = synonyms[0].rfind(' ').filter(|&i| i > 0) {
            let word = synonyms[0][space + 1..].to_string();
            let suffix = format!(" {word}");
            if !word.is_empty() && synonyms.iter().all(|s| ends_with_ci(s, &suffix)) {
                for synonym in synonyms.iter_mut() {
                    let end = synonym.len() - suffix.len();
                    *synonym = synonym[..end].trim().to_string();
                }
                tail = Some(word);
                modified = true;
            }
        }
    }

    if !modified {
        return false;
    }

    if let Some(word) = lead {
        out.push_str(&word);
        out.push(' ');
    }
    if synonyms.len() > 1 {
        out.push('{');
        out.push_str(&synonyms.join("|"));
        out.push('}');
    } else {
        out.push_str(&synonyms.join("|"));
    }
    if let Some(word) = tail {
        out.push(' ');
        out.push_str(&word);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_is_absorbed() {
        let (out, count) = spin_tidy("I saw a {cat|owl} today");
        assert_eq!(out, "I saw {a cat|an owl} today");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_capital_article_keeps_case() {
        let (out, _) = spin_tidy("A {dog|eagle} ran.");
        assert_eq!(out, "{A dog|An eagle} ran.");
    }

    #[test]
    fn test_shared_words_are_hoisted() {
        assert_eq!(spin_tidy("the {big dog|big cat}").0, "the big {dog|cat}");
        assert_eq!(spin_tidy("{red car|blue car} is").0, "{red|blue} car is");
    }

    #[test]
    fn test_neighbour_repeats_removed() {
        let (out, count) = spin_tidy("the cat {sat|cat sat|stood} down");
        assert_eq!(out, "the cat {sat|stood} down");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_untouched_spintax() {
        let text = "the {b|c} and {x|y}";
        let (out, count) = spin_tidy(text);
        assert_eq!(count, 0);
        assert_eq!(out, text);
        assert_eq!(spin_tidy(""), (String::new(), 0));
    }
}
