//! Document-level steps around the synonym pass: placeholder expansion,
//! paragraph splitting and reordering, and signatures.

use crate::domain::spintax::ORDERED_INDEX_RANGE;
use crate::progress::CancellationToken;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Expand `#name#` placeholders
///
/// In spin mode a placeholder with several values becomes an ordered group
/// `~{a|b}`. Otherwise every placeholder takes the value at one shared
/// random index, so related placeholders stay in step.
pub(crate) fn apply_replacement_tags<R: Rng + ?Sized>(
    text: &str,
    tags: &BTreeMap<String, Vec<String>>,
    return_spin: bool,
    rng: &mut R,
) -> String {
    if tags.is_empty() {
        return text.to_string();
    }

    let index = rng.random_range(0..ORDERED_INDEX_RANGE);
    let mut out = text.to_string();
    for (name, values) in tags {
        if name.is_empty() || values.is_empty() {
            continue;
        }
        let value = if !return_spin {
            values[index % values.len()].clone()
        } else if values.len() > 1 {
            format!("~{{{}}}", values.join("|"))
        } else {
            values[0].clone()
        };
        out = out.replace(&format!("#{name}#"), &value);
    }
    out
}

/// Drop carriage returns and put every closing `</p>` at a line end
pub(crate) fn normalize_breaks(text: &str) -> String {
    text.replace('\r', "")
        .replace("</p>\n", "</p>")
        .replace("</p>", "</p>\n")
}

/// Whether a line stays where it is when paragraphs are shuffled
fn is_locked(line: &str, index: usize, locked: &BTreeSet<usize>) -> bool {
    if locked.contains(&index) {
        return true;
    }
    let lower = line.trim().to_lowercase();
    lower.starts_with("<h") || lower.starts_with("&lt;h")
}

fn brace_balance(line: &str) -> isize {
    line.chars().fold(0, |balance, c| match c {
        '{' => balance + 1,
        '}' => balance - 1,
        _ => balance,
    })
}

/// Shuffle the paragraphs of `text`
///
/// Locked lines and headings keep their position, together with a blank
/// line right after them. Between locked lines, paragraphs move as chunks:
/// a line stays with the next one when it is linked, when the next line is
/// blank, or while a spintax group is still open. Returns `None` when
/// cancelled.
pub(crate) fn reorder_paragraphs<R: Rng + ?Sized>(
    text: &str,
    locked: &BTreeSet<usize>,
    linked: &BTreeSet<usize>,
    cancel: Option<&CancellationToken>,
    rng: &mut R,
) -> Option<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut chunks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut open = 0isize;

    let mut index = 0;
    while index < lines.len() {
        if cancel.is_some_and(|c| c.is_cancelled()) {
            return None;
        }
        let line = lines[index];

        if is_locked(line, index, locked) {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                open = 0;
            }
            flush(&mut chunks, &mut out, rng);
            out.push(line);
            if lines.get(index + 1).is_some_and(|next| next.trim().is_empty()) {
                out.push(lines[index + 1]);
                index += 1;
            }
            index += 1;
            continue;
        }

        current.push(line);
        open += brace_balance(line);
        let next_blank = lines.get(index + 1).is_some_and(|next| next.trim().is_empty());
        if !(linked.contains(&index) || next_blank || open > 0) {
            chunks.push(std::mem::take(&mut current));
            open = 0;
        }
        index += 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    flush(&mut chunks, &mut out, rng);
    Some(out.join("\n"))
}

fn flush<'t, R: Rng + ?Sized>(chunks: &mut Vec<Vec<&'t str>>, out: &mut Vec<&'t str>, rng: &mut R) {
    chunks.shuffle(rng);
    out.extend(chunks.drain(..).flatten());
}

/// Append the signature block on its own line
///
/// Spin mode lists every signature as a group; otherwise one is picked.
pub(crate) fn append_signatures<R: Rng + ?Sized>(
    mut text: String,
    signatures: &[String],
    return_spin: bool,
    rng: &mut R,
) -> String {
    if signatures.is_empty() {
        return text;
    }
    if !text.ends_with('\n') {
        text.push('\n');
    }
    if !return_spin {
        text.push_str(&signatures[rng.random_range(0..signatures.len())]);
    } else if signatures.len() > 1 {
        text.push_str(&format!("{{{}}}", signatures.join("|")));
    } else {
        text.push_str(&signatures[0]);
    }
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rng::new_rng;

    fn tags(entries: &[(&str, &str)]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(name, values)| (name.to_string(), values.split('|').map(str::to_string).collect()))
            .collect()
    }

    #[test]
    fn test_replacement_tags_share_one_index() {
        let tags = tags(&[("city", "Paris|Rome"), ("country", "France|Italy")]);
        let mut rng = new_rng(Some(7));
        let out = apply_replacement_tags("#city# is in #country#.", &tags, false, &mut rng);
        assert!(out == "Paris is in France." || out == "Rome is in Italy.", "{out}");
    }

    #[test]
    fn test_replacement_tags_in_spin_mode() {
        let tags = tags(&[("city", "Paris|Rome"), ("name", "Ann")]);
        let mut rng = new_rng(Some(7));
        let out = apply_replacement_tags("#name# likes #city#. #unknown#", &tags, true, &mut rng);
        assert_eq!(out, "Ann likes ~{Paris|Rome}. #unknown#");
    }

    #[test]
    fn test_normalize_breaks() {
        assert_eq!(
            normalize_breaks("<p>a</p>\r\n<p>b</p><p>c</p>"),
            "<p>a</p>\n<p>b</p>\n<p>c</p>\n"
        );
    }

    #[test]
    fn test_reorder_keeps_every_paragraph() {
        let text = "one\n\ntwo\n\nthree\n\nfour";
        let mut rng = new_rng(Some(3));
        let out = reorder_paragraphs(text, &BTreeSet::new(), &BTreeSet::new(), None, &mut rng).unwrap();
        let mut words: Vec<&str> = out.split('\n').filter(|l| !l.is_empty()).collect();
        words.sort();
        assert_eq!(words, vec!["four", "one", "three", "two"]);
        assert_eq!(out.len(), text.len());
    }

    #[test]
    fn test_reorder_keeps_headings_and_locked_lines() {
        let text = "<h1>Title</h1>\n\na\n\nb\n\nc\nEnd";
        let locked: BTreeSet<usize> = [7].into_iter().collect();
        for seed in 0..20 {
            let mut rng = new_rng(Some(seed));
            let out = reorder_paragraphs(text, &locked, &BTreeSet::new(), None, &mut rng).unwrap();
            assert!(out.starts_with("<h1>Title</h1>\n\n"), "{out}");
            assert!(out.ends_with("\nEnd"), "{out}");
        }
    }

    #[test]
    fn test_linked_lines_and_open_groups_move_together() {
        let text = "a\nb\n{c\nd}\ne";
        let linked: BTreeSet<usize> = [0].into_iter().collect();
        for seed in 0..20 {
            let mut rng = new_rng(Some(seed));
            let out = reorder_paragraphs(text, &BTreeSet::new(), &linked, None, &mut rng).unwrap();
            assert!(out.contains("a\nb"), "{out}");
            assert!(out.contains("{c\nd}"), "{out}");
        }
    }

    #[test]
    fn test_reorder_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let mut rng = new_rng(Some(1));
        assert!(reorder_paragraphs("a\nb", &BTreeSet::new(), &BTreeSet::new(), Some(&token), &mut rng).is_none());
    }

    #[test]
    fn test_signatures() {
        let signatures = vec!["Bye".to_string(), "Cheers".to_string()];
        let mut rng = new_rng(Some(1));
        assert_eq!(
            append_signatures("Text".to_string(), &signatures, true, &mut rng),
            "Text\n{Bye|Cheers}\n"
        );
        let out = append_signatures("Text\n".to_string(), &signatures, false, &mut rng);
        assert!(out == "Text\nBye\n" || out == "Text\nCheers\n");
        assert_eq!(append_signatures("Text".to_string(), &[], false, &mut rng), "Text");
    }
}
