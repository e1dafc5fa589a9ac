//! Casing of replacement text
//!
//! The case code of a source term is derived from the term and the sentence
//! around it, so a capitalised word inside a title keeps title casing while a
//! sentence-initial word only keeps its first capital.

use serde::{Deserialize, Serialize};

/// How a replacement should be cased to match its source term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseCode {
    /// Leave the replacement alone
    #[default]
    None,
    AllLower,
    FirstCap,
    AllFirstCap,
    AllCaps,
}

/// Derive the case code for `word` as it appears in `sentence`
pub fn determine_case_code(lang: &str, word: &str, sentence: &str) -> CaseCode {
    if word.is_empty() || sentence.is_empty() {
        return CaseCode::None;
    }
    let english = lang.eq_ignore_ascii_case("en");

    if word.to_lowercase() == word {
        return if english { CaseCode::AllLower } else { CaseCode::None };
    }
    let char_count = word.chars().count();
    if word.to_uppercase() == word && char_count > 1 {
        // three letters or fewer is most likely an acronym
        return if char_count <= 3 {
            CaseCode::None
        } else {
            CaseCode::AllCaps
        };
    }

    if word.starts_with(char::is_uppercase) {
        if is_title_case(sentence) {
            return CaseCode::AllFirstCap;
        }
        if sentence.starts_with(word) {
            return CaseCode::FirstCap;
        }

        // titles often leave short words such as "a" or "is" in lower case
        let words = sentence.split(' ').filter(|w| !w.is_empty()).count();
        if words >= 4 {
            let capitalised = capitalised_word_count(sentence);
            if words.saturating_sub(capitalised) <= 2 {
                return CaseCode::AllFirstCap;
            }
        }
        return if word == "I" {
            CaseCode::AllLower
        } else {
            CaseCode::None
        };
    }

    if english {
        CaseCode::AllLower
    } else {
        CaseCode::None
    }
}

/// Whether every word is title cased; all-caps words count as title cased
fn is_title_case(sentence: &str) -> bool {
    sentence.split_whitespace().all(|word| {
        if word.to_uppercase() == word {
            return true;
        }
        let mut letters = word.chars().skip_while(|c| !c.is_alphabetic());
        match letters.next() {
            Some(first) if first.is_lowercase() => false,
            Some(_) => letters.all(|c| !c.is_uppercase()),
            None => true,
        }
    })
}

fn capitalised_word_count(sentence: &str) -> usize {
    let mut count = 0;
    let mut previous: Option<char> = None;
    for c in sentence.chars() {
        let at_start = previous.map_or(true, char::is_whitespace);
        if at_start && c.is_alphanumeric() && c.is_uppercase() {
            count += 1;
        }
        previous = Some(c);
    }
    count
}

/// Restyle `phrase` according to `code`
pub fn generate_case_string(phrase: &str, code: CaseCode) -> String {
    match code {
        CaseCode::None => return phrase.to_string(),
        CaseCode::AllCaps => return phrase.to_uppercase(),
        // an all-caps phrase in a title is most likely an acronym
        CaseCode::AllFirstCap if phrase.to_uppercase() == phrase => return phrase.to_string(),
        _ => {}
    }

    let capital_first = matches!(code, CaseCode::FirstCap | CaseCode::AllFirstCap);
    let capital_words = code == CaseCode::AllFirstCap;

    let mut out = String::with_capacity(phrase.len());
    let mut first = true;
    let mut new_word = true;
    for c in phrase.chars() {
        if c.is_alphanumeric() {
            let upper = if first {
                capital_first
            } else {
                new_word && capital_words
            };
            if upper {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            first = false;
            new_word = false;
        } else {
            out.push(c);
        }
        if c.is_whitespace() {
            new_word = true;
        }
    }

    fix_pronoun(out)
}

/// The English pronoun "i" is always capitalised
fn fix_pronoun(mut text: String) -> String {
    text = text.replace(" i ", " I ");
    if text.starts_with("i ") {
        text.replace_range(..1, "I");
    }
    if text.ends_with(" i") {
        let end = text.len();
        text.replace_range(end - 1.., "I");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_case_string() {
        assert_eq!(generate_case_string("hello world", CaseCode::AllFirstCap), "Hello World");
        assert_eq!(generate_case_string("HELLO", CaseCode::AllCaps), "HELLO");
        assert_eq!(generate_case_string("it is", CaseCode::None), "it is");
        assert_eq!(generate_case_string("big Dog", CaseCode::FirstCap), "Big dog");
        assert_eq!(generate_case_string("Quick", CaseCode::AllLower), "quick");
        assert_eq!(generate_case_string("NASA", CaseCode::AllFirstCap), "NASA");
    }

    #[test]
    fn test_pronoun_stays_capital() {
        assert_eq!(generate_case_string("then i left", CaseCode::AllLower), "then I left");
        assert_eq!(generate_case_string("i think", CaseCode::AllLower), "I think");
        assert_eq!(generate_case_string("as did i", CaseCode::AllLower), "as did I");
    }

    #[test]
    fn test_determine_case_code() {
        let sentence = "The quick fox jumps over the dog.";
        assert_eq!(determine_case_code("en", "quick", sentence), CaseCode::AllLower);
        assert_eq!(determine_case_code("de", "quick", sentence), CaseCode::None);
        assert_eq!(determine_case_code("en", "The", sentence), CaseCode::FirstCap);
        assert_eq!(determine_case_code("en", "FBI", "the FBI is here"), CaseCode::None);
        assert_eq!(determine_case_code("en", "HUGE", "a HUGE win"), CaseCode::AllCaps);
        assert_eq!(determine_case_code("en", "", sentence), CaseCode::None);
    }

    #[test]
    fn test_title_sentences() {
        assert_eq!(
            determine_case_code("en", "Quick", "The Quick Brown Fox"),
            CaseCode::AllFirstCap
        );
        assert_eq!(
            determine_case_code("en", "Quick", "Why The Quick Fox is Brown"),
            CaseCode::AllFirstCap
        );
        assert_eq!(
            determine_case_code("en", "Paris", "we went to Paris last year"),
            CaseCode::None
        );
    }
}
