//! Rules and word lists of one language
//!
//! Rule sources are line based. Blank lines and lines starting with `#` are
//! skipped. A line starting with a digit is a rule:
//!
//! ```text
//! 012JJ/2and/012JJ 2/1/0
//! ```
//!
//! Commands are separated by `/`, followed by a single space and the
//! replace order: `/`-separated command indexes and literal words. Any other
//! line is a word list, `name;group0word/group0word;group1word/...`.

use super::command::Command;
use crate::domain::error::DomainError;
use std::collections::HashMap;
use std::fmt;

/// One element of a rule's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderItem {
    /// Text matched by the command at this index
    Command(usize),
    /// Literal connector text
    Literal(String),
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderItem::Command(index) => write!(f, "{index}"),
            OrderItem::Literal(text) => f.write_str(text),
        }
    }
}

/// A pattern of commands and the order its matches are re-emitted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub commands: Vec<Command>,
    pub order: Vec<OrderItem>,
}

impl Rule {
    pub fn parse(line: &str) -> Result<Self, DomainError> {
        let mut fields = line.split(' ').filter(|f| !f.is_empty());
        let (Some(pattern), Some(order)) = (fields.next(), fields.next()) else {
            return Err(DomainError::ConfigurationError(
                "rule needs a pattern and a replace order".to_string(),
            ));
        };

        let commands = pattern
            .split('/')
            .map(Command::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let mut items = Vec::new();
        for item in order.split('/').filter(|item| !item.is_empty()) {
            match item.parse::<usize>() {
                Ok(index) if index < commands.len() => items.push(OrderItem::Command(index)),
                Ok(index) => {
                    return Err(DomainError::ConfigurationError(format!(
                        "replace order refers to command {index} of {}",
                        commands.len()
                    )))
                }
                Err(_) => items.push(OrderItem::Literal(item.to_string())),
            }
        }
        if items.is_empty() {
            return Err(DomainError::ConfigurationError(
                "empty replace order".to_string(),
            ));
        }

        Ok(Self {
            commands,
            order: items,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{command}")?;
        }
        f.write_str(" ")?;
        for (i, item) in self.order.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Parallel word groups, e.g. the present and past forms of verbs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    pub groups: Vec<Vec<String>>,
}

impl WordList {
    /// Parse a `name;group;group` line into its name and list
    pub fn parse(line: &str) -> Result<(String, Self), DomainError> {
        let mut fields = line.split(';');
        let name = fields.next().unwrap_or_default().trim();
        if name.is_empty() || !line.contains(';') {
            return Err(DomainError::ConfigurationError(format!(
                "word list '{line}' needs a name and at least one group"
            )));
        }
        let groups = fields
            .map(|group| group.split('/').map(|w| w.trim().to_string()).collect())
            .collect();
        Ok((name.to_string(), Self { groups }))
    }

    pub fn group(&self, index: usize) -> Option<&[String]> {
        self.groups.get(index).map(Vec::as_slice)
    }

    /// Position of `word` in group `index`, ignoring case
    pub fn position(&self, index: usize, word: &str) -> Option<usize> {
        self.group(index)?
            .iter()
            .position(|candidate| candidate.to_lowercase() == word.to_lowercase())
    }
}

impl fmt::Display for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            write!(f, ";{}", group.join("/"))?;
        }
        Ok(())
    }
}

/// Word lists consulted by word runs to skip irregular words, keyed by the
/// POS filter prefix they apply to
pub(crate) const EXCEPTION_LISTS: &[(&str, &str)] = &[
    ("RB", "adverbexception"),
    ("VB", "verbexception"),
    ("NN", "nounexception"),
    ("JJ", "adjectiveexception"),
    ("IN", "prepositionexception"),
];

/// Rules and word lists of a language
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    language: String,
    pub(crate) rules: Vec<Rule>,
    pub(crate) words: HashMap<String, WordList>,
}

impl RuleSet {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            ..Self::default()
        }
    }

    /// Parse a rule source; malformed lines are skipped and returned
    pub fn parse(language: &str, content: &str) -> (Self, Vec<DomainError>) {
        let mut set = Self::new(language);
        let mut errors = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parsed = if line.starts_with(|c: char| c.is_ascii_digit()) {
                Rule::parse(line).map(|rule| set.rules.push(rule))
            } else {
                WordList::parse(line).map(|(name, list)| {
                    set.words.insert(name, list);
                })
            };
            if let Err(e) = parsed {
                log::warn!("skipping {} rule line {}: {}", set.language, index + 1, e);
                errors.push(DomainError::parse(index + 1, e.to_string()));
            }
        }
        (set, errors)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn word_list(&self, name: &str) -> Option<&WordList> {
        self.words.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn insert_word_list(&mut self, name: &str, list: WordList) {
        self.words.insert(name.to_string(), list);
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        let mut names: Vec<&String> = self.words.keys().collect();
        names.sort();
        for name in names {
            writeln!(f, "{name}{}", self.words[name])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
# swap adjectives around a conjunction
012JJ/2and/012JJ 2/1/0
3/101tense/000 0/1/2
tense;is/was;was/had been

bad rule
0x1 0
";

    #[test]
    fn test_parse_rule_set() {
        let (set, errors) = RuleSet::parse("EN", SOURCE);
        assert_eq!(set.language(), "en");
        assert_eq!(set.len(), 2);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], DomainError::Parse { line: 6, .. }));

        let rule = &set.rules()[0];
        assert_eq!(rule.commands.len(), 3);
        assert_eq!(
            rule.order,
            vec![OrderItem::Command(2), OrderItem::Command(1), OrderItem::Command(0)]
        );
        assert_eq!(rule.to_string(), "012JJ/2and/012JJ 2/1/0");

        let tense = set.word_list("tense").unwrap();
        assert_eq!(tense.position(1, "WAS"), Some(0));
        assert_eq!(tense.group(1).unwrap()[1], "had been");
    }

    #[test]
    fn test_literal_order_items() {
        let rule = Rule::parse("000NN/2because/000 1/,/so/0").unwrap();
        assert_eq!(rule.order[1], OrderItem::Literal(",".into()));
        assert!(Rule::parse("000NN 4").is_err());
        assert!(Rule::parse("000NN").is_err());
    }

    #[test]
    fn test_display_round_trips_word_lists() {
        let (set, _) = RuleSet::parse("en", "tense;is/are;was/were\n");
        assert_eq!(set.to_string(), "tense;is/are;was/were\n");
    }
}
