//! Rule commands
//!
//! A command is one step of a rule pattern. The text form starts with a
//! single-digit discriminant:
//!
//! | Form                 | Command                                   |
//! |----------------------|-------------------------------------------|
//! | `0{min}{max}{pos,..}`| word run of `min..=max` tokens (`max` 0 = unbounded) |
//! | `1{src}{res}{name}`  | token in group `src` of word list `name`  |
//! | `2{text}`            | literal token                             |
//! | `3`                  | start or end of the sentence              |
//!
//! List names, literals and POS filters take a leading `!` to negate them.
//! POS filters may end in `*` to match a tag prefix, and `COMMA` stands for
//! the `,` tag.

use crate::domain::error::DomainError;
use std::fmt;

/// One POS condition of a word run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosFilter {
    pub tag: String,
    pub negated: bool,
    pub prefix: bool,
}

impl PosFilter {
    fn parse(text: &str) -> Self {
        let (negated, rest) = match text.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (prefix, tag) = match rest.strip_suffix('*') {
            Some(tag) => (true, tag),
            None => (false, rest),
        };
        let tag = if tag.eq_ignore_ascii_case("COMMA") {
            ",".to_string()
        } else {
            tag.to_string()
        };
        Self { tag, negated, prefix }
    }

    /// Whether `tag` matches the filter, ignoring negation
    pub fn matches(&self, tag: &str) -> bool {
        if self.prefix {
            tag.len() >= self.tag.len()
                && tag.is_char_boundary(self.tag.len())
                && tag[..self.tag.len()].eq_ignore_ascii_case(&self.tag)
        } else {
            tag.eq_ignore_ascii_case(&self.tag)
        }
    }
}

impl fmt::Display for PosFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(if self.tag == "," { "COMMA" } else { &self.tag })?;
        if self.prefix {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// Pattern step of a rewrite rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    WordRun {
        min: usize,
        max: usize,
        filters: Vec<PosFilter>,
    },
    List {
        name: String,
        source: usize,
        result: usize,
        negated: bool,
    },
    Word {
        text: String,
        negated: bool,
    },
    Anchor,
}

impl Command {
    pub const WORD_RUN: char = '0';
    pub const LIST: char = '1';
    pub const WORD: char = '2';
    pub const ANCHOR: char = '3';

    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut chars = text.chars();
        let Some(kind) = chars.next() else {
            return Err(DomainError::ConfigurationError("empty command".to_string()));
        };
        match kind {
            Self::WORD_RUN => {
                let min = digit(chars.next(), text)?;
                let max = digit(chars.next(), text)?;
                let filters = chars
                    .as_str()
                    .split(',')
                    .filter(|f| !f.is_empty())
                    .map(PosFilter::parse)
                    .collect();
                Ok(Command::WordRun { min, max, filters })
            }
            Self::LIST => {
                let source = digit(chars.next(), text)?;
                let result = digit(chars.next(), text)?;
                let name = chars.as_str();
                let (negated, name) = match name.strip_prefix('!') {
                    Some(name) => (true, name),
                    None => (false, name),
                };
                if name.is_empty() {
                    return Err(DomainError::ConfigurationError(format!(
                        "list command '{text}' has no name"
                    )));
                }
                Ok(Command::List {
                    name: name.to_string(),
                    source,
                    result,
                    negated,
                })
            }
            Self::WORD => {
                let word = chars.as_str();
                let (negated, word) = match word.strip_prefix('!') {
                    Some(word) => (true, word),
                    None => (false, word),
                };
                Ok(Command::Word {
                    text: word.to_string(),
                    negated,
                })
            }
            Self::ANCHOR => Ok(Command::Anchor),
            _ => Err(DomainError::ConfigurationError(format!(
                "unknown command '{text}'"
            ))),
        }
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Command::Anchor)
    }
}

fn digit(c: Option<char>, command: &str) -> Result<usize, DomainError> {
    c.and_then(|c| c.to_digit(10))
        .map(|d| d as usize)
        .ok_or_else(|| {
            DomainError::ConfigurationError(format!("command '{command}' is missing a count"))
        })
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::WordRun { min, max, filters } => {
                write!(f, "{}{min}{max}", Self::WORD_RUN)?;
                for (i, filter) in filters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{filter}")?;
                }
                Ok(())
            }
            Command::List {
                name,
                source,
                result,
                negated,
            } => write!(
                f,
                "{}{source}{result}{}{name}",
                Self::LIST,
                if *negated { "!" } else { "" }
            ),
            Command::Word { text, negated } => {
                write!(f, "{}{}{text}", Self::WORD, if *negated { "!" } else { "" })
            }
            Command::Anchor => write!(f, "{}", Self::ANCHOR),
        }
    }
}
