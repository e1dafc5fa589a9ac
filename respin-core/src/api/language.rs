//! Language type for the API

use crate::api::Error;
use crate::domain::pos::oracle::PosOracle;
use crate::language::{embedded, embedded_languages};
use std::fmt;
use std::str::FromStr;

/// Language of the text being rewritten, as a lowercase ISO 639 code
///
/// Any well-formed code is accepted here; whether resources exist for it is
/// checked when a rewrite runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Default for Language {
    fn default() -> Self {
        Language("en".to_string())
    }
}

impl Language {
    /// Create a Language from a code or the name of an embedded language
    pub fn from_code(code: &str) -> Result<Self, Error> {
        let code = code.trim().to_lowercase();
        if code.is_empty() {
            return Ok(Self::default());
        }
        if let Ok(resources) = embedded(&code) {
            return Ok(Language(resources.oracle.language().to_string()));
        }
        if (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_lowercase()) {
            return Ok(Language(code));
        }
        Err(Error::Configuration(format!("invalid language code '{code}'")))
    }

    /// Get the language code
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Get the full language name, or the code when it is not embedded
    pub fn name(&self) -> String {
        embedded_languages()
            .into_iter()
            .find(|(code, _)| *code == self.0)
            .map_or_else(|| self.0.clone(), |(_, name)| name)
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
