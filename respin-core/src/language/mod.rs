//! Embedded language resources and the reference POS oracle
//!
//! Languages are described by TOML files under `configs/`: sentence
//! boundaries, abbreviations, the tag table and a word lexicon drive
//! [`LexiconOracle`], next to a rule file and a starter thesaurus.

pub(crate) mod config;
pub(crate) mod loader;
pub(crate) mod runtime;
pub(crate) mod tables;

pub use config::LanguageConfig;
pub use loader::{embedded, embedded_languages, LanguageResources};
pub use runtime::LexiconOracle;
