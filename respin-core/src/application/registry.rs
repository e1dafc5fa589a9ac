//! Process-wide store of loaded language resources
//!
//! Thesauri, rule sets and POS oracles are registered per language code and
//! shared read-only by every call. Registration replaces a language's entry
//! as a whole; readers holding the previous `Arc` keep using it.

use super::config::{ProcessingError, ProcessingResult};
use crate::domain::pos::{PosOracle, TagTable};
use crate::domain::rules::RuleSet;
use crate::domain::thesaurus::{loader, Thesaurus, ThesaurusStore};
use crate::language::{embedded, embedded_languages};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Loaded resources keyed by lowercase language code
#[derive(Default)]
pub struct ResourceRegistry {
    thesauri: RwLock<ThesaurusStore>,
    rules: RwLock<HashMap<String, Arc<RuleSet>>>,
    oracles: RwLock<HashMap<String, Arc<dyn PosOracle>>>,
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("thesauri", &self.thesauri.read().languages())
            .field("rules", &self.rules.read().keys().collect::<Vec<_>>())
            .field("oracles", &self.oracles.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ResourceRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every embedded language
    pub fn with_embedded() -> Self {
        let registry = Self::new();
        for (code, _) in embedded_languages() {
            match embedded(&code) {
                Ok(resources) => {
                    registry.register_thesaurus_shared(resources.thesaurus.clone());
                    registry.register_rules(&code, resources.rules.clone());
                    registry.register_oracle(&code, resources.oracle.clone());
                }
                Err(e) => log::warn!("embedded language {code} unavailable: {e}"),
            }
        }
        registry
    }

    /// The shared registry, populated with the embedded languages on first use
    pub fn global() -> Arc<ResourceRegistry> {
        static GLOBAL: OnceLock<Arc<ResourceRegistry>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(ResourceRegistry::with_embedded()))
            .clone()
    }

    pub fn register_thesaurus(&self, thesaurus: Thesaurus) {
        self.register_thesaurus_shared(Arc::new(thesaurus));
    }

    pub fn register_thesaurus_shared(&self, thesaurus: Arc<Thesaurus>) {
        log::info!(
            "registered thesaurus for {} ({} headwords)",
            thesaurus.language(),
            thesaurus.len()
        );
        self.thesauri.write().insert_shared(thesaurus);
    }

    pub fn register_rules(&self, language: &str, rules: Arc<RuleSet>) {
        log::info!("registered {} rules for {language}", rules.len());
        self.rules.write().insert(language.to_lowercase(), rules);
    }

    pub fn register_oracle(&self, language: &str, oracle: Arc<dyn PosOracle>) {
        log::info!("registered POS model for {language}");
        self.oracles.write().insert(language.to_lowercase(), oracle);
    }

    pub fn thesaurus(&self, language: &str) -> Option<Arc<Thesaurus>> {
        self.thesauri.read().get(language).cloned()
    }

    pub fn rules(&self, language: &str) -> Option<Arc<RuleSet>> {
        self.rules.read().get(&language.to_lowercase()).cloned()
    }

    pub fn oracle(&self, language: &str) -> Option<Arc<dyn PosOracle>> {
        self.oracles.read().get(&language.to_lowercase()).cloned()
    }

    /// Whether any thesaurus is loaded
    pub fn has_thesaurus(&self) -> bool {
        !self.thesauri.read().is_empty()
    }

    /// Codes of the languages with a thesaurus, sorted
    pub fn languages(&self) -> Vec<String> {
        self.thesauri.read().languages()
    }

    /// Load and register a thesaurus file
    ///
    /// `.toml` files use the structured format; anything else is read as the
    /// line format for `language`. Malformed lines are skipped and counted.
    pub fn load_thesaurus_file(&self, language: &str, path: &Path) -> ProcessingResult<usize> {
        let content = read(path)?;
        let table = self
            .oracle(language)
            .map(|oracle| oracle.tag_table().clone())
            .unwrap_or_else(TagTable::new);

        let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let (thesaurus, skipped) = if is_toml {
            let thesaurus = loader::from_toml(&content, &table).map_err(|e| ProcessingError::Load {
                reason: format!("{}: {e}", path.display()),
            })?;
            (thesaurus, 0)
        } else {
            let (thesaurus, errors) = loader::from_lines(language, &content, &table);
            (thesaurus, errors.len())
        };

        if skipped > 0 {
            log::warn!("{}: {skipped} malformed thesaurus lines skipped", path.display());
        }
        self.register_thesaurus(thesaurus);
        Ok(skipped)
    }

    /// Load and register a rules file, returning the number of skipped lines
    pub fn load_rules_file(&self, language: &str, path: &Path) -> ProcessingResult<usize> {
        let content = read(path)?;
        let (rules, errors) = RuleSet::parse(language, &content);
        for error in &errors {
            log::warn!("{}: {error}", path.display());
        }
        self.register_rules(language, Arc::new(rules));
        Ok(errors.len())
    }
}

fn read(path: &Path) -> ProcessingResult<String> {
    std::fs::read_to_string(path).map_err(|e| ProcessingError::Load {
        reason: format!("{}: {e}", path.display()),
    })
}
