//! Embedded language resources
//!
//! Each embedded language ships an oracle configuration, a rule file and a
//! starter thesaurus. They are parsed once, on first access.

use crate::domain::pos::PosOracle;
use crate::domain::rules::RuleSet;
use crate::domain::thesaurus::{loader as thesaurus_loader, Thesaurus};
use crate::language::{config::LanguageConfig, runtime::LexiconOracle};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Everything embedded for one language
#[derive(Debug)]
pub struct LanguageResources {
    pub oracle: Arc<LexiconOracle>,
    pub rules: Arc<RuleSet>,
    pub thesaurus: Arc<Thesaurus>,
}

/// Embedded language resources, keyed by code and by name
static EMBEDDED: OnceLock<HashMap<String, Arc<LanguageResources>>> = OnceLock::new();

fn embedded_map() -> &'static HashMap<String, Arc<LanguageResources>> {
    EMBEDDED.get_or_init(|| {
        let mut map = HashMap::new();

        // Load English
        match load_embedded_language(
            "en",
            include_str!("../../configs/languages/english.toml"),
            include_str!("../../configs/rules/english.rules"),
            include_str!("../../configs/thesaurus/english.toml"),
        ) {
            Ok(resources) => {
                let resources = Arc::new(resources);
                map.insert("english".to_string(), resources.clone());
                map.insert("en".to_string(), resources);
            }
            Err(e) => {
                log::warn!("Failed to load embedded English resources: {e}");
            }
        }

        map
    })
}

/// Load embedded resources by language code or name
pub fn embedded(code: &str) -> Result<Arc<LanguageResources>, String> {
    embedded_map()
        .get(&code.to_lowercase())
        .cloned()
        .ok_or_else(|| format!("Unknown language code: {code}"))
}

/// Codes of the embedded languages with their display names, sorted by code
pub fn embedded_languages() -> Vec<(String, String)> {
    let mut languages: Vec<(String, String)> = embedded_map()
        .iter()
        .filter(|(key, resources)| key.as_str() == resources.oracle.language())
        .map(|(key, resources)| (key.clone(), resources.oracle.name().to_string()))
        .collect();
    languages.sort();
    languages
}

/// Load one language from its resource texts
fn load_embedded_language(
    code: &str,
    config: &str,
    rules: &str,
    thesaurus: &str,
) -> Result<LanguageResources, String> {
    let config: LanguageConfig =
        toml::from_str(config).map_err(|e| format!("Failed to parse {code} config: {e}"))?;
    let oracle = LexiconOracle::from_config(&config)?;

    let (rules, errors) = RuleSet::parse(code, rules);
    for error in &errors {
        log::warn!("embedded {code} rules: {error}");
    }

    let thesaurus = thesaurus_loader::from_toml(thesaurus, oracle.tag_table())
        .map_err(|e| format!("Failed to parse {code} thesaurus: {e}"))?;

    Ok(LanguageResources {
        oracle: Arc::new(oracle),
        rules: Arc::new(rules),
        thesaurus: Arc::new(thesaurus),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_is_embedded() {
        let english = embedded("en").unwrap();
        assert!(Arc::ptr_eq(&english, &embedded("English").unwrap()));
        assert!(!english.rules.is_empty());
        assert!(english.rules.word_list("adverbexception").is_some());
        assert!(english.thesaurus.entry("quick").is_some());
        assert_eq!(english.thesaurus.language(), "en");
    }

    #[test]
    fn test_unknown_language() {
        assert!(embedded("xx").unwrap_err().contains("xx"));
    }

    #[test]
    fn test_embedded_languages() {
        assert_eq!(
            embedded_languages(),
            vec![("en".to_string(), "English".to_string())]
        );
    }
}
