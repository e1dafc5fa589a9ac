//! Validate command implementation

use crate::error::CliError;
use crate::input::FileReader;
use anyhow::Result;
use clap::Args;
use respin_core::domain::pos::TagTable;
use respin_core::domain::rules::RuleSet;
use respin_core::domain::thesaurus::loader;
use respin_core::language::embedded;
use respin_core::{DomainError, PosOracle};
use std::path::{Path, PathBuf};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Rules file to validate
    #[arg(short, long, value_name = "FILE", required_unless_present = "thesaurus")]
    pub rules: Option<PathBuf>,

    /// Thesaurus file to validate, TOML or line format
    #[arg(short, long, value_name = "FILE")]
    pub thesaurus: Option<PathBuf>,

    /// Language whose tag table resolves thesaurus tags
    #[arg(short, long, value_name = "CODE", default_value = "en")]
    pub language: String,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        let mut failures = Vec::new();
        if let Some(path) = &self.rules {
            if let Err(e) = self.validate_rules(path) {
                failures.push(e);
            }
        }
        if let Some(path) = &self.thesaurus {
            if let Err(e) = self.validate_thesaurus(path) {
                failures.push(e);
            }
        }
        match failures.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn validate_rules(&self, path: &Path) -> Result<()> {
        println!("Validating rules: {}", path.display());
        let content = FileReader::read_text(path)?;
        let (rules, errors) = RuleSet::parse(&self.language, &content);
        report(path, &errors)?;
        println!("✓ Rules are valid!");
        println!("  Rules: {}", rules.len());
        Ok(())
    }

    fn validate_thesaurus(&self, path: &Path) -> Result<()> {
        println!("Validating thesaurus: {}", path.display());
        let content = FileReader::read_text(path)?;
        let tags = embedded(&self.language)
            .map(|resources| resources.oracle.tag_table().clone())
            .unwrap_or_else(|_| TagTable::new());

        let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let thesaurus = if is_toml {
            loader::from_toml(&content, &tags).map_err(|e| {
                println!("✗ Thesaurus is invalid!");
                println!("  Error: {e}");
                CliError::InvalidResource {
                    path: path.display().to_string(),
                    errors: 1,
                }
            })?
        } else {
            let (thesaurus, errors) = loader::from_lines(&self.language, &content, &tags);
            report(path, &errors)?;
            thesaurus
        };
        println!("✓ Thesaurus is valid!");
        println!("  Language: {}", thesaurus.language());
        println!("  Headwords: {}", thesaurus.len());
        Ok(())
    }
}

fn report(path: &Path, errors: &[DomainError]) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    println!("✗ {} is invalid!", path.display());
    for error in errors {
        println!("  {error}");
    }
    Err(CliError::InvalidResource {
        path: path.display().to_string(),
        errors: errors.len(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn args(rules: Option<&Path>, thesaurus: Option<&Path>) -> ValidateArgs {
        ValidateArgs {
            rules: rules.map(Path::to_path_buf),
            thesaurus: thesaurus.map(Path::to_path_buf),
            language: "en".to_string(),
        }
    }

    #[test]
    fn test_validate_rules() {
        let mut good = NamedTempFile::new().unwrap();
        write!(good, "# swap\n011JJ/2and/011JJ 2/1/0\ntense;is;was\n").unwrap();
        assert!(args(Some(good.path()), None).execute().is_ok());

        let mut bad = NamedTempFile::new().unwrap();
        write!(bad, "011JJ/2and/011JJ 2/1/0\n011JJ 7\n").unwrap();
        let error = args(Some(bad.path()), None).execute().unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CliError>(),
            Some(CliError::InvalidResource { errors: 1, .. })
        ));
    }

    #[test]
    fn test_validate_thesaurus_formats() {
        let mut lines = NamedTempFile::new().unwrap();
        write!(lines, "house|NN|best|home;dwelling\n").unwrap();
        assert!(args(None, Some(lines.path())).execute().is_ok());

        let mut toml = Builder::new().suffix(".toml").tempfile().unwrap();
        write!(toml, "language = \"en\"\n[[entry]]\nword = \"big\"\n[[entry.synonym]]\ntext = \"large\"\nquality = \"superb\"\n").unwrap();
        assert!(args(None, Some(toml.path())).execute().is_err());
    }
}
