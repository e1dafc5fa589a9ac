//! Rewrite command implementation

use crate::commands::init_logging;
use crate::config::{CliConfig, RewriteConfig};
use crate::error::CliError;
use crate::input::read_documents;
use crate::output::{formatter, open_writer, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use respin_core::{Config, Input, ResourceRegistry, Rewriter};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the rewrite command
#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Input files or patterns (supports glob); stdin when omitted
    #[arg(short, long, value_name = "FILE/PATTERN")]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Language code or embedded language name
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Configuration file (default: ./respin.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra thesaurus file, TOML or `word|pos|quality|syn;syn` lines
    #[arg(long, value_name = "FILE")]
    pub thesaurus: Option<PathBuf>,

    /// Extra rules file
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Word quality: 5 best, 4 better, 3 good, 2 average, 1 all
    #[arg(long, value_name = "LEVEL")]
    pub word_quality: Option<i32>,

    /// Phrase quality on the word scale, 6 follows the word quality, 0 off
    #[arg(long, value_name = "LEVEL")]
    pub phrase_quality: Option<i32>,

    /// POS match: 3 full, 2 loose, 1 extremely loose, 0 off
    #[arg(long, value_name = "LEVEL")]
    pub pos_match: Option<i32>,

    /// Instant unique: 2 lookalike letters, 1 with accented letters, 0 off
    #[arg(long, value_name = "LEVEL")]
    pub instant_unique: Option<i32>,

    /// Spintax already in the input: 2 ordered, 1 random, 0 leave it
    #[arg(long, value_name = "LEVEL")]
    pub existing_spin: Option<i32>,

    /// Emit spintax instead of one resolved rewrite
    #[arg(short, long)]
    pub spin: bool,

    /// Never keep the original wording
    #[arg(long)]
    pub exclude_original: bool,

    /// Skip the sentence rules
    #[arg(long)]
    pub no_sentence_rewrite: bool,

    /// Skip article handling around replacements
    #[arg(long)]
    pub no_tidy: bool,

    /// Only replace multi-word phrases
    #[arg(long)]
    pub phrase_only: bool,

    /// Reject replacements that change the sentence's tags
    #[arg(long)]
    pub check_grammar: bool,

    /// Shuffle paragraphs between headings
    #[arg(long)]
    pub reorder_paragraphs: bool,

    /// Keep spintax already in the input out of the synonym pass
    #[arg(long)]
    pub dont_spin_existing: bool,

    /// Leave proper nouns alone
    #[arg(long)]
    pub inhibit_proper_nouns: bool,

    /// Term never replaced (repeatable)
    #[arg(long = "protect", value_name = "TERM")]
    pub protected_terms: Vec<String>,

    /// Markup pairs kept verbatim, e.g. `<b>|</b>,[url]|[/url]`
    #[arg(long, value_name = "PAIRS")]
    pub protected_tags: Option<String>,

    /// Synonyms kept per replacement, 0 for all
    #[arg(long, value_name = "N")]
    pub max_synonyms: Option<usize>,

    /// Replace each candidate with probability 1/N
    #[arg(long, value_name = "N")]
    pub replace_frequency: Option<u32>,

    /// Resolved versions per article (at most 20)
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub versions: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl RewriteArgs {
    /// Execute the rewrite command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {:?}", self);

        let file = CliConfig::load(self.config.as_deref())?;
        let config = self.build_config(&file.rewrite)?;
        let registry = self.registry(&file.rewrite, config.language().code())?;
        let rewriter = Rewriter::with_registry(config, registry).map_err(CliError::from)?;

        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_name(&file.output.default_format).ok_or_else(|| {
                CliError::ConfigError(format!("unknown output format '{}'", file.output.default_format))
            })?,
        };

        let documents = read_documents(&self.input)?;
        let writer = open_writer(self.output.as_deref())?;
        let mut out = formatter(
            format,
            writer,
            documents.len() > 1,
            file.output.include_metadata,
            file.output.pretty_json,
        );

        let mut reporter = ProgressReporter::new(self.quiet);
        for document in documents {
            let input = Input::from_text(document.text);
            let result = if self.versions >= 2 {
                rewriter.rewrite_versions_output(input, self.versions)
            } else {
                reporter.start_document(&document.name);
                let result = rewriter.rewrite_with_progress(input, Some(&reporter));
                reporter.finish_document();
                result
            };
            let output = result
                .map_err(CliError::from)
                .with_context(|| format!("Failed to rewrite {}", document.name))?;
            log::info!(
                "{}: {} words in, {} words out",
                document.name,
                output.metadata.words_in,
                output.metadata.words_out
            );
            out.format_document(&document.name, &output.text, Some(&output.metadata))?;
        }
        out.finish()
    }

    /// Merge the configuration file with the flags
    pub fn build_config(&self, file: &RewriteConfig) -> Result<Config> {
        let mut builder = Config::builder()
            .language(self.language.clone().unwrap_or_else(|| file.language.clone()))
            .word_quality_level(self.word_quality.unwrap_or(file.word_quality))
            .phrase_quality_level(self.phrase_quality.unwrap_or(file.phrase_quality))
            .pos_match_level(self.pos_match.unwrap_or(file.pos_match))
            .instant_unique_level(self.instant_unique.unwrap_or(file.instant_unique))
            .existing_spin_level(self.existing_spin.unwrap_or(file.existing_spin))
            .return_spin(self.spin || file.return_spin)
            .exclude_original(self.exclude_original || file.exclude_original)
            .sentence_rewrite(file.sentence_rewrite && !self.no_sentence_rewrite)
            .spin_tidy(file.spin_tidy && !self.no_tidy)
            .phrase_only(self.phrase_only)
            .check_grammar(self.check_grammar)
            .reorder_paragraphs(self.reorder_paragraphs)
            .dont_spin_existing_spin(self.dont_spin_existing)
            .inhibit_proper_noun_spin(self.inhibit_proper_nouns)
            .max_synonyms(self.max_synonyms.unwrap_or(file.max_synonyms))
            .replace_frequency(self.replace_frequency.unwrap_or(file.replace_frequency))
            .protected_terms(file.protected_terms.iter().chain(&self.protected_terms).cloned())
            .protected_tags(self.protected_tags.clone().unwrap_or_else(|| file.protected_tags.clone()))
            .replacement_tags(file.replacement_tags.clone())
            .signatures(file.signatures.iter().cloned());
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Registry with the embedded languages plus any extra resource files
    fn registry(&self, file: &RewriteConfig, language: &str) -> Result<Arc<ResourceRegistry>> {
        let thesaurus = self.thesaurus.as_ref().or(file.thesaurus.as_ref());
        let rules = self.rules.as_ref().or(file.rules.as_ref());
        if thesaurus.is_none() && rules.is_none() {
            return Ok(ResourceRegistry::global());
        }

        let registry = ResourceRegistry::with_embedded();
        if let Some(path) = thesaurus {
            let skipped = registry
                .load_thesaurus_file(language, path)
                .with_context(|| format!("Failed to load thesaurus {}", path.display()))?;
            if skipped > 0 {
                log::warn!("{}: {skipped} line(s) skipped", path.display());
            }
        }
        if let Some(path) = rules {
            registry
                .load_rules_file(language, path)
                .with_context(|| format!("Failed to load rules {}", path.display()))?;
        }
        Ok(Arc::new(registry))
    }
}
