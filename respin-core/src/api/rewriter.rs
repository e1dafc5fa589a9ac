//! Main rewriter implementation

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::api::config::defaults;
use crate::api::{Config, Error, Input, Result, RewriteMetadata, RewriteOutput};
use crate::application::pipeline::{rewrite_document, Resources};
use crate::application::versions::{join_versions, resolve_versions};
use crate::application::{
    parse_tag_pairs, protect_tags, restore_tags, word_count, PlainOracle, ResourceRegistry, RewriteSettings,
};
use crate::domain::pos::PosOracle;
use crate::domain::rng::{derive_seeds, new_rng};
use crate::domain::spintax::{self, spin_text, SpinOptions, SpinType};
use crate::progress::{CancellationToken, ProgressListener};

/// Article rewriter bound to a configuration and a resource registry
#[derive(Debug, Clone)]
pub struct Rewriter {
    config: Config,
    registry: Arc<ResourceRegistry>,
}

impl Rewriter {
    /// Create a rewriter with default configuration over the embedded resources
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            registry: ResourceRegistry::global(),
        }
    }

    /// Create a rewriter with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_registry(config, ResourceRegistry::global())
    }

    /// Create a rewriter over a specific registry
    pub fn with_registry(config: Config, registry: Arc<ResourceRegistry>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    /// Create a rewriter for a specific language
    pub fn for_language(code: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::builder().language(code).build()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Rewrite an article and report metadata
    pub fn rewrite(&self, input: Input) -> Result<RewriteOutput> {
        self.rewrite_with_progress(input, None)
    }

    /// Like [`Rewriter::rewrite`], notifying `listener` as paragraphs complete
    pub fn rewrite_with_progress(
        &self,
        input: Input,
        listener: Option<&dyn ProgressListener>,
    ) -> Result<RewriteOutput> {
        let start = Instant::now();
        let source = input.into_text()?;
        let text = self.rewrite_with(&source, listener, None)?;
        Ok(self.output(&source, text, 0, start))
    }

    /// Rewrite an article
    pub fn rewrite_text(&self, text: &str) -> Result<String> {
        self.rewrite_with(text, None, None)
    }

    /// Rewrite an article with progress notifications and cancellation
    pub fn rewrite_with(
        &self,
        text: &str,
        listener: Option<&dyn ProgressListener>,
        cancel: Option<&CancellationToken>,
    ) -> Result<String> {
        let mut rng = new_rng(self.config.seed);
        self.run(text, &self.config.settings, &mut rng, listener, cancel)
    }

    /// Produce `count` resolved versions of one rewrite
    ///
    /// `count` is capped at the version limit. Fewer than two versions give
    /// the plain rewrite; otherwise the article is rewritten to spintax once
    /// and resolved per version, each under its own header.
    pub fn rewrite_versions(&self, text: &str, count: usize) -> Result<String> {
        let count = count.min(defaults::MAX_VERSIONS);
        if count < 2 {
            return self.rewrite_text(text);
        }

        let settings = RewriteSettings {
            return_spin: true,
            ..self.config.settings.clone()
        };
        let mut rng = new_rng(self.config.seed);
        let spintax = self.run(text, &settings, &mut rng, None, None)?;
        let seeds = derive_seeds(&mut rng, count);
        let versions = resolve_versions(&spintax, &seeds, settings.exclude_original);
        log::debug!("resolved {} versions", versions.len());
        Ok(join_versions(&versions))
    }

    /// Like [`Rewriter::rewrite_versions`], with metadata
    pub fn rewrite_versions_output(&self, input: Input, count: usize) -> Result<RewriteOutput> {
        let start = Instant::now();
        let source = input.into_text()?;
        let text = self.rewrite_versions(&source, count)?;
        let versions = match count.min(defaults::MAX_VERSIONS) {
            0 | 1 => 0,
            capped => capped,
        };
        Ok(self.output(&source, text, versions, start))
    }

    /// Resolve spintax without the synonym engine
    pub fn resolve_spintax(&self, text: &str, options: &SpinOptions) -> String {
        let mut rng = new_rng(self.config.seed);
        spin_text(text, options, &mut rng)
    }

    /// Pick one random alternative per group
    pub fn create_spin(&self, text: &str, exclude_original: bool) -> String {
        let options = SpinOptions::new(SpinType::Random).with_exclude_original(exclude_original);
        self.resolve_spintax(text, &options)
    }

    /// Tidy spintax groups, returning the text and the number of groups changed
    pub fn spin_tidy(text: &str) -> (String, usize) {
        spintax::spin_tidy(text)
    }

    /// Validate resources and run the pipeline
    ///
    /// A paragraph that panics is kept as written by the pipeline itself. A
    /// panic outside the paragraph loop fails the whole call with
    /// [`Error::Unknown`].
    fn run<R: rand::Rng + ?Sized>(
        &self,
        text: &str,
        settings: &RewriteSettings,
        rng: &mut R,
        listener: Option<&dyn ProgressListener>,
        cancel: Option<&CancellationToken>,
    ) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        if !self.registry.has_thesaurus() {
            return Err(Error::NoThesaurus);
        }

        let language = self.config.language.code();
        let thesaurus = self
            .registry
            .thesaurus(language)
            .ok_or_else(|| Error::UnsupportedLanguage {
                supported: self.registry.languages(),
            })?;
        let oracle: Arc<dyn PosOracle> = match self.registry.oracle(language) {
            Some(oracle) => oracle,
            None if settings.needs_tags() => return Err(Error::PosNotLoaded),
            None => {
                log::debug!("no POS model for {language}; using plain tokenization");
                Arc::new(PlainOracle::new(language))
            }
        };
        let rules = self.registry.rules(language);

        let pairs = parse_tag_pairs(&self.config.protected_tags);
        let source = protect_tags(text, &pairs);
        let resources = Resources {
            thesaurus: &thesaurus,
            rules: rules.as_deref(),
            oracle: oracle.as_ref(),
        };

        let spun = catch_unwind(AssertUnwindSafe(|| {
            rewrite_document(&source, settings, resources, rng, listener, cancel)
        }))
        .map_err(|payload| {
            let message = panic_message(payload.as_ref());
            log::error!("rewrite failed: {message}");
            Error::Unknown(message)
        })?;

        Ok(restore_tags(&spun, &pairs))
    }

    fn output(&self, source: &str, text: String, versions: usize, start: Instant) -> RewriteOutput {
        let metadata = RewriteMetadata {
            language: self.config.language.code().to_string(),
            words_in: word_count(source),
            words_out: word_count(&text),
            versions,
            duration: start.elapsed(),
        };
        RewriteOutput { text, metadata }
    }
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}
