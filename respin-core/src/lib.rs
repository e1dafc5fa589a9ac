//! Article spinning engine
//!
//! This crate rewrites text by substituting words and phrases with
//! thesaurus synonyms, optionally emitting the alternatives as spintax
//! (`{original|synonym}`), restructuring sentences with pattern rules, and
//! swapping letters for lookalike homoglyphs. It also parses, resolves and
//! tidies spintax on its own.
//!
//! # Architecture
//!
//! - **Domain layer**: the text algorithms (spintax AST and resolver,
//!   thesaurus model, rule matcher, protected regions, span edits)
//! - **Application layer**: the rewrite pipeline, version generation and
//!   the registry of loaded language resources
//! - **Language layer**: embedded resources and a lexicon-driven reference
//!   POS oracle
//! - **API layer**: [`Rewriter`], [`Config`] and friends
//!
//! # Example
//!
//! ```rust
//! use respin_core::{Config, Rewriter};
//!
//! let config = Config::builder()
//!     .seed(7)
//!     .return_spin(true)
//!     .sentence_rewrite(false)
//!     .max_synonyms(1)
//!     .build()
//!     .unwrap();
//! let rewriter = Rewriter::with_config(config).unwrap();
//!
//! let spintax = rewriter.rewrite_text("The quick fox jumps.").unwrap();
//! assert!(spintax.contains("{quick|fast}"));
//!
//! let resolved = rewriter.create_spin(&spintax, false);
//! assert!(!resolved.contains('{'));
//! ```

pub mod api;
pub mod application;
pub mod domain;
pub mod language;
pub mod progress;

pub use api::{
    Config, ConfigBuilder, Error, Input, Language, Result, RewriteMetadata, RewriteOutput, Rewriter,
};
pub use application::{
    parse_tag_pairs, protect_tags, restore_tags, word_count, ResourceRegistry, RewriteSettings, TagPair,
};
pub use domain::pos::{PosOracle, PosTagMatchType};
pub use domain::spintax::{spin_text, spin_tidy, SpinOptions, SpinType};
pub use domain::thesaurus::{QualityRating, Thesaurus};
pub use domain::{DomainError, InstantUniqueType};
pub use progress::{CancellationToken, ProgressListener};
