//! Application layer: orchestration of the domain algorithms
//!
//! This layer turns one rewrite request into domain calls. It owns the
//! request settings, the synonym pass over each paragraph, the document
//! steps around it (replacement tags, reordering, signatures), version
//! generation and the registry of loaded language resources.
//!
//! Nothing here keeps state between calls except the [`ResourceRegistry`],
//! whose contents are read-only once registered.

pub mod config;
pub mod markup;
mod paragraphs;
pub(crate) mod pipeline;
mod plain;
pub mod registry;
mod synonyms;
pub(crate) mod versions;

pub use config::{defaults, ProcessingError, ProcessingResult, RewriteSettings, RewriteSettingsBuilder};
pub use markup::{parse_tag_pairs, protect_tags, restore_tags, word_count, TagPair};
pub use registry::ResourceRegistry;

pub(crate) use plain::PlainOracle;
