//! Public API for respin-core
//!
//! [`Rewriter`] is the entry point: it rewrites articles with a [`Config`],
//! resolves and tidies spintax, and produces multiple versions of a
//! rewrite. Language resources come from a
//! [`ResourceRegistry`](crate::application::ResourceRegistry), by default
//! the process-wide one holding the embedded languages.

mod config;
mod error;
mod input;
mod language;
mod output;
mod rewriter;


pub use config::{defaults, parse_flag, parse_level, Config, ConfigBuilder, PHRASE_QUALITY_AS_WORD};
pub use error::{Error, Result};
pub use input::Input;
pub use language::Language;
pub use output::{RewriteMetadata, RewriteOutput};
pub use rewriter::Rewriter;
