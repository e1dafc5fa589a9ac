//! Output formatting module

use anyhow::{Context, Result};
use respin_core::RewriteMetadata;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output one processed document
    fn format_document(&mut self, source: &str, text: &str, metadata: Option<&RewriteMetadata>) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// The processed text as it is
    Text,
    /// JSON array of documents with metadata
    Json,
}

impl OutputFormat {
    /// Parse a format name from the configuration file
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Output sink: a file when given, stdout otherwise
pub fn open_writer(path: Option<&Path>) -> Result<Box<dyn Write + Send + Sync>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Formatter for `format` writing to `writer`
pub fn formatter(
    format: OutputFormat,
    writer: Box<dyn Write + Send + Sync>,
    headers: bool,
    include_metadata: bool,
    pretty: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer, headers)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer, include_metadata, pretty)),
    }
}
