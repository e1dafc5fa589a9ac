//! Tidy command implementation

use crate::commands::init_logging;
use crate::input::read_documents;
use crate::output::{formatter, open_writer, OutputFormat};
use anyhow::Result;
use clap::Args;
use respin_core::Rewriter;
use std::path::PathBuf;

/// Arguments for the tidy command
#[derive(Debug, Args)]
pub struct TidyArgs {
    /// Input files or patterns (supports glob); stdin when omitted
    #[arg(short, long, value_name = "FILE/PATTERN")]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl TidyArgs {
    /// Execute the tidy command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, false);

        let documents = read_documents(&self.input)?;
        let mut out = formatter(
            self.format,
            open_writer(self.output.as_deref())?,
            documents.len() > 1,
            false,
            true,
        );
        for document in documents {
            let (text, changes) = Rewriter::spin_tidy(&document.text);
            log::info!("{}: {changes} group(s) tidied", document.name);
            out.format_document(&document.name, &text, None)?;
        }
        out.finish()
    }
}
