//! Spin command implementation

use crate::commands::init_logging;
use crate::input::read_documents;
use crate::output::{formatter, open_writer, OutputFormat};
use anyhow::Result;
use clap::{Args, ValueEnum};
use respin_core::{Config, Rewriter, SpinOptions, SpinType};
use std::path::PathBuf;

/// Arguments for the spin command
#[derive(Debug, Args)]
pub struct SpinArgs {
    /// Input files or patterns (supports glob); stdin when omitted
    #[arg(short, long, value_name = "FILE/PATTERN")]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// How groups are resolved
    #[arg(short, long, value_enum, default_value = "random")]
    pub mode: SpinMode,

    /// Alternative index for ordered mode (random when omitted)
    #[arg(long, value_name = "N")]
    pub index: Option<usize>,

    /// Never pick the first alternative of a group
    #[arg(long)]
    pub exclude_original: bool,

    /// Drop `##` protection markers from the output
    #[arg(long)]
    pub strip_markers: bool,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Spintax resolution modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpinMode {
    /// Leave groups as written
    None,
    /// Pick a random alternative per group
    Random,
    /// Pick the same alternative index in every group
    Ordered,
    /// Rewrite the spintax itself
    Respin,
}

impl From<SpinMode> for SpinType {
    fn from(mode: SpinMode) -> Self {
        match mode {
            SpinMode::None => SpinType::None,
            SpinMode::Random => SpinType::Random,
            SpinMode::Ordered => SpinType::Ordered,
            SpinMode::Respin => SpinType::Respin,
        }
    }
}

impl SpinArgs {
    /// Execute the spin command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, false);

        let mut config = Config::builder();
        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }
        let rewriter = Rewriter::with_config(config.build()?)?;
        let options = self.options();

        let documents = read_documents(&self.input)?;
        let mut out = formatter(
            self.format,
            open_writer(self.output.as_deref())?,
            documents.len() > 1,
            false,
            true,
        );
        for document in documents {
            let text = rewriter.resolve_spintax(&document.text, &options);
            out.format_document(&document.name, &text, None)?;
        }
        out.finish()
    }

    fn options(&self) -> SpinOptions {
        let options = match (self.mode, self.index) {
            (SpinMode::Ordered, Some(index)) => SpinOptions::ordered(index),
            (mode, _) => SpinOptions::new(mode.into()),
        };
        options
            .with_exclude_original(self.exclude_original)
            .with_remove_special_tags(self.strip_markers)
    }
}
