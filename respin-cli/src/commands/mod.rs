//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod generate_config;
pub mod rewrite;
pub mod spin;
pub mod tidy;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rewrite articles with thesaurus synonyms and sentence rules
    Rewrite(rewrite::RewriteArgs),

    /// Resolve spintax
    Spin(spin::SpinArgs),

    /// Tidy spintax groups
    Tidy(tidy::TidyArgs),

    /// Check a rules or thesaurus file
    Validate(validate::ValidateArgs),

    /// Write a respin.toml with every option at its default
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List embedded languages
    Languages,

    /// List available output formats
    Formats,
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Rewrite(args) => args.execute(),
            Commands::Spin(args) => args.execute(),
            Commands::Tidy(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => {
                subcommand.execute();
                Ok(())
            }
        }
    }
}

impl ListCommands {
    fn execute(&self) {
        match self {
            ListCommands::Languages => {
                for (code, name) in respin_core::language::embedded_languages() {
                    println!("{code}\t{name}");
                }
            }
            ListCommands::Formats => {
                println!("text\tthe processed text as it is");
                println!("json\tJSON array of documents with metadata");
            }
        }
    }
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` takes precedence over the flags.
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    // a second initialisation in the same process keeps the first logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_commands_run() {
        ListCommands::Languages.execute();
        ListCommands::Formats.execute();
    }

    #[test]
    fn test_logging_can_be_initialised_twice() {
        init_logging(2, false);
        init_logging(0, true);
    }
}
