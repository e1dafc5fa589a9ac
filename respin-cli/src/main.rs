//! respin command-line entry point

use clap::Parser;
use respin_cli::commands::Commands;

/// Article spinning from the command line
#[derive(Debug, Parser)]
#[command(name = "respin", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.command.execute() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
