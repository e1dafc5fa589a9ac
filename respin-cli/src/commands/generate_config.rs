//! Generate config command implementation

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "respin.toml")]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        let template = format!(
            "# respin configuration\n#\n# Levels: word quality 5 best .. 1 all, phrase quality 6 follows the\n# word quality, POS match 3 full .. 0 off, instant unique 2 lookalike\n# letters, 1 with accented letters, 0 off.\n\n{}",
            CliConfig::default().to_toml()?
        );
        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration written to {}", self.output.display());
        println!("  Use it with: respin rewrite --config {}", self.output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("respin.toml");
        GenerateConfigArgs { output: path.clone() }.execute().unwrap();

        let config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config, CliConfig::default());
    }
}
