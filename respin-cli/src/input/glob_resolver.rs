//! File pattern resolution using glob

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use std::path::PathBuf;

/// Resolve file patterns to actual file paths
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob(pattern).map_err(|_| CliError::InvalidPattern(pattern.clone()))?;

        for path_result in paths {
            let path = path_result.with_context(|| format!("Error resolving pattern: {pattern}"))?;

            if path.is_file() {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        return Err(CliError::FileNotFound(patterns.join(", ")).into());
    }

    // Remove duplicates and sort
    files.sort();
    files.dedup();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_overlapping_patterns_are_deduplicated() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("article.txt");
        fs::write(&file, "Text.").unwrap();

        let patterns = vec![
            file.display().to_string(),
            dir.path().join("*.txt").display().to_string(),
        ];
        assert_eq!(resolve_patterns(&patterns).unwrap(), vec![file]);
    }

    #[test]
    fn test_no_match_and_bad_pattern() {
        let error = resolve_patterns(&["/nonexistent/*.txt".to_string()]).unwrap_err();
        assert!(matches!(error.downcast_ref::<CliError>(), Some(CliError::FileNotFound(_))));

        let error = resolve_patterns(&["[invalid".to_string()]).unwrap_err();
        assert!(matches!(error.downcast_ref::<CliError>(), Some(CliError::InvalidPattern(_))));
    }
}
