//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Invalid file pattern
    InvalidPattern(String),
    /// Configuration error
    ConfigError(String),
    /// Rewrite refused by the engine, with its numeric error code
    RewriteFailed { code: i32, message: String },
    /// A resource file failed validation
    InvalidResource { path: String, errors: usize },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::RewriteFailed { code, message } => {
                write!(f, "Rewrite failed (error {code}): {message}")
            }
            CliError::InvalidResource { path, errors } => {
                write!(f, "{path} has {errors} invalid line(s)")
            }
        }
    }
}

impl std::error::Error for CliError {}

impl From<respin_core::Error> for CliError {
    fn from(error: respin_core::Error) -> Self {
        CliError::RewriteFailed {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CliError::FileNotFound("article.txt".to_string()).to_string(),
            "File not found: article.txt"
        );
        assert_eq!(
            CliError::InvalidPattern("[invalid".to_string()).to_string(),
            "Invalid file pattern: [invalid"
        );
        assert_eq!(
            CliError::ConfigError("bad level".to_string()).to_string(),
            "Configuration error: bad level"
        );
        assert_eq!(
            CliError::InvalidResource {
                path: "english.rules".to_string(),
                errors: 2
            }
            .to_string(),
            "english.rules has 2 invalid line(s)"
        );
    }

    #[test]
    fn test_core_errors_keep_their_code() {
        let error = CliError::from(respin_core::Error::EmptyInput);
        assert_eq!(
            error.to_string(),
            "Rewrite failed (error 0): There are no words in your article!"
        );
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn test_cli_result_wraps_cli_errors() {
        let failure: CliResult<()> = Err(CliError::FileNotFound("x".to_string()).into());
        let error = failure.unwrap_err();
        assert!(error.downcast_ref::<CliError>().is_some());
    }
}
