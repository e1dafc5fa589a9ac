use thiserror::Error;

/// Domain-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resource loading or parsing error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A line of a rules, word list, tag table or thesaurus source was malformed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The POS oracle could not process the input
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Unsupported language requested
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl DomainError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        DomainError::Parse {
            line,
            message: message.into(),
        }
    }
}
