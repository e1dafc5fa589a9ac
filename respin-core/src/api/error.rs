//! Error types for the API

use crate::application::ProcessingError;
use thiserror::Error;

/// Error type for API operations
#[derive(Debug, Error)]
pub enum Error {
    /// The article has no text
    #[error("There are no words in your article!")]
    EmptyInput,

    /// No thesaurus is loaded for any language
    #[error("No thesauri loaded on server. Please contact support if this problem persists.")]
    NoThesaurus,

    /// The requested language has no thesaurus
    #[error("The specified language not supported. Supported languages: {}", supported.join(","))]
    UnsupportedLanguage { supported: Vec<String> },

    /// POS matching was requested but the language has no model
    #[error("POS models not loaded on server. Please contact support if this problem persists.")]
    PosNotLoaded,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Resource or input loading error
    #[error("Load error: {0}")]
    Load(String),

    /// Anything that escaped the per-unit fault handling
    #[error("An unknown error has occurred. Please contact support if this problem persists.")]
    Unknown(String),
}

impl Error {
    /// Numeric code of the error, `-1` for all but the input errors
    pub fn code(&self) -> i32 {
        match self {
            Error::EmptyInput => 0,
            Error::NoThesaurus => 1,
            Error::UnsupportedLanguage { .. } => 2,
            Error::PosNotLoaded => 3,
            _ => -1,
        }
    }
}

impl From<ProcessingError> for Error {
    fn from(error: ProcessingError) -> Self {
        match error {
            ProcessingError::InvalidConfig { reason } => Error::Configuration(reason),
            ProcessingError::Load { reason } => Error::Load(reason),
            ProcessingError::Oracle(e) => Error::Unknown(e.to_string()),
        }
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        assert_eq!(Error::EmptyInput.code(), 0);
        assert_eq!(Error::NoThesaurus.code(), 1);
        assert_eq!(Error::PosNotLoaded.code(), 3);
        assert_eq!(Error::Unknown("boom".into()).code(), -1);

        let error = Error::UnsupportedLanguage {
            supported: vec!["de".into(), "en".into()],
        };
        assert_eq!(error.code(), 2);
        assert_eq!(
            error.to_string(),
            "The specified language not supported. Supported languages: de,en"
        );
        assert_eq!(Error::EmptyInput.to_string(), "There are no words in your article!");
    }

    #[test]
    fn test_from_processing_error() {
        let error: Error = ProcessingError::InvalidConfig {
            reason: "bad".into(),
        }
        .into();
        assert!(matches!(error, Error::Configuration(reason) if reason == "bad"));
    }
}
