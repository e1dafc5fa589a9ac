//! Output types for the rewrite API

use serde::Serialize;
use std::time::Duration;

/// A rewritten article with metadata
#[derive(Debug, Clone, Serialize)]
pub struct RewriteOutput {
    /// Rewritten text, spintax when spintax was requested
    pub text: String,
    pub metadata: RewriteMetadata,
}

/// Metadata about one rewrite call
#[derive(Debug, Clone, Serialize)]
pub struct RewriteMetadata {
    /// Language code the article was rewritten in
    pub language: String,
    /// Legacy word count of the input
    pub words_in: usize,
    /// Legacy word count of the output
    pub words_out: usize,
    /// Number of resolved versions, 0 for a single rewrite
    pub versions: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
