//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use respin_core::RewriteMetadata;
use serde::Serialize;
use std::io::Write;

/// JSON formatter - outputs documents as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    include_metadata: bool,
    pretty: bool,
    documents: Vec<DocumentData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct DocumentData {
    /// Input file, or `<stdin>`
    pub source: String,
    /// Processed text
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RewriteMetadata>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, include_metadata: bool, pretty: bool) -> Self {
        Self {
            writer,
            include_metadata,
            pretty,
            documents: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_document(&mut self, source: &str, text: &str, metadata: Option<&RewriteMetadata>) -> Result<()> {
        self.documents.push(DocumentData {
            source: source.to_string(),
            text: text.to_string(),
            metadata: metadata.filter(|_| self.include_metadata).cloned(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.documents)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.documents)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn metadata() -> RewriteMetadata {
        RewriteMetadata {
            language: "en".to_string(),
            words_in: 3,
            words_out: 3,
            versions: 0,
            duration: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_documents_with_metadata() {
        let mut out = Vec::new();
        let mut formatter = JsonFormatter::new(&mut out, true, false);
        formatter.format_document("<stdin>", "The fast fox.", Some(&metadata())).unwrap();
        formatter.finish().unwrap();
        drop(formatter);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["source"], "<stdin>");
        assert_eq!(value[0]["text"], "The fast fox.");
        assert_eq!(value[0]["metadata"]["words_in"], 3);
        assert_eq!(value[0]["metadata"]["duration"], 12);
    }

    #[test]
    fn test_metadata_can_be_left_out() {
        let mut out = Vec::new();
        let mut formatter = JsonFormatter::new(&mut out, false, true);
        formatter.format_document("a.txt", "One.", Some(&metadata())).unwrap();
        formatter.format_document("b.txt", "Two.", None).unwrap();
        formatter.finish().unwrap();
        drop(formatter);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert!(value[0].get("metadata").is_none());
    }
}
