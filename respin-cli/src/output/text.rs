//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use respin_core::RewriteMetadata;
use std::io::Write;

/// Plain text formatter - outputs each document's text
///
/// With headers on, every document is preceded by `==> name <==`.
pub struct TextFormatter<W: Write> {
    writer: W,
    headers: bool,
    documents: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, headers: bool) -> Self {
        Self {
            writer,
            headers,
            documents: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_document(&mut self, source: &str, text: &str, _metadata: Option<&RewriteMetadata>) -> Result<()> {
        if self.headers {
            if self.documents > 0 {
                writeln!(self.writer)?;
            }
            writeln!(self.writer, "==> {source} <==")?;
        }
        self.documents += 1;
        if text.ends_with('\n') {
            write!(self.writer, "{text}")?;
        } else {
            writeln!(self.writer, "{text}")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_document_is_written_as_is() {
        let mut out = Vec::new();
        let mut formatter = TextFormatter::new(&mut out, false);
        formatter.format_document("a.txt", "The fast fox.", None).unwrap();
        formatter.finish().unwrap();
        drop(formatter);
        assert_eq!(String::from_utf8(out).unwrap(), "The fast fox.\n");
    }

    #[test]
    fn test_headers_separate_documents() {
        let mut out = Vec::new();
        let mut formatter = TextFormatter::new(&mut out, true);
        formatter.format_document("a.txt", "One.\n", None).unwrap();
        formatter.format_document("b.txt", "Two.", None).unwrap();
        formatter.finish().unwrap();
        drop(formatter);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "==> a.txt <==\nOne.\n\n==> b.txt <==\nTwo.\n"
        );
    }
}
