//! Input handling module

pub mod file_reader;
pub mod glob_resolver;

pub use file_reader::FileReader;
pub use glob_resolver::resolve_patterns;

use anyhow::Result;

/// One article to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File path, or `<stdin>`
    pub name: String,
    pub text: String,
}

/// Name used for text read from standard input
pub const STDIN_NAME: &str = "<stdin>";

/// Read the documents named by `patterns`; no pattern or `-` reads stdin
pub fn read_documents(patterns: &[String]) -> Result<Vec<Document>> {
    if patterns.is_empty() || patterns.iter().all(|p| p == "-") {
        return Ok(vec![Document {
            name: STDIN_NAME.to_string(),
            text: FileReader::read_stdin()?,
        }]);
    }

    let files = resolve_patterns(patterns)?;
    log::info!("processing {} file(s)", files.len());
    files
        .into_iter()
        .map(|path| {
            Ok(Document {
                text: FileReader::read_text(&path)?,
                name: path.display().to_string(),
            })
        })
        .collect()
}
