//! URL list input
//!
//! Batch runs can read their URLs from a file. Plain-text lists hold one URL
//! per line; markdown files are scanned for every http(s) link.

mod markdown;
mod text;

pub use markdown::parse_markdown_urls;
pub use text::parse_text_urls;

use crate::InputError;
use std::path::Path;

/// Supported URL list formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// One URL per line, `#` comments allowed
    Text,
    /// Markdown document with inline or bare links
    Markdown,
}

impl ListFormat {
    /// Picks the format from the file extension, defaulting to plain text
    pub fn detect(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => Self::Markdown,
            _ => Self::Text,
        }
    }

    /// Extracts URLs from file content in this format
    pub fn parse(self, content: &str) -> Vec<String> {
        match self {
            Self::Text => parse_text_urls(content),
            Self::Markdown => parse_markdown_urls(content),
        }
    }
}

/// Reads a URL list file, choosing the parser from its extension
///
/// # Arguments
///
/// * `path` - Path to a `.txt` or `.md` file (other extensions read as text)
///
/// # Returns
///
/// * `Ok(Vec<String>)` - URLs in file order, duplicates kept
/// * `Err(InputError)` - The file could not be read
pub fn load_url_list(path: &Path) -> Result<Vec<String>, InputError> {
    let content = std::fs::read_to_string(path)?;
    let urls = ListFormat::detect(path).parse(&content);
    tracing::debug!("Read {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}
