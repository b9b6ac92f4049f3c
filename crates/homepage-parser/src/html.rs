//! HTML fragment parser.
//!
//! Fragments carry the page body only; the template supplies the document
//! around it. An optional frontmatter block is stripped, the rest is kept
//! verbatim.

use std::path::Path;

use homepage_core::{content::ParsedContent, frontmatter::parse_frontmatter};
use thiserror::Error;

/// HTML fragment errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Failed to parse frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] homepage_core::error::CoreError),
}

/// Result type for HTML fragment operations.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Parser for hand-written HTML fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFragmentParser;

impl HtmlFragmentParser {
    /// Create a new fragment parser.
    pub fn new() -> Self {
        Self
    }

    /// Split off the frontmatter and keep the body as is, minus surrounding
    /// blank lines.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        Ok(ParsedContent {
            frontmatter,
            html: trim_blank_lines(&body).to_string(),
        })
    }
}

/// Drop leading and trailing blank lines, keeping the indentation of the
/// first non-blank one.
fn trim_blank_lines(body: &str) -> &str {
    let start: usize = body
        .split_inclusive('\n')
        .take_while(|line| line.trim().is_empty())
        .map(str::len)
        .sum();
    body[start..].trim_end()
}
