//! Homepage Parser Library
//!
//! Page body parsers for Markdown and HTML fragments.

pub mod html;
pub mod markdown;
pub mod syntax;

use std::path::Path;

use homepage_core::content::{ContentType, ParsedContent};
pub use html::HtmlFragmentParser;
pub use markdown::MarkdownParser;
pub use syntax::SyntaxHighlighter;
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Markdown parsing error.
    #[error("markdown error: {0}")]
    Markdown(#[from] markdown::MarkdownError),

    /// HTML fragment error.
    #[error("html error: {0}")]
    Html(#[from] html::HtmlError),

    /// Syntax highlighting setup error.
    #[error(transparent)]
    Syntax(#[from] syntax::SyntaxError),

    /// Unknown file extension.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Trait for page body parsers.
pub trait ContentParser {
    /// Parse content from a string and file path.
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent>;
}

impl ContentParser for MarkdownParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        Ok(self.parse(content, path)?)
    }
}

impl ContentParser for HtmlFragmentParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        Ok(self.parse(content, path)?)
    }
}

/// Registry for content parsers with auto-detection.
#[derive(Debug, Default)]
pub struct ParserRegistry {
    markdown: MarkdownParser,
    html: HtmlFragmentParser,
}

impl ParserRegistry {
    /// Create a new parser registry with default parsers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser registry with a named syntax theme.
    pub fn with_theme(theme: &str) -> Result<Self> {
        Ok(Self {
            markdown: MarkdownParser::new(SyntaxHighlighter::new(theme)?),
            html: HtmlFragmentParser::new(),
        })
    }

    /// Parse content, auto-detecting the parser from file extension.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParserError::UnknownExtension("(none)".to_string()))?;

        match ContentType::from_extension(ext) {
            Some(ContentType::Markdown) => Ok(self.markdown.parse(content, path)?),
            Some(ContentType::Html) => Ok(self.html.parse(content, path)?),
            None => Err(ParserError::UnknownExtension(ext.to_string())),
        }
    }

    /// Get the markdown parser.
    pub fn markdown(&self) -> &MarkdownParser {
        &self.markdown
    }
}
