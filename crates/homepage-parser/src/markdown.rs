//! Markdown parser using pulldown-cmark.

use std::{collections::HashMap, path::Path};

use homepage_core::{content::ParsedContent, frontmatter::parse_frontmatter};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use thiserror::Error;

use crate::syntax::SyntaxHighlighter;

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to parse frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] homepage_core::error::CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// Markdown parser with syntax highlighting support.
#[derive(Debug)]
pub struct MarkdownParser {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new(SyntaxHighlighter::default())
    }
}

impl MarkdownParser {
    /// Create a parser using the given highlighter for code blocks.
    pub fn new(highlighter: SyntaxHighlighter) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter,
            options,
        }
    }

    /// Parse markdown content with frontmatter.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        Ok(ParsedContent {
            frontmatter,
            html: self.render(&body),
        })
    }

    /// Render a markdown body to HTML.
    ///
    /// Fenced code blocks go through the highlighter and headings without an
    /// explicit `{#id}` get a unique slug id.
    pub fn render(&self, body: &str) -> String {
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut heading: Option<(usize, String)> = None;
        let mut seen_ids: HashMap<String, usize> = HashMap::new();

        for event in Parser::new_ext(body, self.options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlighter.highlight(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(Tag::Heading { .. }) => {
                    heading = Some((events.len(), String::new()));
                    events.push(event);
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((start, text)) = heading.take() {
                        let slug = unique_slug(&slugify(&text), &mut seen_ids);
                        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start]
                            && id.is_none()
                        {
                            *id = Some(CowStr::from(slug));
                        }
                    }
                    events.push(event);
                }
                ev @ (Event::Text(_) | Event::Code(_)) if heading.is_some() => {
                    if let (Some((_, buffer)), Event::Text(text) | Event::Code(text)) =
                        (heading.as_mut(), &ev)
                    {
                        buffer.push_str(text);
                    }
                    events.push(ev);
                }
                other => events.push(other),
            }
        }

        let mut output = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output.trim_end().to_string()
    }
}

/// Convert text to a URL-safe slug.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Disambiguate repeated slugs as `slug`, `slug-1`, `slug-2`...
fn unique_slug(slug: &str, seen: &mut HashMap<String, usize>) -> String {
    let base = if slug.is_empty() { "section" } else { slug };
    let count = seen.entry(base.to_string()).or_insert(0);
    let unique = if *count == 0 {
        base.to_string()
    } else {
        format!("{base}-{count}")
    };
    *count += 1;
    unique
}
