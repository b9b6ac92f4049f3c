//! Syntax highlighting for fenced code blocks.

use homepage_core::markup::escape_html;
use syntect::{
    highlighting::{Theme, ThemeSet},
    html::highlighted_html_for_string,
    parsing::SyntaxSet,
};
use thiserror::Error;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.light";

/// Syntax highlighting errors.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// The configured theme is not bundled with syntect.
    #[error("unknown syntax theme '{name}' (available: {available})")]
    UnknownTheme { name: String, available: String },
}

/// Syntax highlighter backed by syntect's bundled syntaxes and themes.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes.remove(DEFAULT_THEME).unwrap_or_default();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }
}

impl SyntaxHighlighter {
    /// Create a highlighter with the named theme.
    pub fn new(theme: &str) -> Result<Self, SyntaxError> {
        let mut themes = ThemeSet::load_defaults().themes;
        let Some(theme) = themes.remove(theme) else {
            let mut available: Vec<_> = themes.keys().cloned().collect();
            available.sort();
            return Err(SyntaxError::UnknownTheme {
                name: theme.to_string(),
                available: available.join(", "),
            });
        };
        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Highlight a code block.
    ///
    /// Unknown languages, or a highlighting failure, fall back to an escaped
    /// `<pre><code>` block.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let Some(syntax) = lang.and_then(|l| self.syntax_set.find_syntax_by_token(l)) else {
            return plain_block(code, lang);
        };

        highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme)
            .unwrap_or_else(|_| plain_block(code, lang))
    }
}

fn plain_block(code: &str, lang: Option<&str>) -> String {
    let lang_class = lang
        .map(|l| format!(" class=\"language-{}\"", escape_html(l)))
        .unwrap_or_default();
    format!("<pre><code{lang_class}>{}</code></pre>\n", escape_html(code))
}
