//! Page template with `{{ variable }}` interpolation.
//!
//! A deliberately small engine: plain substitution, `{{ name? }}` for
//! optional variables, no loops and no conditionals. Substituted values are
//! never expanded again.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("template '{template}': missing required variable '{name}'")]
    MissingVariable { template: String, name: String },

    /// Invalid template syntax.
    #[error("template '{template}': {message}")]
    InvalidSyntax { template: String, message: String },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Variable name.
    pub name: String,
    /// Whether the placeholder was written `{{ name? }}`.
    pub optional: bool,
}

/// A named template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The built-in page template.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new("built-in", DEFAULT_PAGE_TEMPLATE)
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List the placeholders in order of appearance.
    pub fn placeholders(&self) -> Result<Vec<Placeholder>> {
        let mut found = Vec::new();
        let mut rest = self.content.as_str();
        while let Some(start) = rest.find("{{") {
            let end = rest[start..].find("}}").ok_or_else(|| self.unclosed())?;
            let (name, optional) = split_optional(rest[start + 2..start + end].trim());
            found.push(Placeholder {
                name: name.to_string(),
                optional,
            });
            rest = &rest[start + end + 2..];
        }
        Ok(found)
    }

    /// Render the template with the given context.
    ///
    /// Replaces all `{{ variable }}` placeholders with values from context.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = self.content.clone();
        let mut pos = 0;

        while let Some(start) = result[pos..].find("{{") {
            let start = pos + start;
            let end = result[start..].find("}}").ok_or_else(|| self.unclosed())?;
            let end = start + end + 2;

            let (var_name, optional) = split_optional(result[start + 2..end - 2].trim());

            let value = match context.get(var_name) {
                Some(v) => v.to_string(),
                None if optional => String::new(),
                None => {
                    return Err(TemplateError::MissingVariable {
                        template: self.name.clone(),
                        name: var_name.to_string(),
                    });
                }
            };

            result.replace_range(start..end, &value);
            pos = start + value.len();
        }

        Ok(result)
    }

    fn unclosed(&self) -> TemplateError {
        TemplateError::InvalidSyntax {
            template: self.name.clone(),
            message: "unclosed {{ delimiter".to_string(),
        }
    }
}

fn split_optional(name: &str) -> (&str, bool) {
    match name.strip_suffix('?') {
        Some(stripped) => (stripped.trim_end(), true),
        None => (name, false),
    }
}

/// Variables every page context provides.
pub const PAGE_VARIABLES: &[&str] = &[
    "title",
    "base_title",
    "header",
    "author",
    "description",
    "keywords",
    "stylesheets",
    "menu",
    "content",
    "root",
    "copyright_start",
    "copyright_end",
    "last_update",
];

/// Built-in page template, used when the source tree has no template include.
///
/// The menu and the content are substituted pre-indented, so their
/// placeholders sit at the start of the line.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">

  <head>
    <meta charset="utf-8">
    <title>{{ base_title }} :: {{ title }}</title>
    <meta name="keywords" content="{{ keywords }}">
    <meta name="description" content="{{ description }}">
    <meta name="author" content="{{ author }}">
{{ stylesheets }}
  </head>

  <body>
    <div id="header">
      <h1>{{ header }}</h1>
    </div>

    <div id="container">
      <div id="menu">
{{ menu }}
      </div>
      <div id="contents">
        <h2>{{ title }}</h2>
{{ content }}
      </div>
    </div>

    <div id="footer">
      Copyright &copy; {{ copyright_start }}&ndash;{{ copyright_end }} {{ author }}.<br>
      Last update on {{ last_update }}.
    </div>
  </body>
</html>
"#;
