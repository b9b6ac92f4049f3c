//! Frontmatter parsing for page sources.
//!
//! Both Markdown pages and HTML fragments may start with a metadata block,
//! either YAML between `---` lines or TOML between `+++` lines. Pages
//! without one are perfectly valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Page metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title, used when neither the menu nor `[[pages]]` names the page.
    #[serde(default)]
    pub title: Option<String>,

    /// Overrides the site description meta tag for this page.
    #[serde(default)]
    pub description: Option<String>,

    /// Extra keywords appended to the site keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }

    fn detect(first_line: &str) -> Option<Self> {
        match first_line.trim_end() {
            "---" => Some(Self::Yaml),
            "+++" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Split content into frontmatter and body.
///
/// The opening delimiter must be the first line and the closing delimiter
/// must sit on a line of its own.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (first_line, rest) = content.split_once('\n')?;
    let format = FrontmatterFormat::detect(first_line)?;
    let delimiter = format.delimiter();

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\r', '\n']);
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter from a page source, returning metadata and body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    if fm_str.trim().is_empty() {
        return Ok((Frontmatter::default(), body.to_string()));
    }

    let frontmatter: Frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    Ok((frontmatter, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = "---\ntitle: \"Links\"\n---\n\n<p>Body</p>\n";

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert_eq!(fm, "title: \"Links\"\n");
        assert_eq!(body, "<p>Body</p>\n");
    }

    #[test]
    fn test_split_toml_frontmatter() {
        let content = "+++\ntitle = \"Links\"\n+++\nBody";

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert!(fm.contains("title ="));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_delimiter_must_be_on_its_own_line() {
        let content = "---\ntitle: a---b\n";
        assert!(split_frontmatter(content).is_none());
    }

    #[test]
    fn test_horizontal_rule_is_not_frontmatter() {
        let content = "Some text\n\n---\n\nMore text";
        assert!(split_frontmatter(content).is_none());
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "Curriculum vitae"
description: "My CV"
keywords:
  - cv
  - career
---

Content here."#;

        let (fm, body) = parse_frontmatter(content, Path::new("cv.md")).expect("parse");

        assert_eq!(fm.title.as_deref(), Some("Curriculum vitae"));
        assert_eq!(fm.description.as_deref(), Some("My CV"));
        assert_eq!(fm.keywords, vec!["cv", "career"]);
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = "+++\ntitle = \"Teaching\"\nyear = 2019\n+++\n\n<p>Lectures</p>";

        let (fm, body) = parse_frontmatter(content, Path::new("teaching.html")).expect("parse");

        assert_eq!(fm.title.as_deref(), Some("Teaching"));
        assert!(fm.description.is_none());
        assert_eq!(body, "<p>Lectures</p>");
    }

    #[test]
    fn test_no_frontmatter_keeps_content_verbatim() {
        let content = "<p>Plain fragment</p>\n";
        let (fm, body) = parse_frontmatter(content, Path::new("misc.html")).expect("parse");

        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = parse_frontmatter("---\n---\nBody", Path::new("a.md")).expect("parse");
        assert!(fm.title.is_none());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_invalid_frontmatter_reports_path() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let err = parse_frontmatter(content, Path::new("broken.md")).unwrap_err();
        assert!(err.to_string().contains("broken.md"));
    }
}
