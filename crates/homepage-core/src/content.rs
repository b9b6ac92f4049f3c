//! Source tree entries and the pages built from them.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, Hook},
    frontmatter::Frontmatter,
};

/// Type of page source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown content (.md files).
    Markdown,
    /// HTML fragment (.html files), inserted verbatim.
    Html,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// How a source file takes part in the deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Rendered through the page template.
    Page(ContentType),
    /// Consumed while rendering, never emitted.
    Include,
    /// Copied byte for byte.
    Asset,
}

/// A file of the source tree, keyed by its path relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePath {
    /// Path relative to the source root.
    pub relative: PathBuf,

    /// Classification of the file.
    pub kind: SourceKind,
}

impl SourcePath {
    /// Classify a path relative to the source root.
    ///
    /// - `_template.html`, `_data/talks.toml` → include (any `_` component)
    /// - `index.md`, `teaching/index.html` → page
    /// - `css/default.css`, `images/me.png` → asset
    pub fn classify(relative: &Path) -> Self {
        let is_include = relative.components().any(|c| match c {
            Component::Normal(name) => name.to_string_lossy().starts_with('_'),
            _ => false,
        });

        let kind = if is_include {
            SourceKind::Include
        } else if let Some(content_type) = relative
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ContentType::from_extension)
        {
            SourceKind::Page(content_type)
        } else {
            SourceKind::Asset
        };

        Self {
            relative: relative.to_path_buf(),
            kind,
        }
    }

    /// Path of the corresponding file in the output tree.
    ///
    /// Includes have no output and return `None`.
    pub fn output_path(&self) -> Option<PathBuf> {
        match self.kind {
            SourceKind::Page(_) => Some(self.relative.with_extension("html")),
            SourceKind::Asset => Some(self.relative.clone()),
            SourceKind::Include => None,
        }
    }

    /// Output path as a `/`-separated link target, e.g. `teaching/index.html`.
    pub fn target(&self) -> Option<String> {
        self.output_path().map(|path| to_slash(&path))
    }

    /// Number of directories between the source root and this file.
    pub fn depth(&self) -> usize {
        self.relative.components().count().saturating_sub(1)
    }

    /// Relative prefix leading from this file back to the site root.
    pub fn root_prefix(&self) -> String {
        "../".repeat(self.depth())
    }
}

/// Join path components with `/` whatever the platform separator.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Parsed page source with metadata and rendered body HTML.
#[derive(Debug, Clone)]
pub struct ParsedContent {
    /// Parsed frontmatter metadata.
    pub frontmatter: Frontmatter,

    /// Body HTML, before templating.
    pub html: String,
}

/// A page ready for templating.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Output path as a link target, e.g. `cv.html`.
    pub target: String,

    /// Page title.
    pub title: String,

    /// Page-specific description, if any.
    pub description: Option<String>,

    /// Page-specific keywords.
    pub keywords: Vec<String>,

    /// Body HTML.
    pub content: String,

    /// Generated content to append, if any.
    pub hook: Option<Hook>,

    /// Relative prefix back to the site root.
    pub root: String,

    /// Source file, relative to the source root.
    pub source_path: PathBuf,
}

impl Page {
    /// Build a page from its parsed source.
    ///
    /// The title comes from the menu, then `[[pages]]`, then the frontmatter,
    /// then the file stem.
    pub fn from_parsed(content: ParsedContent, source: &SourcePath, config: &Config) -> Self {
        let target = source
            .target()
            .unwrap_or_else(|| to_slash(&source.relative));

        let title = config
            .title_for(&target)
            .map(str::to_string)
            .or_else(|| content.frontmatter.title.clone())
            .unwrap_or_else(|| {
                source
                    .relative
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

        Self {
            hook: config.hook_for(&target),
            target,
            title,
            description: content.frontmatter.description,
            keywords: content.frontmatter.keywords,
            content: content.html,
            root: source.root_prefix(),
            source_path: source.relative.clone(),
        }
    }
}
