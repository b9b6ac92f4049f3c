//! Source tree scanning.
//!
//! Walks the source directory in a deterministic order and classifies every
//! file as a page, an include or an asset.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use homepage_core::{SourceKind, SourcePath};
use thiserror::Error;
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Source scanning errors.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory traversal failed.
    #[error("cannot scan {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A file could not be inspected.
    #[error("cannot read metadata of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walked path does not live under the source root.
    #[error("path outside the source tree: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for scanning.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Classified content of a source tree.
#[derive(Debug, Clone, Default)]
pub struct SourceTree {
    /// Root of the tree.
    pub root: PathBuf,

    /// Pages, sorted by relative path.
    pub pages: Vec<SourcePath>,

    /// Includes, sorted by relative path.
    pub includes: Vec<SourcePath>,

    /// Assets, sorted by relative path.
    pub assets: Vec<SourcePath>,

    /// Newest modification time over every scanned file.
    pub newest_mtime: Option<DateTime<Utc>>,
}

/// Two source files claiming the same output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputClash {
    pub output: PathBuf,
    pub first: PathBuf,
    pub second: PathBuf,
}

/// Version control and editor droppings that never belong to the site.
///
/// Every other dot-file (e.g. `.htaccess`) is a regular asset.
pub const IGNORED_NAMES: &[&str] = &[".git", ".svn", ".hg", ".bzr", ".DS_Store", "Thumbs.db"];

fn is_ignored(name: &str) -> bool {
    IGNORED_NAMES.contains(&name) || name.ends_with('~') || name.ends_with(".swp")
}

impl SourceTree {
    /// Scan a source directory.
    ///
    /// Symbolic links are followed, so a linked file is deployed with the
    /// content of its target. Entries listed in [`IGNORED_NAMES`] and editor
    /// backups are skipped.
    pub fn scan(root: &Path) -> Result<Self> {
        info!(root = %root.display(), "scanning source tree");

        let mut tree = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                if is_ignored(&entry.file_name().to_string_lossy()) {
                    trace!(path = %entry.path().display(), "skipping ignored entry");
                    return false;
                }
                true
            });

        for entry in walker {
            let entry = entry.map_err(|source| ScanError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path
                .strip_prefix(root)
                .map_err(|_| ScanError::InvalidPath(path.to_path_buf()))?;

            let modified = entry
                .metadata()
                .map_err(|source| ScanError::Walk {
                    path: path.to_path_buf(),
                    source,
                })?
                .modified()
                .map_err(|source| ScanError::Metadata {
                    path: path.to_path_buf(),
                    source,
                })?;
            let modified = DateTime::<Utc>::from(modified);
            tree.newest_mtime = Some(tree.newest_mtime.map_or(modified, |t| t.max(modified)));

            let source = SourcePath::classify(relative);
            debug!(path = %relative.display(), kind = ?source.kind, "found source file");
            match source.kind {
                SourceKind::Page(_) => tree.pages.push(source),
                SourceKind::Include => tree.includes.push(source),
                SourceKind::Asset => tree.assets.push(source),
            }
        }

        info!(
            pages = tree.pages.len(),
            includes = tree.includes.len(),
            assets = tree.assets.len(),
            "source tree scanned"
        );
        Ok(tree)
    }

    /// Find the page rendered to the given output target, e.g. `cv.html`.
    pub fn page_for(&self, target: &str) -> Option<&SourcePath> {
        self.pages
            .iter()
            .find(|page| page.target().as_deref() == Some(target))
    }

    /// Whether the tree holds an asset at the given relative path.
    pub fn has_asset(&self, relative: &str) -> bool {
        self.assets
            .iter()
            .any(|asset| asset.target().as_deref() == Some(relative))
    }

    /// Whether the tree holds an include at the given relative path.
    pub fn has_include(&self, relative: &str) -> bool {
        let relative = Path::new(relative);
        self.includes.iter().any(|include| include.relative == relative)
    }

    /// First pair of files mapping to the same output path, if any.
    pub fn output_clash(&self) -> Option<OutputClash> {
        let mut seen: BTreeMap<PathBuf, &Path> = BTreeMap::new();
        for source in self.pages.iter().chain(&self.assets) {
            let Some(output) = source.output_path() else {
                continue;
            };
            if let Some(first) = seen.get(&output) {
                return Some(OutputClash {
                    output,
                    first: first.to_path_buf(),
                    second: source.relative.clone(),
                });
            }
            seen.insert(output, &source.relative);
        }
        None
    }
}
