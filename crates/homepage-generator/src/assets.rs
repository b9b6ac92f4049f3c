//! Asset copying.
//!
//! Assets are copied byte for byte to the same relative path in the output
//! tree.

use std::{
    fs,
    path::{Path, PathBuf},
};

use homepage_core::{SourceKind, SourcePath};
use thiserror::Error;
use tracing::{debug, info};

/// Asset processing errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Copying a file failed.
    #[error("cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating a destination directory failed.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry is not an asset.
    #[error("not an asset: {0}")]
    NotAnAsset(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Summary of a copy run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetReport {
    /// Number of files copied.
    pub files: usize,

    /// Total number of bytes copied.
    pub bytes: u64,
}

/// Copies assets from the source tree to the output tree.
#[derive(Debug)]
pub struct AssetProcessor<'a> {
    source_root: &'a Path,
    output_root: &'a Path,
}

impl<'a> AssetProcessor<'a> {
    /// Create a processor between two tree roots.
    #[must_use]
    pub fn new(source_root: &'a Path, output_root: &'a Path) -> Self {
        Self {
            source_root,
            output_root,
        }
    }

    /// Copy all the given assets.
    pub fn process(&self, assets: &[SourcePath]) -> Result<AssetReport> {
        info!(
            source = %self.source_root.display(),
            dest = %self.output_root.display(),
            count = assets.len(),
            "copying assets"
        );

        let mut report = AssetReport::default();
        for asset in assets {
            report.bytes += self.copy(asset)?;
            report.files += 1;
        }

        info!(files = report.files, bytes = report.bytes, "assets copied");
        Ok(report)
    }

    /// Copy a single asset, returning the number of bytes copied.
    fn copy(&self, asset: &SourcePath) -> Result<u64> {
        let relative = match asset.kind {
            SourceKind::Asset => &asset.relative,
            _ => return Err(AssetError::NotAnAsset(asset.relative.clone())),
        };

        let from = self.source_root.join(relative);
        let to = self.output_root.join(relative);

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|source| AssetError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let bytes = fs::copy(&from, &to).map_err(|source| AssetError::Copy {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;

        debug!(src = %from.display(), dest = %to.display(), bytes, "copied asset");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_copy_is_byte_identical() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let png: Vec<u8> = (0..=255).collect();
        fs::create_dir_all(src.path().join("images")).unwrap();
        fs::write(src.path().join("images/me.png"), &png).unwrap();
        fs::write(src.path().join("cv.pdf"), b"%PDF-1.4").unwrap();

        let assets = [
            SourcePath::classify(Path::new("cv.pdf")),
            SourcePath::classify(Path::new("images/me.png")),
        ];
        let report = AssetProcessor::new(src.path(), dest.path())
            .process(&assets)
            .unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.bytes, 256 + 8);
        assert_eq!(fs::read(dest.path().join("images/me.png")).unwrap(), png);
        assert_eq!(fs::read(dest.path().join("cv.pdf")).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_missing_asset() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let assets = [SourcePath::classify(Path::new("css/gone.css"))];
        let result = AssetProcessor::new(src.path(), dest.path()).process(&assets);

        assert!(matches!(result, Err(AssetError::Copy { .. })));
    }

    #[test]
    fn test_pages_are_rejected() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let pages = [SourcePath::classify(Path::new("index.md"))];
        let result = AssetProcessor::new(src.path(), dest.path()).process(&pages);

        assert!(matches!(result, Err(AssetError::NotAnAsset(_))));
    }
}
