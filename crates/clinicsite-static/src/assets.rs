//! Static asset copying.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Errors that can occur while copying assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to copy {path}: {message}")]
    CopyError { path: String, message: String },
}

/// Copies files and directories from a brand source folder into the output.
#[derive(Debug, Clone)]
pub struct AssetCopier {
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl AssetCopier {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Check that a source file exists without copying it.
    pub fn check_file(&self, relative: &str) -> Result<(), AssetError> {
        let source = self.source_dir.join(relative);
        if !source.is_file() {
            return Err(AssetError::NotFound(source.display().to_string()));
        }
        Ok(())
    }

    /// Check that a source directory exists without copying it.
    pub fn check_dir(&self, relative: &str) -> Result<(), AssetError> {
        let source = self.source_dir.join(relative);
        if !source.is_dir() {
            return Err(AssetError::NotFound(source.display().to_string()));
        }
        Ok(())
    }

    /// Copy one file to the same relative path in the output, overwriting it.
    pub fn copy_file(&self, relative: &str) -> Result<(), AssetError> {
        self.check_file(relative)?;
        copy(
            &self.source_dir.join(relative),
            &self.output_dir.join(relative),
        )
    }

    /// Copy a directory tree, overwriting existing files. Returns the file count.
    pub fn copy_dir(&self, relative: &str) -> Result<usize, AssetError> {
        self.check_dir(relative)?;
        let source = self.source_dir.join(relative);

        let dest_root = self.output_dir.join(relative);
        let mut count = 0;

        for entry in WalkDir::new(&source).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| AssetError::CopyError {
                path: source.display().to_string(),
                message: e.to_string(),
            })?;

            let path = entry.path();
            let rel = path.strip_prefix(&source).unwrap_or(path);
            let dest = dest_root.join(rel);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest).map_err(|e| copy_error(&dest, e))?;
            } else {
                copy(path, &dest)?;
                count += 1;
            }
        }

        Ok(count)
    }
}

fn copy(source: &Path, dest: &Path) -> Result<(), AssetError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| copy_error(parent, e))?;
    }
    fs::copy(source, dest).map_err(|e| copy_error(source, e))?;
    Ok(())
}

fn copy_error(path: &Path, e: std::io::Error) -> AssetError {
    AssetError::CopyError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_single_file() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("brand");
        let out = temp.path().join("dist");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("style.css"), "body { margin: 0 }").unwrap();

        AssetCopier::new(&src, &out).copy_file("style.css").unwrap();

        assert_eq!(
            fs::read_to_string(out.join("style.css")).unwrap(),
            "body { margin: 0 }"
        );
    }

    #[test]
    fn copies_directory_recursively_and_overwrites() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("brand");
        let out = temp.path().join("dist");
        fs::create_dir_all(src.join("images/icons")).unwrap();
        fs::write(src.join("images/logo.png"), [1u8, 2, 3]).unwrap();
        fs::write(src.join("images/icons/phone.svg"), "<svg/>").unwrap();
        fs::create_dir_all(out.join("images")).unwrap();
        fs::write(out.join("images/logo.png"), "stale").unwrap();

        let count = AssetCopier::new(&src, &out).copy_dir("images").unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read(out.join("images/logo.png")).unwrap(), vec![1u8, 2, 3]);
        assert_eq!(
            fs::read_to_string(out.join("images/icons/phone.svg")).unwrap(),
            "<svg/>"
        );
    }

    #[test]
    fn missing_asset_is_reported() {
        let temp = tempdir().unwrap();
        let copier = AssetCopier::new(temp.path(), temp.path().join("dist"));

        assert!(matches!(
            copier.copy_file("script.js"),
            Err(AssetError::NotFound(_))
        ));
        assert!(matches!(
            copier.copy_dir("images"),
            Err(AssetError::NotFound(_))
        ));
        assert!(copier.check_file("script.js").is_err());
        assert!(copier.check_dir("images").is_err());
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn checks_do_not_confuse_files_and_directories() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("images")).unwrap();
        fs::write(temp.path().join("style.css"), "").unwrap();
        let copier = AssetCopier::new(temp.path(), temp.path().join("dist"));

        assert!(copier.check_file("style.css").is_ok());
        assert!(copier.check_dir("images").is_ok());
        assert!(copier.check_file("images").is_err());
        assert!(copier.check_dir("style.css").is_err());
    }
}
