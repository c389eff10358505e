//! Loading a brand dataset from disk.

use std::fs;
use std::path::Path;

use crate::model::BrandDataset;

/// Errors that can occur while loading brand data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read data file {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse data file {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Location '{name}' has no URL path segment or city to derive a slug from")]
    EmptySlug { name: String },

    #[error("Location '{name}' has slug '{slug}', which is not a single directory name")]
    InvalidSlug { name: String, slug: String },
}

/// Read and parse a brand dataset.
pub fn load_dataset(path: &Path) -> Result<BrandDataset, DataError> {
    let content = fs::read_to_string(path).map_err(|e| DataError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse_dataset(&content).map_err(|e| DataError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Parse a brand dataset from JSON text.
pub fn parse_dataset(json: &str) -> Result<BrandDataset, serde_json::Error> {
    serde_json::from_str(json)
}
