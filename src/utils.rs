// ABOUTME: Utility functions for the deckgen application
// ABOUTME: Provides path validation, directory handling and filename sanitising

use crate::errors::{DeckError, Result};
use log::warn;
use std::path::Path;

/// Longest file stem produced by `sanitize_filename`
const MAX_STEM_LEN: usize = 80;

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(DeckError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Validate that a directory exists
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(DeckError::ValidationError(format!(
            "Path is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(DeckError::FileReadError)?;
    } else if !path.is_dir() {
        return Err(DeckError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Validate write permissions for a directory
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    ensure_directory_exists(path)?;

    let test_file = path.join(format!("test_write_{}.tmp", uuid::Uuid::new_v4()));
    match std::fs::File::create(&test_file) {
        Ok(_) => {
            if let Err(e) = std::fs::remove_file(&test_file) {
                warn!("Failed to clean up test file {:?}: {}", test_file, e);
            }
            Ok(())
        }
        Err(e) => Err(DeckError::ValidationError(format!(
            "Directory is not writable: {:?} - {}",
            path, e
        ))),
    }
}

/// Turn arbitrary title text into a safe file stem.
///
/// Keeps ASCII alphanumerics, `-` and `_`, collapses whitespace runs into a
/// single `_` and drops everything else. Empty results fall back to
/// `presentation`.
pub fn sanitize_filename(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut pending_gap = false;

    for c in title.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            if pending_gap && !stem.is_empty() {
                stem.push('_');
            }
            pending_gap = false;
            stem.push(c);
        } else if c.is_whitespace() {
            pending_gap = true;
        }
    }

    let stem: String = stem.chars().take(MAX_STEM_LEN).collect();
    let stem = stem.trim_matches(|c| c == '_' || c == '-').to_string();
    if stem.is_empty() {
        "presentation".to_string()
    } else {
        stem
    }
}

/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
