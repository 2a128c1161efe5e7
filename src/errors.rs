// ABOUTME: Error types for the deckgen application
// ABOUTME: Provides structured error handling for each stage of the outline-to-deck pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to reach content generator: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Malformed outline at line {line_number}: content before any slide header: {line:?}")]
    MalformedOutline { line_number: usize, line: String },

    #[error("Outline produced no slides")]
    EmptyOutline,

    #[error("Failed to write presentation: {0}")]
    SerializationFailure(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Content generation error: {0}")]
    GenerationError(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our DeckError
impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

// Zip failures only happen while serializing a deck
impl From<zip::result::ZipError> for DeckError {
    fn from(err: zip::result::ZipError) -> Self {
        DeckError::SerializationFailure(format!("ZIP operation failed: {}", err))
    }
}

impl From<std::fmt::Error> for DeckError {
    fn from(err: std::fmt::Error) -> Self {
        DeckError::SerializationFailure(format!("XML formatting failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
