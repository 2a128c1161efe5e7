// ABOUTME: Title image lookup for the deckgen application
// ABOUTME: Picks a decorative picture for the title slide by keyword and validates it

use crate::errors::{DeckError, Result};
use image::ImageFormat;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Image bytes ready to be embedded in a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
    /// File extension used inside the package, e.g. `png`
    pub extension: &'static str,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl EmbeddedImage {
    /// Decode `data` to make sure it is a usable picture.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&data)
            .map_err(|e| DeckError::ImageError(format!("Unrecognised image data: {}", e)))?;

        let (extension, content_type) = match format {
            ImageFormat::Png => ("png", "image/png"),
            ImageFormat::Jpeg => ("jpeg", "image/jpeg"),
            ImageFormat::Gif => ("gif", "image/gif"),
            ImageFormat::Bmp => ("bmp", "image/bmp"),
            ImageFormat::Tiff => ("tiff", "image/tiff"),
            other => {
                return Err(DeckError::ImageError(format!(
                    "Unsupported image format for slides: {:?}",
                    other
                )));
            }
        };

        let decoded = image::load_from_memory_with_format(&data, format)
            .map_err(|e| DeckError::ImageError(format!("Failed to decode image: {}", e)))?;

        Ok(Self {
            data,
            extension,
            content_type,
            width: decoded.width(),
            height: decoded.height(),
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }
        let data = fs::read(path).map_err(DeckError::FileReadError)?;
        Self::from_bytes(data)
    }
}

/// Keyword to picture table for title slides.
///
/// Keywords are matched case-insensitively against the title's words; a
/// keyword containing spaces is matched as a phrase. No match falls back to
/// the default picture, and a library without one yields nothing.
#[derive(Debug, Clone, Default)]
pub struct ImageLibrary {
    entries: Vec<(String, PathBuf)>,
    default: Option<PathBuf>,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, keyword: &str, path: impl Into<PathBuf>) -> Self {
        self.entries.push((keyword.trim().to_lowercase(), path.into()));
        self
    }

    pub fn with_default(mut self, path: impl Into<PathBuf>) -> Self {
        self.default = Some(path.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.default.is_none()
    }

    /// Build a library from a directory of pictures named after their keyword,
    /// e.g. `cricket.jpg`, `artificial intelligence.png`. A file whose stem is
    /// `default` becomes the fallback.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        crate::utils::validate_directory_exists(dir)?;
        info!("Loading title images from {:?}", dir);

        let mut library = Self::new();
        for ext in ["png", "jpg", "jpeg", "gif", "bmp"] {
            let pattern = format!("{}/*.{}", dir.to_string_lossy(), ext);
            let paths = glob::glob(&pattern)
                .map_err(|e| DeckError::ConfigError(format!("Invalid glob pattern: {}", e)))?;

            for path in paths.flatten() {
                let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_lowercase()) else {
                    continue;
                };
                if stem == "default" {
                    library.default = Some(path);
                } else {
                    library.entries.push((stem, path));
                }
            }
        }
        // glob order differs per extension; keep lookups stable
        library.entries.sort();

        debug!(
            "Image library has {} keywords, default: {:?}",
            library.entries.len(),
            library.default
        );
        Ok(library)
    }

    /// Pick the picture for a title, falling back to the default.
    pub fn select(&self, title: &str) -> Option<&Path> {
        let lowered = title.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.entries
            .iter()
            .find(|(keyword, _)| {
                if keyword.contains(' ') {
                    lowered.contains(keyword.as_str())
                } else {
                    words.contains(&keyword.as_str())
                }
            })
            .map(|(_, path)| path.as_path())
            .or(self.default.as_deref())
    }

    /// Load the picture for a title. Missing or undecodable files are logged
    /// and skipped so a bad picture never blocks a deck.
    pub fn load_for(&self, title: &str) -> Option<EmbeddedImage> {
        let path = self.select(title)?;
        match EmbeddedImage::open(path) {
            Ok(image) => {
                debug!("Selected title image {:?} for {:?}", path, title);
                Some(image)
            }
            Err(e) => {
                warn!("Skipping title image {:?}: {}", path, e);
                None
            }
        }
    }
}
