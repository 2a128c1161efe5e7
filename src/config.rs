// ABOUTME: Configuration module for the deckgen application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::deck::{DeckOptions, NamingPolicy};
use crate::errors::{DeckError, Result};
use crate::generate::GeneratorSettings;
use crate::images::ImageLibrary;
use crate::parser::RecoveryPolicy;
use crate::tier::Tier;
use log::warn;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "Output";
pub const DEFAULT_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub tier: Tier,
    pub naming: NamingPolicy,
    pub recovery: RecoveryPolicy,
    pub default_author: String,
    /// Falls back to today's date when unset
    pub default_date: Option<String>,
    pub image_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub timeout_ms: u64,
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            tier: Tier::default(),
            naming: NamingPolicy::default(),
            recovery: RecoveryPolicy::default(),
            default_author: DEFAULT_AUTHOR.to_string(),
            default_date: None,
            image_dir: None,
            api_key: env::var("GOOGLE_API_KEY").ok(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: 0.3,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: 3,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = env::var("DECKGEN_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(tier) = env::var("DECKGEN_TIER") {
            config.tier = tier.parse()?;
        }
        if let Ok(naming) = env::var("DECKGEN_NAMING") {
            config.naming = naming.parse()?;
        }
        if let Ok(author) = env::var("DECKGEN_AUTHOR") {
            config.default_author = author;
        }
        config.default_date = env::var("DECKGEN_DATE").ok();
        config.image_dir = env::var("DECKGEN_IMAGE_DIR").ok().map(PathBuf::from);
        if let Ok(model) = env::var("DECKGEN_MODEL") {
            config.model = model;
        }
        if let Ok(endpoint) = env::var("DECKGEN_ENDPOINT") {
            config.endpoint = endpoint;
        }
        config.timeout_ms = env::var("DECKGEN_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Ok(config)
    }

    /// Date printed on title slides that carry none
    pub fn effective_date(&self) -> String {
        self.default_date
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%B %-d, %Y").to_string())
    }

    /// Keyword image table, empty when no image directory is configured
    pub fn image_library(&self) -> ImageLibrary {
        match &self.image_dir {
            Some(dir) => ImageLibrary::from_dir(dir).unwrap_or_else(|e| {
                warn!("Ignoring image directory {:?}: {}", dir, e);
                ImageLibrary::new()
            }),
            None => ImageLibrary::new(),
        }
    }

    /// Get assembler options with defaults from this config
    pub fn get_deck_options(&self) -> DeckOptions {
        DeckOptions {
            output_dir: self.output_dir.clone(),
            naming: self.naming,
            default_author: self.default_author.clone(),
            default_date: self.effective_date(),
            images: self.image_library(),
        }
    }

    /// Get generator settings, failing when no API key is available
    pub fn get_generator_settings(&self) -> Result<GeneratorSettings> {
        let api_key = self.api_key.clone().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            DeckError::ConfigError("GOOGLE_API_KEY not found. Set it in the environment".to_string())
        })?;

        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| DeckError::ConfigError(format!("Invalid endpoint {:?}: {}", self.endpoint, e)))?;

        Ok(GeneratorSettings {
            api_key,
            endpoint,
            model: self.model.clone(),
            temperature: self.temperature,
            timeout_ms: self.timeout_ms,
            max_attempts: self.max_attempts.max(1),
            author: self.default_author.clone(),
            date: self.effective_date(),
        })
    }
}
