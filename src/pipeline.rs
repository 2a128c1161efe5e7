// ABOUTME: End-to-end pipeline for the deckgen application
// ABOUTME: Runs extraction, generation, parsing and assembly for one request

use crate::config::Config;
use crate::deck::{DeckAssembler, DeckOutput};
use crate::errors::Result;
use crate::extract;
use crate::generate::{ContentGenerator, ContentRequest};
use crate::parser::{self, OutlineParser};
use crate::slide::Slide;
use crate::tier::Tier;
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a caller gets back after a deck is produced.
#[derive(Debug, Clone, Serialize)]
pub struct DeckResponse {
    pub message: String,
    pub pptx_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub preview: Vec<String>,
    pub slide_count: usize,
    pub tier: Tier,
}

impl DeckResponse {
    fn from_output(output: DeckOutput, tier: Tier, warning: Option<String>) -> Self {
        Self {
            message: format!("{} presentation generated successfully!", capitalize(tier.as_str())),
            pptx_path: output.path.clone(),
            warning,
            slide_count: output.slide_count(),
            preview: output.preview,
            tier,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct Pipeline<'g> {
    config: Config,
    generator: &'g dyn ContentGenerator,
}

impl<'g> Pipeline<'g> {
    pub fn new(config: Config, generator: &'g dyn ContentGenerator) -> Self {
        Self { config, generator }
    }

    /// Produce a deck for `request`, reading extra source material from
    /// `source` when given.
    pub fn run(&self, mut request: ContentRequest, source: Option<&Path>) -> Result<DeckResponse> {
        let tier = self.config.tier;
        let profile = tier.profile();
        let mut warning = None;

        if let Some(path) = source {
            let text = extract::extract(path)?;
            let (text, cut) = extract::limit_words(&text, profile.word_limit);
            warning = cut;
            request.text = text;
        }

        let outline = self.generator.generate(tier, &request)?;
        info!("Generated outline of {} bytes", outline.len());

        let slides = slides_from(&self.config, &outline, &request.topic)?;
        let output = DeckAssembler::new(profile, self.config.get_deck_options()).assemble(&slides)?;

        info!("Wrote {} slides to {:?}", output.slide_count(), output.path);
        Ok(DeckResponse::from_output(output, tier, warning))
    }
}

/// Assemble a deck from outline text that already exists; no generator is
/// involved.
pub fn build_from_outline(config: &Config, outline: &str) -> Result<DeckResponse> {
    let tier = config.tier;
    let slides = slides_from(config, outline, "")?;
    let output = DeckAssembler::new(tier.profile(), config.get_deck_options()).assemble(&slides)?;
    Ok(DeckResponse::from_output(output, tier, None))
}

fn slides_from(config: &Config, outline: &str, topic: &str) -> Result<Vec<Slide>> {
    let slides = OutlineParser::new(config.recovery).parse(outline)?;
    if slides.is_empty() {
        warn!("Outline contained no slide headers; using fallback slides");
        return Ok(parser::fallback_slides(topic, outline));
    }
    Ok(slides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("gold"), "Gold");
        assert_eq!(capitalize(""), "");
    }
}
