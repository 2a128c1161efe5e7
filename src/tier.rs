// ABOUTME: Tier profiles for the deckgen application
// ABOUTME: Configures which slide kinds and style rules a Silver, Gold or Platinum deck uses

use crate::emphasis::EmphasisRule;
use crate::errors::{DeckError, Result};
use crate::slide::SlideKind;
use crate::style::{self, StyleTable};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Silver,
    Gold,
    #[default]
    Platinum,
}

impl Tier {
    pub fn profile(&self) -> &'static TierProfile {
        match self {
            Tier::Silver => &SILVER,
            Tier::Gold => &GOLD,
            Tier::Platinum => &PLATINUM,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            "platinum" => Ok(Tier::Platinum),
            other => Err(DeckError::ConfigError(format!("Unknown tier: {}", other))),
        }
    }
}

/// Layout richness settings shared by one tier. Parsing never depends on it.
#[derive(Debug)]
pub struct TierProfile {
    pub tier: Tier,
    /// Kinds with a dedicated layout; anything else renders as `Normal`.
    pub recognized: &'static [SlideKind],
    pub emphasis: EmphasisRule,
    /// Split `heading: detail` bullets on normal slides.
    pub split_headings: bool,
    /// Break long bullets into several paragraphs at this many characters.
    pub wrap_width: Option<usize>,
    /// Show the keyword-selected picture on the title slide.
    pub image_panel: bool,
    pub closing_headline: &'static str,
    pub closing_subline: &'static str,
    /// Words of source material passed to the content generator.
    pub word_limit: usize,
    pub style: &'static StyleTable,
}

impl TierProfile {
    pub fn recognizes(&self, kind: SlideKind) -> bool {
        self.recognized.contains(&kind)
    }

    /// Kind whose layout is used for `kind` under this tier.
    pub fn effective_kind(&self, kind: SlideKind) -> SlideKind {
        if self.recognizes(kind) {
            kind
        } else {
            SlideKind::Normal
        }
    }
}

const BASIC_KINDS: &[SlideKind] = &[SlideKind::Title, SlideKind::Normal, SlideKind::Closing];

const CLOSING_SUBLINE: &str = "We appreciate your time and attention";

pub static SILVER: TierProfile = TierProfile {
    tier: Tier::Silver,
    recognized: BASIC_KINDS,
    emphasis: EmphasisRule::Plain,
    split_headings: false,
    wrap_width: Some(80),
    image_panel: false,
    closing_headline: "Thank You",
    closing_subline: CLOSING_SUBLINE,
    word_limit: 500_000,
    style: &style::SILVER,
};

pub static GOLD: TierProfile = TierProfile {
    tier: Tier::Gold,
    recognized: BASIC_KINDS,
    emphasis: EmphasisRule::Paired,
    split_headings: true,
    wrap_width: None,
    image_panel: false,
    closing_headline: "Thank You!",
    closing_subline: CLOSING_SUBLINE,
    word_limit: 750_000,
    style: &style::GOLD,
};

pub static PLATINUM: TierProfile = TierProfile {
    tier: Tier::Platinum,
    recognized: &SlideKind::ALL,
    emphasis: EmphasisRule::Toggle,
    split_headings: true,
    wrap_width: None,
    image_panel: true,
    closing_headline: "Thank You",
    closing_subline: CLOSING_SUBLINE,
    word_limit: 750_000,
    style: &style::PLATINUM,
};
