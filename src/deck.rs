// ABOUTME: Deck assembler for the deckgen application
// ABOUTME: Sequences slide rendering, guarantees a closing slide and writes the deck file

use crate::emphasis;
use crate::errors::{DeckError, Result};
use crate::images::ImageLibrary;
use crate::layout::{self, LayoutContext, RenderedSlide};
use crate::pptx::{self, PptxConfig};
use crate::slide::{Slide, SlideKind};
use crate::tier::TierProfile;
use crate::utils;
use log::{info, warn};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DECK_EXTENSION: &str = "pptx";

/// How output files are named inside the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum NamingPolicy {
    /// `<title>.pptx`; a later deck with the same title replaces the earlier one
    Overwrite,
    /// `<title>-<YYYYMMDD-HHMMSS>-<8 hex>.pptx`
    #[default]
    Timestamped,
    /// `<title>-<uuid>.pptx`
    RequestId,
}

impl FromStr for NamingPolicy {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "overwrite" => Ok(NamingPolicy::Overwrite),
            "timestamped" => Ok(NamingPolicy::Timestamped),
            "request-id" | "requestid" => Ok(NamingPolicy::RequestId),
            other => Err(DeckError::ConfigError(format!("Unknown naming policy: {}", other))),
        }
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamingPolicy::Overwrite => "overwrite",
            NamingPolicy::Timestamped => "timestamped",
            NamingPolicy::RequestId => "request-id",
        })
    }
}

impl NamingPolicy {
    pub fn file_name(&self, title: &str) -> String {
        let stem = utils::sanitize_filename(title);
        match self {
            NamingPolicy::Overwrite => format!("{}.{}", stem, DECK_EXTENSION),
            NamingPolicy::Timestamped => {
                let id = uuid::Uuid::new_v4().simple().to_string();
                format!(
                    "{}-{}-{}.{}",
                    stem,
                    chrono::Local::now().format("%Y%m%d-%H%M%S"),
                    &id[..8],
                    DECK_EXTENSION
                )
            }
            NamingPolicy::RequestId => format!("{}-{}.{}", stem, uuid::Uuid::new_v4(), DECK_EXTENSION),
        }
    }
}

/// Everything the assembler needs besides the slides.
#[derive(Debug, Clone)]
pub struct DeckOptions {
    pub output_dir: PathBuf,
    pub naming: NamingPolicy,
    pub default_author: String,
    pub default_date: String,
    pub images: ImageLibrary,
}

impl DeckOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            naming: NamingPolicy::default(),
            default_author: crate::config::DEFAULT_AUTHOR.to_string(),
            default_date: chrono::Local::now().format("%B %-d, %Y").to_string(),
            images: ImageLibrary::new(),
        }
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_images(mut self, images: ImageLibrary) -> Self {
        self.images = images;
        self
    }

    pub fn with_defaults(mut self, author: &str, date: &str) -> Self {
        self.default_author = author.to_string();
        self.default_date = date.to_string();
        self
    }
}

/// Result of writing one deck.
#[derive(Debug, Clone)]
pub struct DeckOutput {
    pub path: PathBuf,
    /// Bullets of the first content slide, emphasis removed
    pub preview: Vec<String>,
    /// Layout used for each slide, in deck order
    pub kinds: Vec<SlideKind>,
}

impl DeckOutput {
    pub fn slide_count(&self) -> usize {
        self.kinds.len()
    }
}

pub struct DeckAssembler<'a> {
    profile: &'a TierProfile,
    options: DeckOptions,
}

impl<'a> DeckAssembler<'a> {
    pub fn new(profile: &'a TierProfile, options: DeckOptions) -> Self {
        Self { profile, options }
    }

    /// Lay out every slide in order, appending the closing slide when the
    /// outline has none. Only the first closing slide keeps the closing
    /// layout; any later one is laid out as a normal slide.
    pub fn render(&self, slides: &[Slide]) -> Result<Vec<RenderedSlide>> {
        if slides.is_empty() {
            return Err(DeckError::EmptyOutline);
        }

        let ctx = self.context();
        let mut rendered = Vec::with_capacity(slides.len() + 1);
        let mut has_closing = false;

        for (position, slide) in slides.iter().enumerate() {
            let mut page = layout::render(slide, position, &ctx);
            if page.kind == SlideKind::Closing {
                if has_closing {
                    warn!(
                        "Slide {} is a second closing slide; using the normal layout",
                        position + 1
                    );
                    let demoted = Slide::new("").with_title(slide.title()).with_bullets(slide.bullets());
                    page = layout::render(&demoted, position, &ctx);
                }
                has_closing = true;
            }
            rendered.push(page);
        }

        if !has_closing {
            info!("Outline has no closing slide; appending one");
            rendered.push(layout::render_closing_slide(&ctx));
        }

        Ok(rendered)
    }

    /// Render and write the deck, returning where it landed.
    pub fn assemble(&self, slides: &[Slide]) -> Result<DeckOutput> {
        let rendered = self.render(slides)?;

        let title = slides[0].title();
        let file_name = self.options.naming.file_name(title);
        let path = self.options.output_dir.join(file_name);

        utils::validate_directory_writable(&self.options.output_dir)?;
        if self.options.naming == NamingPolicy::Overwrite && path.exists() {
            warn!("Overwriting existing deck {:?}", path);
        }

        let config = PptxConfig {
            title: emphasis::strip_emphasis(title),
            creator: self.options.default_author.clone(),
        };
        pptx::write_pptx(&rendered, &path, &config)?;

        Ok(DeckOutput {
            path,
            preview: preview(slides),
            kinds: rendered.iter().map(|r| r.kind).collect(),
        })
    }

    fn context(&self) -> LayoutContext<'_> {
        LayoutContext {
            profile: self.profile,
            images: &self.options.images,
            default_author: &self.options.default_author,
            default_date: &self.options.default_date,
        }
    }
}

/// Bullets of the first content slide, for display to the caller.
pub fn preview(slides: &[Slide]) -> Vec<String> {
    slides
        .get(1)
        .map(|slide| {
            slide
                .bullets()
                .iter()
                .map(|b| emphasis::strip_emphasis(b).trim().to_string())
                .collect()
        })
        .unwrap_or_default()
}
