// ABOUTME: Library module for the deckgen program.
// ABOUTME: Turns slide outline text into laid-out PowerPoint decks.

// Reexport modules
pub mod classify;
pub mod config;
pub mod deck;
pub mod emphasis;
pub mod errors;
pub mod extract;
pub mod generate;
pub mod images;
pub mod layout;
pub mod parser;
pub mod pipeline;
pub mod pptx;
pub mod slide;
pub mod style;
pub mod tier;
pub mod utils;

// Reexport common types and functions
pub use classify::classify;
pub use config::Config;
pub use deck::{DeckAssembler, DeckOptions, DeckOutput, NamingPolicy};
pub use emphasis::{tokenize, EmphasisRule, EmphasisRun};
pub use errors::{DeckError, Result};
pub use extract::{extract, extract_directory, limit_words};
pub use generate::{ContentGenerator, ContentRequest, GeminiGenerator, StaticGenerator};
pub use images::{EmbeddedImage, ImageLibrary};
pub use layout::{render, RenderedSlide};
pub use parser::{parse, OutlineParser, RecoveryPolicy};
pub use pipeline::{build_from_outline, DeckResponse, Pipeline};
pub use pptx::{write_pptx, PptxConfig};
pub use slide::{Field, Slide, SlideKind};
pub use tier::{Tier, TierProfile};

#[cfg(test)]
mod tests;
