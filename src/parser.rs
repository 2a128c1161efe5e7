// ABOUTME: Outline parser for the deckgen application
// ABOUTME: Converts line-oriented, LLM-authored outline text into typed slide records

use crate::errors::{DeckError, Result};
use crate::slide::{Field, Slide, PLACEHOLDER_TITLE};
use log::{debug, warn};

/// What to do with field or bullet lines that appear before any `Slide N:` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Open an implicit slide with the placeholder title and keep going.
    #[default]
    Synthesize,
    /// Fail with `DeckError::MalformedOutline`.
    Reject,
}

/// A classified outline line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Header(&'a str),
    Field(Field, &'a str),
    Bullet(&'a str),
    Other,
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        let lowered = line.to_lowercase();

        if lowered.starts_with("slide") {
            if let Some((_, rest)) = line.split_once(':') {
                return Line::Header(rest.trim());
            }
        }

        let Some(body) = line.strip_prefix('-') else {
            return Line::Other;
        };
        let body = body.trim_start();
        let lowered_body = body.to_lowercase();

        // Fields are recognised on the dash-stripped body, the same text
        // `Slide::to_outline` writes after `- `.
        for field in Field::ALL {
            if lowered_body.starts_with(field.prefix()) {
                let value = body.split_once(':').map(|(_, v)| v).unwrap_or_default();
                return Line::Field(field, value.trim());
            }
        }

        if line.starts_with("- ") {
            Line::Bullet(body.trim_end())
        } else {
            Line::Other
        }
    }
}

enum State {
    NoSlideYet,
    InSlide(Slide),
}

/// Line-by-line outline parser.
///
/// The first slide of the outline always becomes the title slide; every later
/// slide is classified from its header text. Unrecognised lines are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineParser {
    policy: RecoveryPolicy,
}

impl OutlineParser {
    pub fn new(policy: RecoveryPolicy) -> Self {
        Self { policy }
    }

    pub fn parse(&self, text: &str) -> Result<Vec<Slide>> {
        let mut slides: Vec<Slide> = Vec::new();
        let mut state = State::NoSlideYet;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let parsed = Line::classify(line);
            state = match (state, parsed) {
                (State::NoSlideYet, Line::Header(heading)) => {
                    debug!("Opening slide {} at line {}: {:?}", slides.len() + 1, idx + 1, heading);
                    State::InSlide(open_slide(slides.is_empty(), heading))
                }
                (State::InSlide(current), Line::Header(heading)) => {
                    slides.push(current);
                    debug!("Opening slide {} at line {}: {:?}", slides.len() + 1, idx + 1, heading);
                    State::InSlide(open_slide(false, heading))
                }
                (State::NoSlideYet, line_kind @ (Line::Field(..) | Line::Bullet(_))) => {
                    match self.policy {
                        RecoveryPolicy::Reject => {
                            return Err(DeckError::MalformedOutline {
                                line_number: idx + 1,
                                line: line.to_string(),
                            });
                        }
                        RecoveryPolicy::Synthesize => {
                            warn!(
                                "Line {} appears before any slide header; synthesizing a title slide",
                                idx + 1
                            );
                            let mut slide = open_slide(true, "");
                            apply(&mut slide, line_kind);
                            State::InSlide(slide)
                        }
                    }
                }
                (State::InSlide(mut current), line_kind) => {
                    apply(&mut current, line_kind);
                    State::InSlide(current)
                }
                (State::NoSlideYet, Line::Other) => State::NoSlideYet,
            };
        }

        if let State::InSlide(current) = state {
            slides.push(current);
        }

        debug!("Parsed {} slides", slides.len());
        Ok(slides)
    }
}

fn open_slide(is_first: bool, heading: &str) -> Slide {
    if is_first {
        Slide::title_slide(heading)
    } else {
        Slide::new(heading)
    }
}

fn apply(slide: &mut Slide, line: Line<'_>) {
    match line {
        Line::Field(field, value) => slide.set_field(field, value),
        Line::Bullet(bullet) => slide.push_bullet(bullet),
        Line::Header(_) | Line::Other => {}
    }
}

/// Parse with the default recovery policy.
pub fn parse(text: &str) -> Result<Vec<Slide>> {
    OutlineParser::default().parse(text)
}

/// Slides for outlines in which nothing could be recognised: a title slide
/// named after the topic, then one content slide carrying every non-blank
/// line of the raw text so nothing the generator wrote is lost.
pub fn fallback_slides(topic: &str, raw: &str) -> Vec<Slide> {
    let topic = if topic.trim().is_empty() {
        PLACEHOLDER_TITLE
    } else {
        topic
    };
    let lines: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let mut slides = vec![Slide::title_slide(topic)];
    if !lines.is_empty() {
        slides.push(Slide::new(FALLBACK_HEADING).with_bullets(lines));
    }
    slides
}

const FALLBACK_HEADING: &str = "Overview";
