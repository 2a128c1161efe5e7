// ABOUTME: Slide records for the deckgen application
// ABOUTME: Defines the typed intermediate representation produced by the outline parser

use crate::classify::classify;
use serde::Serialize;
use std::fmt;

/// Title used when a slide header carries no text
pub const PLACEHOLDER_TITLE: &str = "Untitled Slide";

/// Semantic kind of a slide, fixed when the slide is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Title,
    Normal,
    Summary,
    Timeline,
    Flow,
    Question,
    Comparison,
    Closing,
}

impl SlideKind {
    pub const ALL: [SlideKind; 8] = [
        SlideKind::Title,
        SlideKind::Normal,
        SlideKind::Summary,
        SlideKind::Timeline,
        SlideKind::Flow,
        SlideKind::Question,
        SlideKind::Comparison,
        SlideKind::Closing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlideKind::Title => "title",
            SlideKind::Normal => "normal",
            SlideKind::Summary => "summary",
            SlideKind::Timeline => "timeline",
            SlideKind::Flow => "flow",
            SlideKind::Question => "question",
            SlideKind::Comparison => "comparison",
            SlideKind::Closing => "closing",
        }
    }
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed slide.
///
/// `heading` is the text of the `Slide N:` header line and is what the kind
/// was classified from. `title` starts out equal to it and may be replaced by
/// a `- Title:` field line without reclassifying the slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    kind: SlideKind,
    heading: String,
    title: String,
    subtitle: Option<String>,
    author: Option<String>,
    date: Option<String>,
    tagline: Option<String>,
    bullets: Vec<String>,
}

impl Slide {
    /// Create a content slide from its header text, classifying it once.
    pub fn new(heading: &str) -> Self {
        Self::with_kind(classify(heading), heading)
    }

    /// Create the opening slide of a deck. Its kind is always `Title`.
    pub fn title_slide(heading: &str) -> Self {
        Self::with_kind(SlideKind::Title, heading)
    }

    fn with_kind(kind: SlideKind, heading: &str) -> Self {
        let heading = heading.trim().to_string();
        let title = if heading.is_empty() {
            PLACEHOLDER_TITLE.to_string()
        } else {
            heading.clone()
        };
        Self {
            kind,
            heading,
            title,
            subtitle: None,
            author: None,
            date: None,
            tagline: None,
            bullets: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.set_title(title);
        self
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = non_empty(subtitle);
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = non_empty(author);
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = non_empty(date);
        self
    }

    pub fn with_tagline(mut self, tagline: &str) -> Self {
        self.tagline = non_empty(tagline);
        self
    }

    pub fn with_bullet(mut self, bullet: &str) -> Self {
        self.push_bullet(bullet);
        self
    }

    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for bullet in bullets {
            self.push_bullet(bullet.as_ref());
        }
        self
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        let title = title.trim();
        self.title = if title.is_empty() {
            PLACEHOLDER_TITLE.to_string()
        } else {
            title.to_string()
        };
    }

    pub(crate) fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Title => self.set_title(value),
            Field::Subtitle => self.subtitle = non_empty(value),
            Field::Author => self.author = non_empty(value),
            Field::Date => self.date = non_empty(value),
            Field::Tagline => self.tagline = non_empty(value),
        }
    }

    pub(crate) fn push_bullet(&mut self, bullet: &str) {
        self.bullets.push(bullet.trim().to_string());
    }

    pub fn kind(&self) -> SlideKind {
        self.kind
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref()
    }

    pub fn bullets(&self) -> &[String] {
        &self.bullets
    }

    /// Write this slide back out in the outline dialect the parser accepts.
    pub fn to_outline(&self, number: usize) -> String {
        let mut out = format!("Slide {}: {}\n", number, self.heading);
        if self.title != self.heading {
            out.push_str(&format!("- Title: {}\n", self.title));
        }
        for (field, value) in [
            (Field::Subtitle, &self.subtitle),
            (Field::Author, &self.author),
            (Field::Date, &self.date),
            (Field::Tagline, &self.tagline),
        ] {
            if let Some(value) = value {
                out.push_str(&format!("- {}: {}\n", field.label(), value));
            }
        }
        for bullet in &self.bullets {
            out.push_str(&format!("- {}\n", bullet));
        }
        out
    }
}

/// Render a whole slide sequence as outline text, numbering from 1.
pub fn outline_text(slides: &[Slide]) -> String {
    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| slide.to_outline(i + 1))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Named field lines a slide may carry (`- Title: ...` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Subtitle,
    Author,
    Date,
    Tagline,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Subtitle,
        Field::Author,
        Field::Date,
        Field::Tagline,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Subtitle => "Subtitle",
            Field::Author => "Author",
            Field::Date => "Date",
            Field::Tagline => "Tagline",
        }
    }

    /// Lowercase label that opens a field line's body, e.g. `subtitle:`
    pub(crate) fn prefix(&self) -> &'static str {
        match self {
            Field::Title => "title:",
            Field::Subtitle => "subtitle:",
            Field::Author => "author:",
            Field::Date => "date:",
            Field::Tagline => "tagline:",
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
