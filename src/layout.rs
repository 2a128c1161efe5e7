// ABOUTME: Layout engine for the deckgen application
// ABOUTME: Maps each typed slide record to positioned, styled text and picture elements

use crate::emphasis::{self, EmphasisRun};
use crate::images::{EmbeddedImage, ImageLibrary};
use crate::slide::{Slide, SlideKind};
use crate::style::{BodyLayoutStyle, Rect, TextStyle};
use crate::tier::TierProfile;
use once_cell::sync::Lazy;
use regex::Regex;

static KEY_POINT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*key\s+point\s+\d+\s*:\s*").unwrap());
static ASPECT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*aspect\s+\d+\s*:\s*").unwrap());

const BULLET_CHAR: char = '•';
const ARROW_GLYPH: &str = "→";
const STOP_GLYPH: &str = "⏹";
const QUESTION_GLYPH: &str = "❓";
const SUMMARY_INTRO: &str = "Summary Points:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bullet {
    #[default]
    None,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub level: u32,
    pub align: Align,
    pub bullet: Bullet,
    /// Points of space after the paragraph
    pub space_after: Option<u32>,
}

impl Paragraph {
    fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            level: 0,
            align: Align::Left,
            bullet: Bullet::None,
            space_after: None,
        }
    }

    fn single(text: &str, style: TextStyle) -> Self {
        Self::new(vec![Run {
            text: text.to_string(),
            style,
        }])
    }

    fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    fn bulleted(mut self) -> Self {
        self.bullet = Bullet::Char(BULLET_CHAR);
        self
    }

    fn space_after(mut self, points: u32) -> Self {
        self.space_after = Some(points);
        self
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when every run is bold.
    pub fn is_bold(&self) -> bool {
        !self.runs.is_empty() && self.runs.iter().all(|r| r.style.bold)
    }
}

/// What a text box holds, used to name shapes and to find them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Title,
    Subtitle,
    Meta,
    Tagline,
    Body,
    Headline,
    Subline,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Title => "Title",
            Role::Subtitle => "Subtitle",
            Role::Meta => "Author and Date",
            Role::Tagline => "Tagline",
            Role::Body => "Content",
            Role::Headline => "Headline",
            Role::Subline => "Subline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox {
    pub role: Role,
    pub frame: Rect,
    pub paragraphs: Vec<Paragraph>,
    /// Shrink text to fit the frame
    pub autofit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub frame: Rect,
    pub image: EmbeddedImage,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Text(TextBox),
    Picture(Picture),
}

/// A slide after layout: everything the container writer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSlide {
    /// Layout actually used, after position and tier overrides
    pub kind: SlideKind,
    pub elements: Vec<Element>,
}

impl RenderedSlide {
    pub fn text_box(&self, role: Role) -> Option<&TextBox> {
        self.elements.iter().find_map(|e| match e {
            Element::Text(tb) if tb.role == role => Some(tb),
            _ => None,
        })
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.elements.iter().filter_map(|e| match e {
            Element::Picture(p) => Some(p),
            _ => None,
        })
    }
}

/// Inputs shared by every slide of one deck.
pub struct LayoutContext<'a> {
    pub profile: &'a TierProfile,
    pub images: &'a ImageLibrary,
    pub default_author: &'a str,
    pub default_date: &'a str,
}

type RenderFn = fn(&Slide, &LayoutContext<'_>) -> Vec<Element>;

/// Render function for each layout.
fn renderer_for(kind: SlideKind) -> RenderFn {
    match kind {
        SlideKind::Title => render_title,
        SlideKind::Normal => render_normal,
        SlideKind::Summary => render_summary,
        SlideKind::Timeline => render_timeline,
        SlideKind::Flow => render_flow,
        SlideKind::Question => render_question,
        SlideKind::Comparison => render_comparison,
        SlideKind::Closing => render_closing,
    }
}

/// Layout a slide would get at `position` under the context's tier.
///
/// Position 0 is always the title layout. A title-kind slide anywhere else
/// is laid out as a normal slide.
pub fn layout_kind(slide: &Slide, position: usize, ctx: &LayoutContext<'_>) -> SlideKind {
    match (position, slide.kind()) {
        (0, _) => SlideKind::Title,
        (_, SlideKind::Title) => SlideKind::Normal,
        (_, kind) => ctx.profile.effective_kind(kind),
    }
}

pub fn render(slide: &Slide, position: usize, ctx: &LayoutContext<'_>) -> RenderedSlide {
    let kind = layout_kind(slide, position, ctx);
    RenderedSlide {
        kind,
        elements: renderer_for(kind)(slide, ctx),
    }
}

/// The fixed closing slide, independent of any outline content.
pub fn render_closing_slide(ctx: &LayoutContext<'_>) -> RenderedSlide {
    RenderedSlide {
        kind: SlideKind::Closing,
        elements: closing_elements(ctx),
    }
}

fn text_box(role: Role, frame: Rect, paragraphs: Vec<Paragraph>) -> Element {
    Element::Text(TextBox {
        role,
        frame,
        paragraphs,
        autofit: true,
    })
}

fn runs_with(runs: Vec<EmphasisRun>, style: TextStyle) -> Vec<Run> {
    runs.into_iter()
        .map(|r| Run {
            text: r.text,
            style: style.with_bold(style.bold || r.emphasized),
        })
        .collect()
}

fn styled_runs(text: &str, style: TextStyle, ctx: &LayoutContext<'_>) -> Vec<Run> {
    runs_with(ctx.profile.emphasis.tokenize(text), style)
}

fn heading_box(layout: &BodyLayoutStyle, title: &str) -> Element {
    let text = emphasis::strip_emphasis(title);
    text_box(
        Role::Title,
        layout.heading_frame,
        vec![Paragraph::single(text.trim(), layout.heading)],
    )
}

fn render_title(slide: &Slide, ctx: &LayoutContext<'_>) -> Vec<Element> {
    let style = &ctx.profile.style.title_slide;
    let title = emphasis::strip_emphasis(slide.title());
    let mut elements = vec![text_box(
        Role::Title,
        style.title_frame,
        vec![Paragraph::single(title.trim(), style.title)],
    )];

    if let Some(subtitle) = slide.subtitle() {
        elements.push(text_box(
            Role::Subtitle,
            style.subtitle_frame,
            vec![Paragraph::new(styled_runs(subtitle, style.subtitle, ctx))],
        ));
    }

    let author = slide.author().unwrap_or(ctx.default_author);
    let date = slide.date().unwrap_or(ctx.default_date);
    elements.push(text_box(
        Role::Meta,
        style.meta_frame,
        vec![
            Paragraph::single(&format!("Author: {}", author), style.meta),
            Paragraph::single(&format!("Date: {}", date), style.meta),
        ],
    ));

    if let Some(tagline) = slide.tagline() {
        elements.push(text_box(
            Role::Tagline,
            style.tagline_frame,
            vec![Paragraph::new(styled_runs(tagline, style.tagline, ctx)).centered()],
        ));
    }

    if ctx.profile.image_panel {
        if let Some(image) = ctx.images.load_for(slide.title()) {
            elements.push(Element::Picture(Picture {
                frame: style.image_frame.fit(image.width, image.height),
                image,
                description: title.trim().to_string(),
            }));
        }
    }

    elements
}

/// Split runs at the first colon. The heading keeps the colon and is bolded
/// throughout; the detail keeps its own emphasis.
fn split_heading(runs: &[EmphasisRun]) -> Option<(Vec<EmphasisRun>, Vec<EmphasisRun>)> {
    let at = runs.iter().position(|r| r.text.contains(':'))?;
    let (before, after) = runs[at].text.split_once(':')?;

    let mut label = emphasis::plain_text(&runs[..at]);
    label.push_str(before);
    let mut heading = vec![EmphasisRun::emphasized(&format!("{}:", label.trim()))];

    let mut detail = vec![EmphasisRun {
        text: after.to_string(),
        emphasized: runs[at].emphasized,
    }];
    detail.extend_from_slice(&runs[at + 1..]);

    trim_runs(&mut heading);
    trim_runs(&mut detail);
    Some((heading, detail))
}

/// Trim outer whitespace across the run list, dropping runs left empty.
fn trim_runs(runs: &mut Vec<EmphasisRun>) {
    while let Some(first) = runs.first_mut() {
        first.text = first.text.trim_start().to_string();
        if !first.text.is_empty() {
            break;
        }
        runs.remove(0);
    }
    while let Some(last) = runs.last_mut() {
        last.text = last.text.trim_end().to_string();
        if !last.text.is_empty() {
            break;
        }
        runs.pop();
    }
}

/// Greedy word wrap into lines of at most `width` characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.chars().count() <= width {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if !current.is_empty() && needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn render_normal(slide: &Slide, ctx: &LayoutContext<'_>) -> Vec<Element> {
    let table = ctx.profile.style;
    let mut paragraphs = Vec::new();

    for bullet in slide.bullets() {
        let runs = ctx.profile.emphasis.tokenize(bullet);

        if ctx.profile.split_headings {
            if let Some((heading, detail)) = split_heading(&runs) {
                paragraphs.push(Paragraph::new(runs_with(heading, table.bullet)).bulleted());
                if !detail.is_empty() {
                    paragraphs.push(Paragraph::new(runs_with(detail, table.detail)).level(1).bulleted());
                }
                continue;
            }
        }

        match ctx.profile.wrap_width {
            Some(width) => {
                let text = emphasis::plain_text(&runs);
                for line in wrap(text.trim(), width) {
                    paragraphs.push(Paragraph::single(&line, table.bullet).bulleted());
                }
            }
            None => {
                let mut runs = runs;
                trim_runs(&mut runs);
                paragraphs.push(Paragraph::new(runs_with(runs, table.bullet)).bulleted());
            }
        }
    }

    vec![
        heading_box(&table.body, slide.title()),
        text_box(Role::Body, table.body.body_frame, paragraphs),
    ]
}

fn render_summary(slide: &Slide, ctx: &LayoutContext<'_>) -> Vec<Element> {
    let table = ctx.profile.style;
    let mut paragraphs = vec![
        Paragraph::single(SUMMARY_INTRO, table.summary_intro).space_after(table.summary_intro_space_after),
    ];

    for point in slide.bullets() {
        let plain = emphasis::strip_emphasis(point);
        let plain = KEY_POINT_PREFIX.replace(&plain, "");
        paragraphs.push(
            Paragraph::single(plain.trim(), table.bullet)
                .bulleted()
                .space_after(table.summary_point_space_after),
        );
    }

    vec![
        heading_box(&table.body, slide.title()),
        text_box(Role::Body, table.body.body_frame, paragraphs),
    ]
}

/// Bold first-line plus indented detail, or a single paragraph without a colon.
fn label_and_detail(text: &str, label: TextStyle, detail: TextStyle, plain: TextStyle) -> Vec<Paragraph> {
    match text.split_once(':') {
        Some((head, rest)) => {
            let mut out = vec![Paragraph::single(&format!("{}:", head.trim()), label).bulleted()];
            if !rest.trim().is_empty() {
                out.push(Paragraph::single(rest.trim(), detail).level(1).bulleted());
            }
            out
        }
        None => vec![Paragraph::single(text.trim(), plain).bulleted()],
    }
}

fn render_timeline(slide: &Slide, ctx: &LayoutContext<'_>) -> Vec<Element> {
    let table = ctx.profile.style;
    let paragraphs = slide
        .bullets()
        .iter()
        .flat_map(|event| {
            let plain = emphasis::strip_emphasis(event);
            label_and_detail(&plain, table.label, table.detail, table.bullet)
        })
        .collect();

    vec![
        heading_box(&table.body, slide.title()),
        text_box(Role::Body, table.body.body_frame, paragraphs),
    ]
}

fn render_comparison(slide: &Slide, ctx: &LayoutContext<'_>) -> Vec<Element> {
    let table = ctx.profile.style;
    let paragraphs = slide
        .bullets()
        .iter()
        .flat_map(|bullet| {
            let plain = emphasis::strip_emphasis(bullet);
            let plain = ASPECT_PREFIX.replace(&plain, "");
            label_and_detail(&plain, table.term, table.detail, table.term)
        })
        .collect();

    vec![
        heading_box(&table.body, slide.title()),
        text_box(Role::Body, table.body.body_frame, paragraphs),
    ]
}

fn glyph_paragraph(glyph: &str, text: &str, style: TextStyle, space_after: u32, ctx: &LayoutContext<'_>) -> Paragraph {
    let mut runs = ctx.profile.emphasis.tokenize(text.trim());
    trim_runs(&mut runs);
    let mut styled = vec![Run {
        text: format!("{} ", glyph),
        style,
    }];
    styled.extend(runs_with(runs, style));
    Paragraph::new(styled).space_after(space_after)
}

fn render_flow(slide: &Slide, ctx: &LayoutContext<'_>) -> Vec<Element> {
    let table = ctx.profile.style;
    let steps = slide.bullets();
    let paragraphs = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let glyph = if i + 1 < steps.len() { ARROW_GLYPH } else { STOP_GLYPH };
            glyph_paragraph(glyph, step, table.step, table.step_space_after, ctx)
        })
        .collect();

    vec![
        heading_box(&table.canvas, slide.title()),
        text_box(Role::Body, table.canvas.body_frame, paragraphs),
    ]
}

fn render_question(slide: &Slide, ctx: &LayoutContext<'_>) -> Vec<Element> {
    let table = ctx.profile.style;
    let paragraphs = slide
        .bullets()
        .iter()
        .map(|q| glyph_paragraph(QUESTION_GLYPH, q, table.question, table.question_space_after, ctx))
        .collect();

    vec![
        heading_box(&table.canvas, slide.title()),
        text_box(Role::Body, table.canvas.body_frame, paragraphs),
    ]
}

fn render_closing(_slide: &Slide, ctx: &LayoutContext<'_>) -> Vec<Element> {
    closing_elements(ctx)
}

fn closing_elements(ctx: &LayoutContext<'_>) -> Vec<Element> {
    let table = ctx.profile.style;
    vec![
        text_box(
            Role::Headline,
            table.closing_headline_frame,
            vec![Paragraph::single(ctx.profile.closing_headline, table.closing_headline).centered()],
        ),
        text_box(
            Role::Subline,
            table.closing_subline_frame,
            vec![Paragraph::single(ctx.profile.closing_subline, table.closing_subline).centered()],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pictures_keep_their_aspect_ratio() {
        let frame = Rect { x: 100, y: 0, width: 500, height: 700 };

        let wide = frame.fit(400, 300);
        assert_eq!(wide, Rect { x: 100, y: 162, width: 500, height: 375 });

        let tall = frame.fit(100, 200);
        assert_eq!(tall, Rect { x: 175, y: 0, width: 350, height: 700 });

        assert_eq!(frame.fit(0, 0), frame);
    }

    #[test]
    fn wrap_keeps_short_lines_whole() {
        assert_eq!(wrap("short line", 80), vec!["short line".to_string()]);
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn split_heading_handles_delimiters_around_the_colon() {
        let runs = emphasis::tokenize("**Machine Learning (ML):**  A broad **field**.");
        let (heading, detail) = split_heading(&runs).expect("has a colon");
        assert_eq!(heading, vec![EmphasisRun::emphasized("Machine Learning (ML):")]);
        assert_eq!(
            detail,
            vec![
                EmphasisRun::plain("A broad "),
                EmphasisRun::emphasized("field"),
                EmphasisRun::plain("."),
            ]
        );
    }

    #[test]
    fn split_heading_without_colon_is_none() {
        assert!(split_heading(&emphasis::tokenize("no colon here")).is_none());
    }
}
