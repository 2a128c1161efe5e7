// ABOUTME: Style tables for the deckgen application
// ABOUTME: Holds every fixed size, colour and position used by the layout engine

use std::fmt;

/// EMU per hundredth of an inch (914400 EMU per inch).
const EMU_PER_HUNDREDTH_INCH: i64 = 9_144;

/// Widescreen 16:9 slide, 13.333in x 7.5in.
pub const SLIDE_WIDTH: i64 = 12_192_000;
pub const SLIDE_HEIGHT: i64 = 6_858_000;

/// Convert hundredths of an inch to EMU.
pub const fn hin(hundredths: i64) -> i64 {
    hundredths * EMU_PER_HUNDREDTH_INCH
}

/// A positioned frame in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    /// Build a frame from hundredths of an inch.
    pub const fn hin(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x: hin(x),
            y: hin(y),
            width: hin(width),
            height: hin(height),
        }
    }

    /// Largest frame with the picture's aspect ratio that fits inside this
    /// one, centred on it.
    pub fn fit(&self, width: u32, height: u32) -> Rect {
        if width == 0 || height == 0 {
            return *self;
        }
        let (w, h) = (i64::from(width), i64::from(height));
        let (fitted_width, fitted_height) = if w * self.height > h * self.width {
            (self.width, self.width * h / w)
        } else {
            (self.height * w / h, self.height)
        };
        Rect {
            x: self.x + (self.width - fitted_width) / 2,
            y: self.y + (self.height - fitted_height) / 2,
            width: fitted_width,
            height: fitted_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub const NAVY: Rgb = Rgb(0, 51, 102);
pub const SLATE: Rgb = Rgb(47, 79, 79);
pub const CHARCOAL: Rgb = Rgb(59, 59, 59);
pub const DARK_GRAY: Rgb = Rgb(51, 51, 51);
pub const MID_GRAY: Rgb = Rgb(80, 80, 80);
pub const UMBER: Rgb = Rgb(48, 40, 36);
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// Character formatting for a run of text. Sizes are in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(size: u32, color: Rgb) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
            color,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// Geometry and formatting of the opening slide.
#[derive(Debug, Clone, Copy)]
pub struct TitleSlideStyle {
    pub title_frame: Rect,
    pub title: TextStyle,
    pub subtitle_frame: Rect,
    pub subtitle: TextStyle,
    pub meta_frame: Rect,
    pub meta: TextStyle,
    pub tagline_frame: Rect,
    pub tagline: TextStyle,
    pub image_frame: Rect,
}

/// Frames shared by the title-and-body layouts.
#[derive(Debug, Clone, Copy)]
pub struct BodyLayoutStyle {
    pub heading_frame: Rect,
    pub heading: TextStyle,
    pub body_frame: Rect,
}

/// The fixed styles of one tier, indexed by slide layout.
#[derive(Debug, Clone, Copy)]
pub struct StyleTable {
    pub title_slide: TitleSlideStyle,
    /// title + body layouts (normal, summary, timeline, comparison)
    pub body: BodyLayoutStyle,
    /// blank-canvas layouts (flow, question)
    pub canvas: BodyLayoutStyle,
    pub bullet: TextStyle,
    pub detail: TextStyle,
    pub label: TextStyle,
    pub term: TextStyle,
    pub summary_intro: TextStyle,
    pub summary_intro_space_after: u32,
    pub summary_point_space_after: u32,
    pub step: TextStyle,
    pub step_space_after: u32,
    pub question: TextStyle,
    pub question_space_after: u32,
    pub closing_headline_frame: Rect,
    pub closing_headline: TextStyle,
    pub closing_subline_frame: Rect,
    pub closing_subline: TextStyle,
}

const TITLE_FRAME: Rect = Rect::hin(50, 70, 750, 180);
const SUBTITLE_FRAME: Rect = Rect::hin(50, 270, 750, 150);
const META_FRAME: Rect = Rect::hin(50, 580, 450, 100);
const TAGLINE_FRAME: Rect = Rect::hin(50, 685, 750, 60);
const IMAGE_FRAME: Rect = Rect::hin(800, 0, 533, 750);

const BODY: BodyLayoutStyle = BodyLayoutStyle {
    heading_frame: Rect::hin(92, 40, 1150, 145),
    heading: TextStyle::new(36, NAVY).bold(),
    body_frame: Rect::hin(92, 195, 1150, 495),
};

const CANVAS: BodyLayoutStyle = BodyLayoutStyle {
    heading_frame: Rect::hin(100, 50, 1133, 100),
    heading: TextStyle::new(36, NAVY).bold(),
    body_frame: Rect::hin(100, 150, 1133, 500),
};

const CLOSING_HEADLINE_FRAME: Rect = Rect::hin(100, 250, 1133, 150);
const CLOSING_SUBLINE_FRAME: Rect = Rect::hin(100, 400, 1133, 100);

pub static SILVER: StyleTable = StyleTable {
    title_slide: TitleSlideStyle {
        title_frame: TITLE_FRAME,
        title: TextStyle::new(40, NAVY).bold(),
        subtitle_frame: SUBTITLE_FRAME,
        subtitle: TextStyle::new(24, DARK_GRAY).italic(),
        meta_frame: META_FRAME,
        meta: TextStyle::new(16, DARK_GRAY),
        tagline_frame: TAGLINE_FRAME,
        tagline: TextStyle::new(24, DARK_GRAY).italic(),
        image_frame: IMAGE_FRAME,
    },
    body: BodyLayoutStyle {
        heading: TextStyle::new(40, NAVY).bold(),
        ..BODY
    },
    canvas: CANVAS,
    bullet: TextStyle::new(20, BLACK),
    detail: TextStyle::new(18, BLACK),
    label: TextStyle::new(20, BLACK).bold(),
    term: TextStyle::new(20, BLACK).bold(),
    summary_intro: TextStyle::new(24, NAVY).bold(),
    summary_intro_space_after: 10,
    summary_point_space_after: 5,
    step: TextStyle::new(20, NAVY),
    step_space_after: 8,
    question: TextStyle::new(20, NAVY),
    question_space_after: 10,
    closing_headline_frame: CLOSING_HEADLINE_FRAME,
    closing_headline: TextStyle::new(40, NAVY).bold(),
    closing_subline_frame: CLOSING_SUBLINE_FRAME,
    closing_subline: TextStyle::new(20, DARK_GRAY).italic(),
};

pub static GOLD: StyleTable = StyleTable {
    title_slide: TitleSlideStyle {
        title_frame: TITLE_FRAME,
        title: TextStyle::new(40, UMBER).bold(),
        subtitle_frame: SUBTITLE_FRAME,
        subtitle: TextStyle::new(28, MID_GRAY).italic(),
        meta_frame: META_FRAME,
        meta: TextStyle::new(18, NAVY),
        tagline_frame: TAGLINE_FRAME,
        tagline: TextStyle::new(18, NAVY),
        image_frame: IMAGE_FRAME,
    },
    body: BodyLayoutStyle {
        heading: TextStyle::new(40, UMBER).bold(),
        ..BODY
    },
    canvas: CANVAS,
    bullet: TextStyle::new(20, BLACK),
    detail: TextStyle::new(18, BLACK),
    label: TextStyle::new(20, BLACK).bold(),
    term: TextStyle::new(20, BLACK).bold(),
    summary_intro: TextStyle::new(24, UMBER).bold(),
    summary_intro_space_after: 10,
    summary_point_space_after: 5,
    step: TextStyle::new(20, UMBER),
    step_space_after: 8,
    question: TextStyle::new(20, UMBER),
    question_space_after: 10,
    closing_headline_frame: Rect::hin(100, 300, 1133, 100),
    closing_headline: TextStyle::new(40, UMBER).bold(),
    closing_subline_frame: CLOSING_SUBLINE_FRAME,
    closing_subline: TextStyle::new(20, MID_GRAY).italic(),
};

pub static PLATINUM: StyleTable = StyleTable {
    title_slide: TitleSlideStyle {
        title_frame: TITLE_FRAME,
        title: TextStyle::new(44, NAVY).bold(),
        subtitle_frame: SUBTITLE_FRAME,
        subtitle: TextStyle::new(28, SLATE).italic(),
        meta_frame: META_FRAME,
        meta: TextStyle::new(16, CHARCOAL),
        tagline_frame: TAGLINE_FRAME,
        tagline: TextStyle::new(18, NAVY),
        image_frame: IMAGE_FRAME,
    },
    body: BODY,
    canvas: CANVAS,
    bullet: TextStyle::new(20, BLACK),
    detail: TextStyle::new(18, BLACK),
    label: TextStyle::new(20, NAVY).bold(),
    term: TextStyle::new(20, BLACK).bold(),
    summary_intro: TextStyle::new(24, NAVY).bold(),
    summary_intro_space_after: 10,
    summary_point_space_after: 5,
    step: TextStyle::new(20, NAVY),
    step_space_after: 8,
    question: TextStyle::new(20, NAVY),
    question_space_after: 10,
    closing_headline_frame: CLOSING_HEADLINE_FRAME,
    closing_headline: TextStyle::new(44, NAVY).bold(),
    closing_subline_frame: CLOSING_SUBLINE_FRAME,
    closing_subline: TextStyle::new(20, MID_GRAY).italic(),
};
