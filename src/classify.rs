// ABOUTME: Slide type classification for the deckgen application
// ABOUTME: Maps a slide heading to its semantic slide kind by keyword

use crate::slide::SlideKind;

/// Keyword table in precedence order; the first match wins.
const KEYWORDS: &[(&[&str], SlideKind)] = &[
    (&["summary"], SlideKind::Summary),
    (&["timeline"], SlideKind::Timeline),
    (&["flow"], SlideKind::Flow),
    (&["question"], SlideKind::Question),
    (&["vs", "comparison", "difference"], SlideKind::Comparison),
    (&["thank you"], SlideKind::Closing),
];

/// Classify a slide by case-insensitive substring match against its title.
///
/// Never fails: titles that match nothing are `SlideKind::Normal`. Matching is
/// plain substring matching, so "Flowers" is a flow slide and "Canvas" is a
/// comparison slide, exactly as the outline dialect has always behaved.
/// `SlideKind::Title` is never returned; the title slide is decided by
/// position, not by text.
pub fn classify(title: &str) -> SlideKind {
    let lowered = title.to_lowercase();

    KEYWORDS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(_, kind)| *kind)
        .unwrap_or(SlideKind::Normal)
}
