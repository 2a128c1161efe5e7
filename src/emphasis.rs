// ABOUTME: Inline emphasis tokenizer for the deckgen application
// ABOUTME: Splits text fragments into plain and bold runs using `**` delimiters

use once_cell::sync::Lazy;
use regex::Regex;

const DELIMITER: &str = "**";

static PAIRED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// A contiguous span of text sharing one emphasis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmphasisRun {
    pub text: String,
    pub emphasized: bool,
}

impl EmphasisRun {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: false,
        }
    }

    pub fn emphasized(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: true,
        }
    }
}

/// How `**` delimiters in a fragment are interpreted.
///
/// Every rule drops the delimiters themselves. An unmatched trailing delimiter
/// opens emphasis that is closed at the end of the fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisRule {
    /// `**bold**` pairs, matched left to right.
    Paired,
    /// Every lone `**` flips emphasis for the text that follows.
    Toggle,
    /// Delimiters are removed and nothing is emphasized.
    Plain,
}

impl EmphasisRule {
    pub fn tokenize(self, fragment: &str) -> Vec<EmphasisRun> {
        let runs = match self {
            EmphasisRule::Paired => tokenize_paired(fragment),
            EmphasisRule::Toggle => tokenize_toggle(fragment),
            EmphasisRule::Plain => vec![EmphasisRun::plain(&strip_emphasis(fragment))],
        };
        merge(runs)
    }
}

/// Tokenize with the toggle rule, which accepts every outline dialect seen in practice.
pub fn tokenize(fragment: &str) -> Vec<EmphasisRun> {
    EmphasisRule::Toggle.tokenize(fragment)
}

/// Remove every emphasis delimiter, keeping the text.
pub fn strip_emphasis(fragment: &str) -> String {
    fragment.replace(DELIMITER, "")
}

/// Concatenate run text, dropping emphasis.
pub fn plain_text(runs: &[EmphasisRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

fn tokenize_paired(fragment: &str) -> Vec<EmphasisRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for caps in PAIRED.captures_iter(fragment) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        runs.push(EmphasisRun::plain(&fragment[last..whole.start()]));
        runs.push(EmphasisRun::emphasized(inner.as_str()));
        last = whole.end();
    }

    let rest = &fragment[last..];
    match rest.split_once(DELIMITER) {
        Some((before, after)) => {
            runs.push(EmphasisRun::plain(before));
            runs.push(EmphasisRun::emphasized(after));
        }
        None => runs.push(EmphasisRun::plain(rest)),
    }
    runs
}

fn tokenize_toggle(fragment: &str) -> Vec<EmphasisRun> {
    fragment
        .split(DELIMITER)
        .enumerate()
        .map(|(i, part)| EmphasisRun {
            text: part.to_string(),
            emphasized: i % 2 == 1,
        })
        .collect()
}

/// Drop empty runs and join neighbours with the same emphasis.
fn merge(runs: Vec<EmphasisRun>) -> Vec<EmphasisRun> {
    let mut merged: Vec<EmphasisRun> = Vec::with_capacity(runs.len());
    for run in runs.into_iter().filter(|r| !r.text.is_empty()) {
        match merged.last_mut() {
            Some(prev) if prev.emphasized == run.emphasized => prev.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    merged
}
