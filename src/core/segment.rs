//! # Reply Segmentation
//!
//! Splits a raw reply into a title and paragraphs using blank lines as
//! block delimiters.
//!
//! ```text
//! "TITLE: Foo\n\nBar\n\n\nBaz"
//!        │
//!        ▼
//! title: "Foo"   paragraphs: ["Bar", "Baz"]
//! ```
//!
//! The first block always becomes the title. When nothing is left for the
//! body, the whole trimmed reply is reused as the only paragraph so a
//! one-line answer still shows up as text.

/// Label some backends put in front of the title block.
const TITLE_LABEL: &str = "title";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedReply {
    pub title: String,
    pub paragraphs: Vec<String>,
}

impl SegmentedReply {
    /// Title first, then paragraphs in order. This is the reveal order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str()).chain(self.paragraphs.iter().map(String::as_str))
    }

    /// Number of text slots needed to render this reply (title + paragraphs).
    pub fn slot_count(&self) -> usize {
        1 + self.paragraphs.len()
    }
}

/// Segment a raw reply. Total over any input.
pub fn segment(raw: &str) -> SegmentedReply {
    let trimmed = raw.trim();
    let mut blocks = split_blocks(trimmed);

    let title = blocks
        .next()
        .map(|block| strip_title_label(block.trim()).to_string())
        .unwrap_or_default();

    let mut paragraphs: Vec<String> = blocks
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect();

    if paragraphs.is_empty() {
        paragraphs.push(trimmed.to_string());
    }

    SegmentedReply { title, paragraphs }
}

/// Split on runs of two or more newlines.
///
/// Splitting on `"\n\n"` leaves empty or whitespace-led pieces for longer
/// runs; callers trim and drop empties, which collapses the run.
fn split_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
}

/// Strip a leading `TITLE`, `TITLE:` or `TITLE -` label (any case).
///
/// The label must stand alone as a word: "Titles of note" is left as is,
/// where a bare prefix match would have produced "s of note".
fn strip_title_label(block: &str) -> &str {
    let Some(head) = block.get(..TITLE_LABEL.len()) else {
        return block;
    };
    if !head.eq_ignore_ascii_case(TITLE_LABEL) {
        return block;
    }

    let rest = &block[TITLE_LABEL.len()..];
    if rest.chars().next().is_some_and(char::is_alphanumeric) {
        return block;
    }

    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix(':')
        .or_else(|| rest.strip_prefix('-'))
        .unwrap_or(rest);
    rest.trim_start()
}
