use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{Content, MessageEntry, Role};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Frames of the typing indicator, advanced by the spinner clock.
const TYPING_FRAMES: [&str; 4] = ["●  ", "●● ", "●●●", " ●●"];

/// One line of a message body. `emphasis` marks the reply title.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BodyLine<'a> {
    text: &'a str,
    emphasis: bool,
}

/// Flatten entry content into display lines.
///
/// A reply shows its title (when non-empty) and then each non-empty
/// paragraph, with one blank line between blocks. Slots that have not been
/// revealed yet contribute nothing.
fn body_lines(content: &Content) -> Vec<BodyLine<'_>> {
    let mut lines = Vec::new();
    match content {
        Content::Plain(text) => {
            lines.extend(text.trim().lines().map(|text| BodyLine {
                text,
                emphasis: false,
            }));
        }
        Content::Reply { slots } => {
            for (index, slot) in slots.iter().enumerate() {
                if slot.is_empty() {
                    continue;
                }
                if !lines.is_empty() {
                    lines.push(BodyLine {
                        text: "",
                        emphasis: false,
                    });
                }
                lines.extend(slot.lines().map(|text| BodyLine {
                    text,
                    emphasis: index == 0,
                }));
            }
        }
    }
    lines
}

fn wrapped_height(lines: &[BodyLine<'_>], width: u16) -> u16 {
    let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
    if content_width == 0 {
        // Degenerate case: terminal too narrow for borders + padding.
        return 1;
    }
    if lines.is_empty() {
        return VERTICAL_OVERHEAD;
    }

    let options = textwrap::Options::new(content_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let rows: usize = lines
        .iter()
        .map(|line| textwrap::wrap(line.text, &options).len().max(1))
        .sum();
    let rows = rows.min(u16::MAX as usize) as u16;
    rows.saturating_add(VERTICAL_OVERHEAD)
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "quill",
    }
}

/// Base style for an entry. Plain assistant entries are error notices.
fn entry_style(entry: &MessageEntry) -> Style {
    match (entry.role(), &entry.content) {
        (Role::User, _) => Style::default().fg(Color::Green),
        (Role::Assistant, Content::Reply { .. }) => Style::default().fg(Color::Blue),
        (Role::Assistant, Content::Plain(_)) => Style::default().fg(Color::Yellow),
    }
}

fn bubble(label: &'static str, style: Style) -> Block<'static> {
    let border_style = style.add_modifier(Modifier::DIM);
    Block::bordered()
        .title(label)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title_style(border_style)
        .padding(Padding::horizontal(CONTENT_PAD_H))
}

/// Stateless renderer for one transcript entry.
///
/// Created fresh each frame by `MessageList`. [`calculate_height`](Self::calculate_height)
/// predicts the rendered height with `textwrap` so the list can lay out the
/// scroll canvas before drawing anything.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub entry: &'a MessageEntry,
}

impl<'a> Message<'a> {
    pub fn new(entry: &'a MessageEntry) -> Self {
        Self { entry }
    }

    pub fn calculate_height(entry: &MessageEntry, width: u16) -> u16 {
        wrapped_height(&body_lines(&entry.content), width)
    }
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = entry_style(self.entry);
        let block = bubble(role_label(self.entry.role()), style);
        let inner_area = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = body_lines(&self.entry.content)
            .into_iter()
            .map(|line| {
                let span_style = if line.emphasis {
                    style.add_modifier(Modifier::BOLD)
                } else {
                    style
                };
                Line::from(Span::styled(line.text, span_style))
            })
            .collect();

        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

/// The transient "quill is typing" bubble.
#[derive(Clone, Copy)]
pub struct TypingIndicator {
    pub frame: usize,
}

impl TypingIndicator {
    pub const HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;

    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    fn dots(&self) -> &'static str {
        TYPING_FRAMES[self.frame % TYPING_FRAMES.len()]
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        let block = bubble(role_label(Role::Assistant), style);
        let inner_area = block.inner(area);
        block.render(area, buf);
        Paragraph::new(self.dots()).style(style).render(inner_area, buf);
    }
}
