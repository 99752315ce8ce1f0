//! # InputBox Component
//!
//! Multi-line prompt editor. The buffer and cursor are internal state; the
//! `locked` flag is a prop set from `App::is_busy()` each frame. While locked
//! the user can keep typing but Enter does nothing, so a draft is never lost.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
const CONTENT_OFFSET: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed). Already trimmed.
    Submit(String),
    ContentChanged,
}

fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// One wrapped row of the buffer and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Row<'a> {
    start: usize,
    text: &'a str,
}

/// Wrap `text` row by row, keeping each row's byte offset into `text`.
///
/// Hard lines are wrapped one at a time so an empty line (including the one
/// after a trailing newline) still gets its own row.
fn wrapped_rows(text: &str, width: u16) -> Vec<Row<'_>> {
    if width == 0 {
        return vec![Row { start: 0, text }];
    }
    let options = wrap_options(width);
    let mut rows = Vec::new();
    let mut line_start = 0;
    for line in text.split('\n') {
        let mut offset = 0;
        for piece in textwrap::wrap(line, &options) {
            let piece: &str = piece.as_ref();
            // Pieces are verbatim slices in order; only spaces sit between them.
            let Some(at) = line[offset..].find(piece).map(|i| offset + i) else {
                continue;
            };
            let end = at + piece.len();
            rows.push(Row {
                start: line_start + at,
                text: &line[at..end],
            });
            offset = end;
        }
        if offset == 0 && rows.last().is_none_or(|row| row.start < line_start) {
            rows.push(Row {
                start: line_start,
                text: "",
            });
        }
        line_start += line.len() + 1;
    }
    rows
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

pub struct InputBox {
    pub buffer: String,
    /// Prop: true while a request or reveal is in progress.
    pub locked: bool,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            locked: false,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Required height for the current buffer, clamped to
    /// [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = wrapped_rows(&self.buffer, inner_width(area_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Cursor (column, row) relative to the start of the wrapped text.
    ///
    /// The row is found among the wraps of the whole buffer, so a cursor in
    /// the middle of a word that moved to the next row lands on that row.
    fn cursor_cell(&self, width: u16) -> (u16, u16) {
        if width == 0 {
            return (0, 0);
        }
        let rows = wrapped_rows(&self.buffer, width);
        let row = rows
            .iter()
            .rposition(|row| row.start <= self.cursor)
            .unwrap_or(0);
        let start = rows.get(row).map_or(0, |row| row.start);

        // Spaces swallowed at a wrap point still advance the column.
        let col = self.buffer[start..self.cursor].width();
        (col.min(width.saturating_sub(1) as usize) as u16, row as u16)
    }

    /// First visible row so that the cursor row stays on screen.
    fn scroll_offset(&self, cursor_row: u16) -> u16 {
        cursor_row.saturating_sub(MAX_VISIBLE_LINES - 1)
    }

    fn title(&self) -> &'static str {
        if self.locked {
            "Message (waiting for quill to finish)"
        } else {
            "Message (Enter to send, Ctrl+J for newline)"
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let (cursor_col, cursor_row) = self.cursor_cell(width);
        let offset = self.scroll_offset(cursor_row);

        let rows = wrapped_rows(&self.buffer, width);
        let start = (offset as usize).min(rows.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(rows.len());
        let visible = rows[start..end]
            .iter()
            .map(|row| row.text)
            .collect::<Vec<_>>()
            .join("\n");

        let style = if self.locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(1))
            .title(self.title())
            .title_style(style.add_modifier(Modifier::DIM));

        frame.render_widget(Paragraph::new(visible).block(block).style(style), area);

        let x = area.x + CONTENT_OFFSET + cursor_col;
        let y = area.y + 1 + cursor_row - offset;
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for newlines in bracketed paste.
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if self.locked {
                    return None;
                }
                let text = self.buffer.trim();
                if text.is_empty() {
                    return None;
                }
                let text = text.to_string();
                self.buffer.clear();
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
