//! # TitleBar Component
//!
//! Single-line status bar. Purely presentational: every field is a prop.
//!
//! The text degrades in priority order so the most useful part survives on
//! narrow terminals:
//!
//! 1. `"Quill (backend: http) | Typing... | ↓ New"`
//! 2. `"Quill (backend: http) | Typing..."`
//! 3. `"Quill (backend: http)"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar {
    /// Gateway name, from `RequestGateway::name`
    pub backend: String,
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(backend: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            backend,
            status_message,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("Quill (backend: {})", self.backend);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(self.text(), Style::default().fg(Color::Cyan)));
        frame.render_widget(line, area);
    }
}
