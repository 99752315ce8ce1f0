//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&'a Transcript` (props).
//! Since `Component::render` takes `&mut self`, the layout cache and scroll
//! state are updated during the render pass, like Ratatui's `StatefulWidget`.
//!
//! Every reveal tick calls `Viewport::scroll_to_bottom` on the transcript,
//! which bumps its scroll epoch. The list compares epochs each frame and
//! re-pins to the bottom when it moved.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::{Content, MessageEntry, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, TypingIndicator};
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    last_scroll_epoch: u64,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            last_scroll_epoch: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back down to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Content exists below the viewport and auto-scroll is off.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }

    /// Pin to the bottom if the transcript asked for it since the last frame.
    /// Returns true when a re-pin happened.
    pub fn sync_scroll_epoch(&mut self, epoch: u64) -> bool {
        if epoch == self.last_scroll_epoch {
            return false;
        }
        self.last_scroll_epoch = epoch;
        self.stick_to_bottom = true;
        true
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            spinner_frame,
        }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let entries = self.transcript.entries();

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(entries, content_width);
        layout.heights.truncate(reusable);
        for entry in entries.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(Message::calculate_height(entry, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(entries.len(), content_width);

        let messages_height = self.state.layout.total_height();
        let show_typing = self.transcript.has_placeholder();
        let canvas_height = if show_typing {
            messages_height.saturating_add(TypingIndicator::HEIGHT)
        } else {
            messages_height
        };

        // 2. Scroll bookkeeping
        self.state.viewport_height = area.height;
        self.state.sync_scroll_epoch(self.transcript.scroll_epoch());
        if self.state.stick_to_bottom {
            // Resolve the bottom offset now so the visible range covers the tail.
            let bottom = canvas_height.saturating_sub(area.height);
            self.state.scroll_state.set_offset(Position { x: 0, y: bottom });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };
        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(Message::new(&entries[i]), rect);
            y_offset = y_offset.saturating_add(height);
        }

        if show_typing {
            let rect = Rect::new(0, messages_height, content_width, TypingIndicator::HEIGHT);
            scroll_view.render_widget(TypingIndicator::new(self.spinner_frame), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on `MessageListState` because `MessageList` is
/// rebuilt every frame and cannot hold scroll position.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached entry heights for one content width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            entry_count: 0,
            content_width: 0,
        }
    }

    /// Number of leading cached heights still valid for `entries`.
    ///
    /// Entries are append-only and only the newest reply is ever rewritten
    /// (by the reveal), so a trailing reply is always re-measured.
    pub fn reusable_count(&self, entries: &[MessageEntry], content_width: u16) -> usize {
        if self.content_width != content_width || entries.len() < self.entry_count {
            return 0;
        }
        let cached = self.heights.len().min(entries.len());
        let last_is_volatile = entries
            .last()
            .is_some_and(|last| matches!(last.content, Content::Reply { .. }));
        if last_is_volatile && cached == entries.len() {
            cached.saturating_sub(1)
        } else {
            cached
        }
    }

    pub fn update_metadata(&mut self, entry_count: usize, content_width: u16) {
        self.entry_count = entry_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reveal::{SinkHost, TextSink, Viewport};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &mut MessageListState, transcript: &Transcript, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal
            .draw(|f| MessageList::new(state, transcript, 0).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_trailing_reply_is_always_remeasured() {
        let mut transcript = Transcript::new();
        transcript.append_user_message("hi");
        transcript.append_empty_assistant_message(2);

        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 2];
        cache.rebuild_prefix_heights();
        cache.update_metadata(2, 80);

        assert_eq!(cache.reusable_count(transcript.entries(), 80), 1);
        assert_eq!(cache.reusable_count(transcript.entries(), 40), 0);
    }

    #[test]
    fn test_stable_entries_fully_reused() {
        let mut transcript = Transcript::new();
        transcript.append_user_message("hi");
        transcript.append_assistant_notice("Network error: down");

        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 3];
        cache.update_metadata(2, 80);
        assert_eq!(cache.reusable_count(transcript.entries(), 80), 2);

        // Cleared transcript invalidates everything
        assert_eq!(cache.reusable_count(&transcript.entries()[..1], 80), 0);
    }

    #[test]
    fn test_visible_range() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10, 10, 10, 10];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.total_height(), 40);
        assert_eq!(cache.visible_range(0, 10), 0..2);
        assert_eq!(cache.visible_range(30, 10), 2..4);
    }

    #[test]
    fn test_prefix_heights_saturate() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![40_000, 40_000];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![40_000, u16::MAX]);
        assert_eq!(cache.total_height(), u16::MAX);
        assert_eq!(cache.visible_range(u16::MAX - 10, 10), 1..2);
    }

    #[test]
    fn test_oversized_transcript_renders() {
        let mut transcript = Transcript::new();
        transcript.append_assistant_notice("line\n".repeat(40_000));
        transcript.append_assistant_notice("tail\n".repeat(40_000));
        transcript.show_placeholder();

        let mut state = MessageListState::new();
        draw(&mut state, &transcript, 12, 10);
        assert_eq!(state.layout.total_height(), u16::MAX);
    }

    #[test]
    fn test_scroll_epoch_repins() {
        let mut state = MessageListState::new();
        state.stick_to_bottom = false;

        assert!(!state.sync_scroll_epoch(0));
        assert!(!state.stick_to_bottom);

        assert!(state.sync_scroll_epoch(1));
        assert!(state.stick_to_bottom);
        assert!(!state.sync_scroll_epoch(1));
    }

    #[test]
    fn test_scroll_up_unpins_and_ctrl_end_repins() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_reveal_tick_keeps_latest_text_visible() {
        let mut transcript = Transcript::new();
        for i in 0..10 {
            transcript.append_user_message(format!("question {i}"));
        }
        let slots = transcript.append_empty_assistant_message(2);

        let mut state = MessageListState::new();
        draw(&mut state, &transcript, 40, 8);

        // User scrolls away from the bottom
        state.handle_event(&TuiEvent::ScrollPageUp);
        state.handle_event(&TuiEvent::ScrollPageUp);
        assert!(!state.stick_to_bottom);

        // A reveal tick writes and scrolls
        transcript.sink_mut(slots[0]).unwrap().set_text("Fresh title");
        transcript.scroll_to_bottom();

        let screen = draw(&mut state, &transcript, 40, 8);
        assert!(state.stick_to_bottom);
        assert!(screen.contains("Fresh title"));
    }

    #[test]
    fn test_placeholder_renders_typing_bubble() {
        let mut transcript = Transcript::new();
        transcript.append_user_message("hello");
        transcript.show_placeholder();

        let mut state = MessageListState::new();
        let screen = draw(&mut state, &transcript, 30, 10);
        assert!(screen.contains("hello"));
        assert!(screen.contains("quill"));
        assert!(screen.contains('●'));
    }
}
