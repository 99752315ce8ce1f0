//! # Conversation Transcript
//!
//! Append-only list of message entries plus the single "assistant is typing"
//! placeholder.
//!
//! ```text
//! Transcript
//! ├── entries: Vec<MessageEntry>   // ordered by created_at
//! │   ├── User       → Plain("Hello")
//! │   └── Assistant  → Reply { slots: [title, p1, p2, ...] }
//! ├── placeholder: bool            // rendered after the last entry
//! └── scroll_epoch: u64            // bumped on every scroll-to-bottom request
//! ```
//!
//! Reply slots start empty and are filled by the reveal scheduler through
//! [`SinkHost`]. The transcript knows nothing about timers.

use log::debug;

use crate::core::reveal::{SinkHost, TextSink, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Ordering index of an entry; also its position in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub usize);

/// Key for one text slot of a reply entry. Slot 0 is the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub entry: EntryId,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Rendered in full immediately.
    Plain(String),
    /// Title slot followed by paragraph slots.
    Reply { slots: Vec<String> },
}

impl Content {
    pub fn title(&self) -> Option<&str> {
        match self {
            Content::Reply { slots } => slots.first().map(String::as_str),
            Content::Plain(_) => None,
        }
    }

    pub fn paragraphs(&self) -> &[String] {
        match self {
            Content::Reply { slots } => slots.get(1..).unwrap_or_default(),
            Content::Plain(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    role: Role,
    pub content: Content,
    created_at: EntryId,
}

impl MessageEntry {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> EntryId {
        self.created_at
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<MessageEntry>,
    placeholder: bool,
    scroll_epoch: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&MessageEntry> {
        self.entries.get(id.0)
    }

    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.last()
    }

    /// Incremented every time the viewport is asked to scroll to the bottom.
    pub fn scroll_epoch(&self) -> u64 {
        self.scroll_epoch
    }

    pub fn has_placeholder(&self) -> bool {
        self.placeholder
    }

    fn push(&mut self, role: Role, content: Content) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(MessageEntry {
            role,
            content,
            created_at: id,
        });
        id
    }

    pub fn append_user_message(&mut self, text: impl Into<String>) -> EntryId {
        let id = self.push(Role::User, Content::Plain(text.into()));
        self.scroll_to_bottom();
        id
    }

    /// Non-animated assistant message (error outcomes).
    pub fn append_assistant_notice(&mut self, text: impl Into<String>) -> EntryId {
        let id = self.push(Role::Assistant, Content::Plain(text.into()));
        self.scroll_to_bottom();
        id
    }

    /// Assistant entry with `slot_count` empty slots (title + paragraphs).
    /// Returns the slot keys in order.
    pub fn append_empty_assistant_message(&mut self, slot_count: usize) -> Vec<SlotRef> {
        let slot_count = slot_count.max(1);
        let entry = self.push(
            Role::Assistant,
            Content::Reply {
                slots: vec![String::new(); slot_count],
            },
        );
        self.scroll_to_bottom();
        (0..slot_count).map(|slot| SlotRef { entry, slot }).collect()
    }

    /// No-op if a placeholder is already showing.
    pub fn show_placeholder(&mut self) {
        if self.placeholder {
            debug!("Placeholder already visible");
            return;
        }
        self.placeholder = true;
        self.scroll_to_bottom();
    }

    /// No-op if none is showing. Returns whether one was removed.
    pub fn clear_placeholder(&mut self) -> bool {
        std::mem::take(&mut self.placeholder)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.placeholder = false;
        self.scroll_to_bottom();
    }
}

impl Viewport for Transcript {
    fn scroll_to_bottom(&mut self) {
        self.scroll_epoch = self.scroll_epoch.wrapping_add(1);
    }
}

impl SinkHost for Transcript {
    type Key = SlotRef;

    fn sink_mut(&mut self, key: SlotRef) -> Option<&mut dyn TextSink> {
        match &mut self.entries.get_mut(key.entry.0)?.content {
            Content::Reply { slots } => slots.get_mut(key.slot).map(|s| s as &mut dyn TextSink),
            Content::Plain(_) => None,
        }
    }
}
